//! Display formatting for the student detail screen and list cards.

use chrono::NaiveDate;
use shared::{SoftwareDetail, StudentDetailView};

use super::models::{InstalledSoftware, Student};

const NOT_SPECIFIED: &str = "Not specified";

/// Date shapes the install-date field is known to hold
const INSTALL_DATE_FORMATS: [&str; 3] = ["%m/%d/%Y", "%Y-%m-%d", "%d-%m-%Y"];

#[derive(Clone, Default)]
pub struct StudentDetailsService;

impl StudentDetailsService {
    pub fn new() -> Self {
        Self
    }

    pub fn describe(&self, student: &Student) -> StudentDetailView {
        StudentDetailView {
            id: student.id.clone(),
            name: student.name.clone(),
            department: student.department.clone(),
            cadd_id: student.cadd_id.clone(),
            age_label: self.age_label(student.age),
            course_label: label_or_default(student.course.as_deref()),
            pc_model_label: label_or_default(student.pc_model.as_deref()),
            image_url: student.image_url.clone(),
            software_count: student.installed_software.len(),
            software: student
                .installed_software
                .iter()
                .map(|software| self.describe_software(software))
                .collect(),
        }
    }

    fn describe_software(&self, software: &InstalledSoftware) -> SoftwareDetail {
        let install_date = software.install_date.trim();
        SoftwareDetail {
            name: software.name.clone(),
            formatted_install_date: if install_date.is_empty() {
                None
            } else {
                Some(self.format_install_date(install_date))
            },
            screenshot: software.image.clone(),
        }
    }

    pub fn age_label(&self, age: Option<i32>) -> String {
        match age {
            Some(age) => format!("{} years", age),
            None => NOT_SPECIFIED.to_string(),
        }
    }

    /// Best-effort `Jan 15, 2024` rendering; unrecognized text is shown as typed
    pub fn format_install_date(&self, raw: &str) -> String {
        let raw = raw.trim();
        INSTALL_DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
            .map(|date| date.format("%b %-d, %Y").to_string())
            .unwrap_or_else(|| raw.to_string())
    }

    pub fn delete_confirmation_message(&self, student: &Student) -> String {
        format!(
            "Are you sure you want to delete {}? This action cannot be undone.",
            student.name
        )
    }
}

fn label_or_default(value: Option<&str>) -> String {
    value.unwrap_or(NOT_SPECIFIED).to_string()
}
