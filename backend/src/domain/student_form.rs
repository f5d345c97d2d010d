//! Student form domain logic.
//!
//! Everything between the raw text a user typed into the add/edit form and a
//! well-formed `Student` ready for the repository lives here: software-row
//! editing, required-field checks, age parsing, software-row normalization and
//! identity assignment. Screens only render the form and show the messages.

use chrono::NaiveDate;
use log::{debug, warn};
use std::sync::Arc;

use shared::{parse_leading_int, SoftwareEntryForm, StudentFormData};

use super::errors::{RosterError, StudentValidationError};
use super::models::{IdGenerator, InstalledSoftware, Student};
use crate::config::FormConfig;

pub const STUDENT_ADDED_MESSAGE: &str = "Student added successfully!";
pub const STUDENT_UPDATED_MESSAGE: &str = "Student updated successfully!";

/// Date format written by the install-date picker
pub const PICKER_DATE_FORMAT: &str = "%m/%d/%Y";

/// Result of checking a submitted form
#[derive(Debug, Clone, PartialEq)]
pub struct StudentFormValidation {
    pub is_valid: bool,
    pub errors: Vec<StudentValidationError>,
}

#[derive(Clone)]
pub struct StudentFormService {
    config: FormConfig,
    ids: Arc<IdGenerator>,
}

impl StudentFormService {
    /// `roster` is the roster at startup; new ids are issued above its ids
    pub fn new(config: FormConfig, roster: &[Student]) -> Self {
        Self {
            config,
            ids: Arc::new(IdGenerator::starting_after(roster)),
        }
    }

    /// Departments to offer in the picker; empty when the field is free text
    pub fn department_options(&self) -> &[String] {
        self.config.department_policy.options()
    }

    /// A blank form with a single empty software row
    pub fn create_form() -> StudentFormData {
        StudentFormData {
            installed_software: vec![SoftwareEntryForm::default()],
            ..StudentFormData::default()
        }
    }

    /// Pre-fill the form for editing an existing student
    pub fn edit_form_from_student(student: &Student) -> StudentFormData {
        let mut installed_software: Vec<SoftwareEntryForm> = student
            .installed_software
            .iter()
            .map(|software| SoftwareEntryForm {
                name: software.name.clone(),
                install_date: software.install_date.clone(),
                image: software.image.clone().unwrap_or_default(),
            })
            .collect();
        if installed_software.is_empty() {
            installed_software.push(SoftwareEntryForm::default());
        }

        StudentFormData {
            name: student.name.clone(),
            age: student.age.map(|age| age.to_string()).unwrap_or_default(),
            department: student.department.clone(),
            course: student.course.clone().unwrap_or_default(),
            cadd_id: student.cadd_id.clone(),
            pc_model: student.pc_model.clone().unwrap_or_default(),
            image_url: student.image_url.clone().unwrap_or_default(),
            installed_software,
        }
    }

    pub fn add_software_row(form: &mut StudentFormData) {
        form.installed_software.push(SoftwareEntryForm::default());
    }

    /// Remove a software row; the last remaining row is never removed
    pub fn remove_software_row(form: &mut StudentFormData, index: usize) -> bool {
        if form.installed_software.len() <= 1 || index >= form.installed_software.len() {
            return false;
        }
        form.installed_software.remove(index);
        true
    }

    pub fn set_software_name(form: &mut StudentFormData, index: usize, name: &str) -> bool {
        match form.installed_software.get_mut(index) {
            Some(row) => {
                row.name = name.to_string();
                true
            }
            None => false,
        }
    }

    pub fn set_software_screenshot(form: &mut StudentFormData, index: usize, uri: &str) -> bool {
        match form.installed_software.get_mut(index) {
            Some(row) => {
                row.image = uri.to_string();
                true
            }
            None => false,
        }
    }

    /// Store a date chosen in the picker as `MM/DD/YYYY`
    pub fn set_install_date_from_picker(
        form: &mut StudentFormData,
        index: usize,
        date: NaiveDate,
    ) -> bool {
        match form.installed_software.get_mut(index) {
            Some(row) => {
                row.install_date = Self::format_picker_date(date);
                true
            }
            None => false,
        }
    }

    pub fn format_picker_date(date: NaiveDate) -> String {
        date.format(PICKER_DATE_FORMAT).to_string()
    }

    pub fn set_student_image(form: &mut StudentFormData, uri: &str) {
        form.image_url = uri.to_string();
    }

    /// Check every field and report all failures at once
    pub fn validate(&self, form: &StudentFormData) -> StudentFormValidation {
        let mut errors = Vec::new();

        if form.name.trim().is_empty() {
            errors.push(StudentValidationError::MissingName);
        }

        if form.department.trim().is_empty() {
            errors.push(StudentValidationError::MissingDepartment);
        } else if self.config.department_policy.resolve(&form.department).is_none() {
            errors.push(StudentValidationError::UnknownDepartment(
                form.department.trim().to_string(),
            ));
        }

        if form.cadd_id.trim().is_empty() {
            errors.push(StudentValidationError::MissingCaddId);
        }

        if self.config.require_age {
            let age_text = form.age.trim();
            if age_text.is_empty() {
                errors.push(StudentValidationError::MissingAge);
            } else if parse_leading_int(age_text).is_none() {
                errors.push(StudentValidationError::InvalidAge(age_text.to_string()));
            }
        }

        if self.config.require_course && form.course.trim().is_empty() {
            errors.push(StudentValidationError::MissingCourse);
        }

        StudentFormValidation {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Drop software rows where both the name and the date are blank.
    ///
    /// Partially filled rows are kept exactly as entered.
    pub fn normalize_software(rows: &[SoftwareEntryForm]) -> Vec<InstalledSoftware> {
        rows.iter()
            .map(|row| InstalledSoftware {
                name: row.name.clone(),
                install_date: row.install_date.clone(),
                image: optional_text(&row.image),
            })
            .filter(|software| !software.is_blank())
            .collect()
    }

    /// Turn a submitted form into a student ready for the repository.
    ///
    /// A new id is issued when `existing_id` is `None`; otherwise the id is
    /// carried over and every other field is replaced by the form's values.
    pub fn build_student(
        &self,
        form: &StudentFormData,
        existing_id: Option<&str>,
    ) -> Result<Student, RosterError> {
        let validation = self.validate(form);
        if !validation.is_valid {
            debug!("Student form rejected: {:?}", validation.errors);
            return Err(RosterError::Validation(validation.errors));
        }

        let department = self
            .config
            .department_policy
            .resolve(&form.department)
            .ok_or_else(|| {
                RosterError::Validation(vec![StudentValidationError::UnknownDepartment(
                    form.department.trim().to_string(),
                )])
            })?;

        let age = self.parse_age(&form.age);

        let id = match existing_id {
            Some(id) => id.to_string(),
            None => self.ids.next_id(),
        };

        Ok(Student {
            id,
            name: form.name.trim().to_string(),
            age,
            department,
            course: optional_text(&form.course),
            cadd_id: form.cadd_id.trim().to_string(),
            pc_model: optional_text(&form.pc_model),
            image_url: optional_text(&form.image_url),
            installed_software: Self::normalize_software(&form.installed_software),
        })
    }

    fn parse_age(&self, age_text: &str) -> Option<i32> {
        let age_text = age_text.trim();
        if age_text.is_empty() {
            return None;
        }
        let age = parse_leading_int(age_text);
        if age.is_none() {
            warn!("Age '{}' is not a number; saving the student without an age", age_text);
        }
        age
    }

    /// A fresh form to show after a new student was added, with the success message
    pub fn reset_after_create() -> (StudentFormData, &'static str) {
        (Self::create_form(), STUDENT_ADDED_MESSAGE)
    }

    /// Get the first error message (for displaying a single alert)
    pub fn get_first_error_message(errors: &[StudentValidationError]) -> Option<String> {
        errors.first().map(ToString::to_string)
    }
}

fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
