use serde::{Deserialize, Deserializer, Serialize};

/// A student on the lab roster, in the shape it is persisted and handed to screens.
///
/// Older form variants wrote subsets of these fields, so everything except `id`
/// tolerates being absent when read back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Opaque identifier, stable for the lifetime of the record
    #[serde(deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Age in years; absent when never entered or not a number
    #[serde(default, deserialize_with = "lenient_age", skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(default)]
    pub department: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    /// Club-issued identifier (not required to be unique)
    #[serde(default)]
    pub cadd_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pc_model: Option<String>,
    /// Device-local or remote image reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Display order follows entry order
    #[serde(default)]
    pub installed_software: Vec<InstalledSoftware>,
}

/// One software installation on a student's lab PC
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledSoftware {
    #[serde(default)]
    pub name: String,
    /// Free text or `MM/DD/YYYY` from the date picker
    #[serde(default)]
    pub install_date: String,
    /// Screenshot of the installation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdValue {
    Text(String),
    Int(i64),
    Float(f64),
}

fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match IdValue::deserialize(deserializer)? {
        IdValue::Text(text) => text,
        IdValue::Int(number) => number.to_string(),
        IdValue::Float(number) => number.to_string(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AgeValue {
    Int(i64),
    Float(f64),
    Text(String),
}

fn lenient_age<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<AgeValue>::deserialize(deserializer)?;
    Ok(match value {
        None => None,
        Some(AgeValue::Int(number)) => i32::try_from(number).ok(),
        Some(AgeValue::Float(number)) if number.is_finite() => Some(number.trunc() as i32),
        Some(AgeValue::Float(_)) => None,
        Some(AgeValue::Text(text)) => parse_leading_int(&text),
    })
}

/// Parse the integer prefix of a piece of text, the way a form field is read.
///
/// `"21"` and `" 21 years"` both give `Some(21)`; text with no leading digits gives `None`.
pub fn parse_leading_int(text: &str) -> Option<i32> {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude: i64 = digits[..end].parse().ok()?;
    let value = if negative { -magnitude } else { magnitude };
    i32::try_from(value).ok()
}

/// Raw values of one software row on the student form
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftwareEntryForm {
    pub name: String,
    pub install_date: String,
    #[serde(default)]
    pub image: String,
}

/// Raw values of the add/edit student form, exactly as typed or picked
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentFormData {
    pub name: String,
    pub age: String,
    pub department: String,
    pub course: String,
    pub cadd_id: String,
    pub pc_model: String,
    pub image_url: String,
    pub installed_software: Vec<SoftwareEntryForm>,
}

/// Request to save the student form; `student_id` is set when editing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveStudentRequest {
    pub student_id: Option<String>,
    pub form: StudentFormData,
}

/// Response after saving a student.
///
/// The roster in memory is already updated when this is returned; `persisted`
/// tells whether the write to device storage succeeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveStudentResponse {
    pub student: Student,
    pub roster_size: usize,
    pub persisted: bool,
    pub warning: Option<String>,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentListResponse {
    pub students: Vec<Student>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentResponse {
    pub student: Option<Student>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchStudentsRequest {
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchStudentsResponse {
    pub query: String,
    pub students: Vec<Student>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteStudentRequest {
    pub student_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteStudentResponse {
    /// False when no student had the given id
    pub deleted: bool,
    pub remaining: usize,
    pub persisted: bool,
    pub warning: Option<String>,
}

/// Display-ready view of one software row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftwareDetail {
    pub name: String,
    pub formatted_install_date: Option<String>,
    pub screenshot: Option<String>,
}

/// Display-ready view of one student for the detail screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentDetailView {
    pub id: String,
    pub name: String,
    pub department: String,
    pub cadd_id: String,
    pub age_label: String,
    pub course_label: String,
    pub pc_model_label: String,
    pub image_url: Option<String>,
    pub software_count: usize,
    pub software: Vec<SoftwareDetail>,
}
