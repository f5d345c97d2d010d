//! Error taxonomy for roster operations.

/// One reason a submitted student form was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StudentValidationError {
    #[error("Name is required")]
    MissingName,
    #[error("Department is required")]
    MissingDepartment,
    #[error("CADD ID is required")]
    MissingCaddId,
    #[error("Age is required")]
    MissingAge,
    #[error("Age must be a whole number, got '{0}'")]
    InvalidAge(String),
    #[error("Course is required")]
    MissingCourse,
    #[error("Department '{0}' is not one of the configured departments")]
    UnknownDepartment(String),
}

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("Please fill in all required fields. {}", describe_validation(.0))]
    Validation(Vec<StudentValidationError>),
    #[error("Failed to persist roster: {0}")]
    Persistence(anyhow::Error),
    #[error("Student not found: {0}")]
    NotFound(String),
}

impl RosterError {
    pub fn validation_errors(&self) -> Option<&[StudentValidationError]> {
        match self {
            RosterError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

fn describe_validation(errors: &[StudentValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
