//! Roster search used by the student list screen.
//!
//! A student matches when the trimmed, lowercased query is a substring of the
//! name, the CADD id, the department, or the name of any installed software.
//! An empty query matches nothing: the list stays empty until the user types.

use super::models::Student;

/// Normalize raw search box text into the form used for matching
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

pub fn student_matches(student: &Student, normalized_query: &str) -> bool {
    if normalized_query.is_empty() {
        return false;
    }

    let contains = |field: &str| field.to_lowercase().contains(normalized_query);

    contains(student.name.as_str())
        || contains(student.cadd_id.as_str())
        || contains(student.department.as_str())
        || student.software_names().any(contains)
}

/// Return the matching students in roster order
pub fn filter_students(query: &str, roster: &[Student]) -> Vec<Student> {
    let normalized = normalize_query(query);
    if normalized.is_empty() {
        return Vec::new();
    }

    roster
        .iter()
        .filter(|student| student_matches(student, &normalized))
        .cloned()
        .collect()
}
