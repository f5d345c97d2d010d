//! Domain model for a student on the lab roster.
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub age: Option<i32>,
    pub department: String,
    pub course: Option<String>,
    pub cadd_id: String,
    pub pc_model: Option<String>,
    pub image_url: Option<String>,
    pub installed_software: Vec<InstalledSoftware>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstalledSoftware {
    pub name: String,
    pub install_date: String,
    pub image: Option<String>,
}

impl InstalledSoftware {
    /// Rows where both the name and the date are blank carry no information
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty() && self.install_date.trim().is_empty()
    }
}

impl Student {
    pub fn software_names(&self) -> impl Iterator<Item = &str> {
        self.installed_software.iter().map(|s| s.name.as_str())
    }
}

/// Issues student ids from the wall clock in epoch milliseconds.
///
/// Two ids issued in the same millisecond (or after the clock steps back)
/// still come out strictly increasing.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last_issued: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A generator that never issues an id at or below the largest numeric
    /// id already on `roster`
    pub fn starting_after(roster: &[Student]) -> Self {
        let highest = roster
            .iter()
            .filter_map(|student| student.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self {
            last_issued: AtomicU64::new(highest),
        }
    }

    pub fn next_id(&self) -> String {
        let now_millis = Utc::now().timestamp_millis().max(0) as u64;
        self.next_id_at(now_millis)
    }

    fn next_id_at(&self, now_millis: u64) -> String {
        let mut previous = self.last_issued.load(Ordering::Relaxed);
        loop {
            let candidate = now_millis.max(previous + 1);
            match self.last_issued.compare_exchange_weak(
                previous,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate.to_string(),
                Err(actual) => previous = actual,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_strictly_increasing_within_a_millisecond() {
        let generator = IdGenerator::new();
        let first = generator.next_id_at(1_700_000_000_000);
        let second = generator.next_id_at(1_700_000_000_000);
        let after_clock_step_back = generator.next_id_at(1_600_000_000_000);

        assert_eq!(first, "1700000000000");
        assert_eq!(second, "1700000000001");
        assert_eq!(after_clock_step_back, "1700000000002");
    }

    #[test]
    fn test_ids_continue_past_existing_roster() {
        let existing = |id: &str| Student {
            id: id.to_string(),
            name: "Existing".to_string(),
            age: None,
            department: "CADD".to_string(),
            course: None,
            cadd_id: "CADD1".to_string(),
            pc_model: None,
            image_url: None,
            installed_software: Vec::new(),
        };
        let roster = vec![existing("1700000000500"), existing("legacy-id"), existing("42")];

        let generator = IdGenerator::starting_after(&roster);

        // Clock behind the newest stored id
        assert_eq!(generator.next_id_at(1_700_000_000_000), "1700000000501");
        assert_eq!(IdGenerator::starting_after(&[]).next_id_at(5), "5");
    }

    #[test]
    fn test_wall_clock_ids_are_unique() {
        let generator = IdGenerator::new();
        let ids: Vec<String> = (0..50).map(|_| generator.next_id()).collect();
        let mut deduped = ids.clone();
        deduped.dedup();
        assert_eq!(ids, deduped);
    }

    #[test]
    fn test_blank_software_rows() {
        let blank = InstalledSoftware {
            name: "  ".to_string(),
            install_date: String::new(),
            image: None,
        };
        let dated_only = InstalledSoftware {
            name: String::new(),
            install_date: "01/02/2024".to_string(),
            image: None,
        };
        assert!(blank.is_blank());
        assert!(!dated_only.is_blank());
    }
}
