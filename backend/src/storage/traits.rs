//! # Storage Traits
//!
//! The record-store abstraction the domain layer persists the roster through.
//! Implementations hold exactly one logical value: the whole roster.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::Student;

/// What a record store found when asked for the roster
#[derive(Debug, Clone, PartialEq)]
pub enum StoredRoster {
    /// Nothing has ever been written under the roster key
    NeverSaved,
    /// The stored roster, in stored order
    Saved(Vec<Student>),
    /// A value exists (or the read failed) but it could not be turned into a roster
    Unreadable(String),
}

impl StoredRoster {
    /// Collapse to a roster, treating every failure as "no data yet"
    pub fn into_students(self) -> Vec<Student> {
        match self {
            StoredRoster::Saved(students) => students,
            StoredRoster::NeverSaved | StoredRoster::Unreadable(_) => Vec::new(),
        }
    }

    pub fn is_never_saved(&self) -> bool {
        matches!(self, StoredRoster::NeverSaved)
    }
}

/// Trait defining whole-value persistence of the roster
///
/// There are no partial writes: `save` replaces whatever was stored before.
#[async_trait]
pub trait RecordStorage: Send + Sync {
    /// Read and deserialize the stored roster
    async fn load(&self) -> StoredRoster;

    /// Serialize and write the full roster, replacing any prior value
    async fn save(&self, roster: &[Student]) -> Result<()>;

    /// Remove the stored value entirely
    async fn clear(&self) -> Result<()>;

    /// Release underlying resources; called once at shutdown
    async fn close(&self) {}
}
