//! Test utilities for storage-backed tests
//!
//! `TestEnvironment` owns a temporary directory holding an on-disk database;
//! the directory is removed when the environment is dropped, even if the test panics.

use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tempfile::TempDir;

use super::connection::DbConnection;
use super::roster_store::{RosterStore, DEFAULT_ROSTER_KEY};
use super::traits::{RecordStorage, StoredRoster};
use crate::domain::models::Student;

/// RAII test environment backed by a temporary database file
pub struct TestEnvironment {
    /// Kept alive so the directory survives until drop
    _temp_dir: TempDir,
    pub connection: DbConnection,
    pub base_path: PathBuf,
}

impl TestEnvironment {
    pub async fn new() -> Result<Self> {
        let temp_dir = TempDir::with_prefix("lab_roster_test_")?;
        let base_path = temp_dir.path().to_path_buf();
        let connection = DbConnection::open_file(&base_path.join("roster.db")).await?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            connection,
            base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_path
    }

    pub fn roster_store(&self) -> RosterStore {
        RosterStore::new(self.connection.clone(), DEFAULT_ROSTER_KEY)
    }
}

/// In-memory record store whose writes can be switched to fail
#[derive(Default)]
pub struct FlakyRecordStorage {
    stored: Mutex<Option<Vec<Student>>>,
    fail_saves: AtomicBool,
    save_count: AtomicUsize,
}

impl FlakyRecordStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_roster(roster: Vec<Student>) -> Self {
        let storage = Self::default();
        *storage.stored.lock().unwrap() = Some(roster);
        storage
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    pub fn stored(&self) -> Option<Vec<Student>> {
        self.stored.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordStorage for FlakyRecordStorage {
    async fn load(&self) -> StoredRoster {
        match self.stored() {
            Some(roster) => StoredRoster::Saved(roster),
            None => StoredRoster::NeverSaved,
        }
    }

    async fn save(&self, roster: &[Student]) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            anyhow::bail!("simulated storage failure");
        }
        *self.stored.lock().unwrap() = Some(roster.to_vec());
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.stored.lock().unwrap() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_environment_cleanup() -> Result<()> {
        let base_path;

        {
            let env = TestEnvironment::new().await?;
            base_path = env.base_directory().to_path_buf();
            assert!(base_path.join("roster.db").exists());
            env.connection.close().await;
        }

        assert!(!base_path.exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_flaky_storage_fails_on_demand() -> Result<()> {
        let storage = FlakyRecordStorage::new();
        storage.save(&[]).await?;
        assert_eq!(storage.save_count(), 1);

        storage.set_fail_saves(true);
        assert!(storage.save(&[]).await.is_err());
        assert_eq!(storage.save_count(), 1);
        Ok(())
    }
}
