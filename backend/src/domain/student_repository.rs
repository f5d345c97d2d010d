//! The in-memory roster shared by every screen.
//!
//! One `StudentRepository` is built at startup and handed to each screen.
//! Mutations are two-phase: they are applied to the in-memory roster at once
//! (so screens can re-render immediately) and produce a `PendingWrite` that
//! persists the resulting snapshot through the record store. A failed write
//! leaves memory ahead of storage until the next successful write; the cache
//! is never rolled back on its own.

use log::{error, info, warn};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::Mutex;

use super::errors::RosterError;
use super::models::Student;
use super::search::filter_students;
use crate::storage::{RecordStorage, StoredRoster};

#[derive(Debug, Default)]
struct RosterCache {
    students: Vec<Student>,
    /// Bumped on every staged mutation
    revision: u64,
}

#[derive(Clone)]
pub struct StudentRepository {
    cache: Arc<RwLock<RosterCache>>,
    store: Arc<dyn RecordStorage>,
    /// Highest revision whose snapshot the store holds
    written_revision: Arc<Mutex<u64>>,
}

/// A roster snapshot applied in memory and waiting to be written
#[must_use = "the roster is only in memory until the write is persisted"]
pub struct PendingWrite {
    roster: Vec<Student>,
    changed: bool,
    revision: u64,
    store: Arc<dyn RecordStorage>,
    written_revision: Arc<Mutex<u64>>,
}

/// Result of a mutation after the persistence attempt
#[derive(Debug)]
pub struct WriteOutcome {
    /// The roster as it now stands in memory
    pub roster: Vec<Student>,
    /// False when the mutation was a no-op (e.g. removing an unknown id)
    pub changed: bool,
    pub persistence: Result<(), RosterError>,
}

impl WriteOutcome {
    pub fn is_persisted(&self) -> bool {
        self.persistence.is_ok()
    }

    /// User-facing warning when memory and storage have diverged
    pub fn warning(&self) -> Option<String> {
        self.persistence
            .as_ref()
            .err()
            .map(|e| format!("Changes are shown but could not be saved to the device: {}", e))
    }
}

impl PendingWrite {
    /// The roster this write will persist
    pub fn roster(&self) -> &[Student] {
        &self.roster
    }

    /// Write the snapshot to the record store.
    ///
    /// Writes from one repository land in the order they were staged: a
    /// snapshot older than one the store already holds is skipped, since the
    /// newer snapshot contains its change. A failed save leaves the written
    /// revision where it was.
    pub async fn persist(self) -> WriteOutcome {
        let mut written_revision = self.written_revision.lock().await;

        if *written_revision > self.revision {
            info!(
                "Skipping roster snapshot {} (snapshot {} already written)",
                self.revision, *written_revision
            );
            return WriteOutcome {
                roster: self.roster,
                changed: self.changed,
                persistence: Ok(()),
            };
        }

        let persistence = self
            .store
            .save(&self.roster)
            .await
            .map_err(RosterError::Persistence);

        match &persistence {
            Ok(()) => *written_revision = self.revision,
            Err(e) => error!("Error saving roster snapshot {}: {:#}", self.revision, e),
        }

        WriteOutcome {
            roster: self.roster,
            changed: self.changed,
            persistence,
        }
    }
}

impl StudentRepository {
    /// Load the roster from the store; any load failure starts from an empty roster
    pub async fn open(store: Arc<dyn RecordStorage>) -> Self {
        let students = store.load().await.into_students();
        info!("Opened roster with {} students", students.len());
        Self::from_parts(store, students)
    }

    /// Like `open`, but seeds `seed` when nothing has ever been stored.
    ///
    /// An unreadable stored value is not overwritten by the seed.
    pub async fn open_with_seed(store: Arc<dyn RecordStorage>, seed: Vec<Student>) -> Self {
        match store.load().await {
            StoredRoster::NeverSaved => {
                info!("First run, seeding roster with {} students", seed.len());
                let repository = Self::from_parts(store, Vec::new());
                let outcome = repository
                    .stage(|students| {
                        *students = seed;
                        true
                    })
                    .persist()
                    .await;
                if let Some(warning) = outcome.warning() {
                    warn!("{}", warning);
                }
                repository
            }
            loaded => {
                let students = loaded.into_students();
                info!("Opened roster with {} students", students.len());
                Self::from_parts(store, students)
            }
        }
    }

    fn from_parts(store: Arc<dyn RecordStorage>, students: Vec<Student>) -> Self {
        Self {
            cache: Arc::new(RwLock::new(RosterCache {
                students,
                revision: 0,
            })),
            store,
            written_revision: Arc::new(Mutex::new(0)),
        }
    }

    fn read_cache(&self) -> RwLockReadGuard<'_, RosterCache> {
        self.cache.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_cache(&self) -> RwLockWriteGuard<'_, RosterCache> {
        self.cache.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `mutate` to the cached roster and snapshot the result
    fn stage(&self, mutate: impl FnOnce(&mut Vec<Student>) -> bool) -> PendingWrite {
        let mut cache = self.write_cache();
        let changed = mutate(&mut cache.students);
        cache.revision += 1;

        PendingWrite {
            roster: cache.students.clone(),
            changed,
            revision: cache.revision,
            store: Arc::clone(&self.store),
            written_revision: Arc::clone(&self.written_revision),
        }
    }

    /// The whole roster in insertion order
    pub fn list(&self) -> Vec<Student> {
        self.read_cache().students.clone()
    }

    pub fn len(&self) -> usize {
        self.read_cache().students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_cache().students.is_empty()
    }

    pub fn find_by_id(&self, id: &str) -> Option<Student> {
        self.read_cache()
            .students
            .iter()
            .find(|student| student.id == id)
            .cloned()
    }

    /// Like `find_by_id` for callers that need the student to exist
    pub fn require(&self, id: &str) -> Result<Student, RosterError> {
        self.find_by_id(id)
            .ok_or_else(|| RosterError::NotFound(id.to_string()))
    }

    /// Students matching a search query, in roster order
    pub fn filter(&self, query: &str) -> Vec<Student> {
        filter_students(query, &self.read_cache().students)
    }

    /// Replace the student with the same id in place, or append it
    pub fn stage_upsert(&self, student: Student) -> PendingWrite {
        self.stage(|students| {
            match students.iter().position(|existing| existing.id == student.id) {
                Some(index) => students[index] = student,
                None => students.push(student),
            }
            true
        })
    }

    /// Remove the student with `id`; removing an unknown id is not an error
    pub fn stage_remove(&self, id: &str) -> PendingWrite {
        self.stage(|students| {
            let before = students.len();
            students.retain(|student| student.id != id);
            students.len() != before
        })
    }

    pub async fn upsert(&self, student: Student) -> WriteOutcome {
        info!("Saving student {} ({})", student.name, student.id);
        self.stage_upsert(student).persist().await
    }

    pub async fn remove(&self, id: &str) -> WriteOutcome {
        info!("Removing student {}", id);
        let outcome = self.stage_remove(id).persist().await;
        if !outcome.changed {
            warn!("Student {} was not on the roster", id);
        }
        outcome
    }

    /// Re-read the store into memory, e.g. after another process wrote to it.
    ///
    /// An unreadable store leaves the in-memory roster as it is. Writes
    /// staged before a successful reload are dropped instead of persisted.
    pub async fn reload(&self) -> usize {
        let mut written_revision = self.written_revision.lock().await;

        match self.store.load().await {
            StoredRoster::Unreadable(reason) => {
                warn!("Keeping in-memory roster, store unreadable: {}", reason);
                self.len()
            }
            loaded => {
                let students = loaded.into_students();
                let count = students.len();
                let mut cache = self.write_cache();
                cache.students = students;
                cache.revision += 1;
                *written_revision = cache.revision;
                count
            }
        }
    }

    /// Release the record store at shutdown
    pub async fn close(&self) {
        self.store.close().await;
    }
}
