//! # Lab Roster Backend
//!
//! All non-UI logic for managing a club's student roster and the software
//! installed on their lab PCs.
//!
//! ## Architecture
//!
//! ```text
//! Screens (list, add/edit form, detail)
//!     ↓
//! IO Layer (commands, DTO mappers)
//!     ↓
//! Domain Layer (repository, search, form validation)
//!     ↓
//! Storage Layer (record store over the device key-value table)
//! ```
//!
//! One `AppState` is built at startup with `initialize_backend` and shared by
//! every screen, so all screens see the same in-memory roster. Call
//! `AppState::shutdown` when the app exits.

pub mod config;
pub mod domain;
pub mod io;
pub mod logging;
pub mod storage;

use anyhow::{Context, Result};
use log::info;
use std::sync::Arc;

use crate::config::RosterConfig;
use crate::domain::seed::demo_roster;
use crate::domain::{StudentDetailsService, StudentFormService, StudentRepository};
use crate::storage::{DbConnection, RecordStorage, RosterStore};

pub use config::DepartmentPolicy;

/// Application state holding every service; cheap to clone and share
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RosterConfig>,
    pub student_repository: StudentRepository,
    pub student_form_service: StudentFormService,
    pub student_details_service: StudentDetailsService,
}

impl AppState {
    /// Release storage; the state must not be used afterwards
    pub async fn shutdown(&self) {
        info!("Shutting down roster backend");
        self.student_repository.close().await;
    }
}

/// Open the on-device database named by `config` and load the roster
pub async fn initialize_backend(config: RosterConfig) -> Result<AppState> {
    let database_path = config.storage.database_path();

    info!("Setting up database");
    let connection = DbConnection::open_file(&database_path)
        .await
        .with_context(|| format!("Failed to open roster database at {}", database_path.display()))?;
    let store = Arc::new(RosterStore::new(connection, config.storage.roster_key.clone()));

    Ok(initialize_backend_with_store(config, store).await)
}

/// Build the application state over an already-constructed record store
pub async fn initialize_backend_with_store(
    config: RosterConfig,
    store: Arc<dyn RecordStorage>,
) -> AppState {
    info!("Loading roster");
    let student_repository = if config.seed_demo_roster {
        StudentRepository::open_with_seed(store, demo_roster()).await
    } else {
        StudentRepository::open(store).await
    };

    info!("Setting up domain services");
    let student_form_service =
        StudentFormService::new(config.form.clone(), &student_repository.list());
    let student_details_service = StudentDetailsService::new();

    AppState {
        config: Arc::new(config),
        student_repository,
        student_form_service,
        student_details_service,
    }
}
