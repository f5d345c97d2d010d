//! # Domain Module
//!
//! Business logic for the lab roster: the students, the software on their lab
//! PCs, and the rules for accepting, finding and removing them.
//!
//! ## Module Organization
//!
//! - **models**: `Student`, `InstalledSoftware` and id generation
//! - **student_repository**: the shared in-memory roster with two-phase persistence
//! - **search**: multi-field substring search over the roster
//! - **student_form**: form editing, validation and normalization
//! - **student_details**: display formatting for detail screens and cards
//! - **seed**: the demo roster written on first run
//! - **errors**: validation, persistence and not-found errors
//!
//! ## Business Rules
//!
//! - A student needs a name, a department and a CADD id before it is accepted
//! - Software rows with neither a name nor a date are dropped on save
//! - Ids are issued once at creation and never change
//! - CADD ids may repeat across students; nothing rejects duplicates
//! - An empty search shows no students

pub mod errors;
pub mod models;
pub mod search;
pub mod seed;
pub mod student_details;
pub mod student_form;
pub mod student_repository;

pub use errors::*;
pub use search::filter_students;
pub use student_details::StudentDetailsService;
pub use student_form::*;
pub use student_repository::*;
