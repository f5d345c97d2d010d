//! # Storage Module
//!
//! Persists the roster on the device.
//!
//! The device offers a plain key-value table (`connection`). On top of it the
//! `RosterStore` keeps exactly one logical value: the whole roster, serialized
//! as JSON under a single fixed key. Every write replaces the entire value, so
//! there are no partial writes and no field-level patches.
//!
//! ## Known limitation
//!
//! The stored value carries no version. Two independent writers (another
//! process, a second app instance) racing a read-modify-write cycle resolve as
//! last write wins; the earlier mutation is silently lost.

pub mod connection;
pub mod roster_store;
pub mod traits;

#[cfg(test)]
pub mod test_utils;

pub use connection::DbConnection;
pub use roster_store::{RosterStore, DEFAULT_ROSTER_KEY};
pub use traits::{RecordStorage, StoredRoster};
