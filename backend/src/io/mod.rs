//! # IO Module
//!
//! The boundary between screens and the domain: DTO mappers plus the command
//! functions screens call. Nothing in here holds business rules.

pub mod mappers;
pub mod roster_commands;

pub use roster_commands::*;
