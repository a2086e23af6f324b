//! project-tracker - Users, projects and tasks in a JSON flat file
//!
//! This library provides the core functionality for the project-tracker CLI.
//!
//! # Core Concepts
//!
//! - **Store**: one JSON file holding the `users`, `projects` and `tasks`
//!   collections, read whole and rewritten whole
//! - **Repository**: the loaded collections; assigns ids, serves lookups and
//!   updates in memory, persists only on explicit commit
//! - **Identity resolution**: maps a typed name, email or title to an entity
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `config.toml`
//! - `error`: Error types and result aliases
//! - `model`: Entity records and the task status guard
//! - `output`: Human and JSON output
//! - `repository`: In-memory collections over a loaded snapshot
//! - `resolve`: Identity and title resolution
//! - `storage`: The JSON backing file
//! - `validate`: Email and due-date validation

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod repository;
pub mod resolve;
pub mod storage;
pub mod validate;

pub use error::{Error, Result};
pub use repository::Repository;
pub use storage::{Snapshot, Store};
