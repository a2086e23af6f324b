//! Error types for project-tracker
//!
//! Exit codes:
//! - 0: Success
//! - 1: User error (unresolved lookup, invalid input, invalid status)
//! - 2: Store or configuration failure (corrupt store, I/O, bad config)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the project-tracker CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 1;
    pub const STORE_FAILED: i32 = 2;
}

/// Main error type for project-tracker operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 1)
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // Store and configuration failures (exit code 2)
    #[error("Corrupt store {path}: {reason}")]
    CorruptStore { path: PathBuf, reason: String },

    #[error("Store {path} is missing the '{collection}' collection")]
    MissingCollection { path: PathBuf, collection: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::UserNotFound(_)
            | Error::ProjectNotFound(_)
            | Error::TaskNotFound(_)
            | Error::InvalidStatus(_)
            | Error::InvalidEmail(_)
            | Error::InvalidDate(_)
            | Error::InvalidArgument(_) => exit_codes::USER_ERROR,

            // Store and configuration failures
            Error::CorruptStore { .. }
            | Error::MissingCollection { .. }
            | Error::InvalidConfig(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_) => exit_codes::STORE_FAILED,
        }
    }

    /// Structured fields for machine-readable error output
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::UserNotFound(identity) => Some(serde_json::json!({ "identity": identity })),
            Error::ProjectNotFound(key) | Error::TaskNotFound(key) => {
                Some(serde_json::json!({ "key": key }))
            }
            Error::InvalidStatus(value) => Some(serde_json::json!({
                "value": value,
                "allowed": crate::model::TaskStatus::ALL
                    .iter()
                    .map(|status| status.as_str())
                    .collect::<Vec<_>>(),
            })),
            Error::CorruptStore { path, reason } => Some(serde_json::json!({
                "path": path.display().to_string(),
                "reason": reason,
            })),
            Error::MissingCollection { path, collection } => Some(serde_json::json!({
                "path": path.display().to_string(),
                "collection": collection,
            })),
            Error::InvalidConfig(message) => Some(serde_json::json!({ "message": message })),
            _ => None,
        }
    }
}

/// Result type alias for project-tracker operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            error: err.to_string(),
            code: err.exit_code(),
            details: err.details(),
        }
    }
}
