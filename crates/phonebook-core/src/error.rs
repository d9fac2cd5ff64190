//! Error types for the phonebook service
//!
//! This module defines all error types used throughout the crate.
//! Turning an [`Error`] into something a caller may see is the job of
//! [`crate::outcome::classify`], never of the code that raised it.

use thiserror::Error;

use crate::rules::Rejection;

/// Result type alias for phonebook operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the phonebook service
#[derive(Error, Debug)]
pub enum Error {
    /// Caller input broke a format or uniqueness rule
    #[error("Validation failed: {0}")]
    Validation(Rejection),

    /// Identifier does not have the shape the store expects
    #[error("Malformed identifier: {0}")]
    MalformedId(String),

    /// No live record for the identifier
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A storage-level constraint rejected the write
    #[error("{0}")]
    Constraint(String),

    /// Directory store-related errors
    #[error("Directory store error: {0}")]
    Store(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a malformed identifier error
    pub fn malformed_id(id: impl Into<String>) -> Self {
        Self::MalformedId(id.into())
    }

    /// Create a "not found" error
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    /// Create a storage constraint error
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }

    /// Create a directory store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<Rejection> for Error {
    fn from(rejection: Rejection) -> Self {
        Self::Validation(rejection)
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
