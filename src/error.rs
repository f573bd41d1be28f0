//! Error types for Reflog
//!
//! This module defines all error types used throughout the service,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Reflog operations
///
/// Covers request validation, ownership and session-state checks, provider
/// interactions, storage and configuration failures.
#[derive(Error, Debug)]
pub enum ReflogError {
    /// Malformed or out-of-range input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The caller could not be identified
    #[error("Authentication required")]
    Unauthenticated,

    /// The session does not exist or is owned by someone else
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// The session already has a summary and accepts no more messages
    #[error("Session is already closed: {0}")]
    SessionClosed(String),

    /// Provider-related errors (unreachable, non-success status, empty output)
    #[error("Provider error: {0}")]
    Provider(String),

    /// The provider credential is not configured
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Session store errors (database operations)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<rusqlite::Error> for ReflogError {
    fn from(e: rusqlite::Error) -> Self {
        ReflogError::Storage(e.to_string())
    }
}

/// Result type alias for Reflog operations
///
/// Uses `anyhow::Error` so callers can attach context while the HTTP layer
/// can still downcast to [`ReflogError`].
pub type Result<T> = anyhow::Result<T>;
