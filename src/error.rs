//! Error types for Plannr
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in Plannr
#[derive(Debug, Error)]
pub enum PlannrError {
    /// User not found in storage
    #[error("User not found: {0}")]
    UserNotFound(i64),

    /// Session not found in storage
    #[error("Session not found: {0}")]
    SessionNotFound(i64),

    /// Invalid date supplied to a command
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Storage/persistence error
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Plannr operations
pub type Result<T> = std::result::Result<T, PlannrError>;
