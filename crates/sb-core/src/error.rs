//! # AppError
//!
//! Centralized error handling for the Signboard workspace.
//! Maps workflow failures to actionable error types.

use thiserror::Error;

/// The primary error type for all sb-core and sb-services operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Resource not found (e.g., Announcement, Account)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Validation failure (e.g., empty title, zero display duration)
    #[error("validation error: {0}")]
    ValidationError(String),

    /// The principal is known but lacks permission for the action
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Credential failure (e.g., unknown email, wrong password)
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Resource already exists (e.g., duplicate account email)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Infrastructure failure (e.g., store write failed, corrupt JSON)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        AppError::NotFound(entity.to_string(), id.to_string())
    }

    /// Wraps a port (adapter) failure. Ports speak `anyhow`, services speak `AppError`.
    pub fn internal(err: impl std::fmt::Display) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("serialization: {err}"))
    }
}

/// A specialized Result type for Signboard logic.
pub type Result<T> = std::result::Result<T, AppError>;
