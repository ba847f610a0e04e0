//! Error handling module
//!
//! Provides unified error types and handling for the entire application.

use thiserror::Error;
use tracing::error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Stored data breaks an invariant the reports rely on
    #[error("Data integrity error: {0}")]
    Integrity(String),

    #[error("Unknown chamber: {0}")]
    UnknownChamber(String),

    #[error("Document fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Stable machine-readable code for logs and JSON output
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Pool(_) => "POOL_EXHAUSTED",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Integrity(_) => "INTEGRITY_ERROR",
            AppError::UnknownChamber(_) => "UNKNOWN_CHAMBER",
            AppError::Fetch(_) => "FETCH_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Log the error at a level matching its severity
    pub fn log(&self) {
        match self {
            AppError::Database(e) => error!("Database error: {:?}", e),
            AppError::Pool(e) => error!("Pool error: {:?}", e),
            AppError::Integrity(msg) => error!("Integrity error: {}", msg),
            AppError::Internal(msg) => error!("Internal error: {}", msg),
            AppError::Config(msg) => error!("Configuration error: {}", msg),
            other => tracing::warn!("{} ({})", other, other.error_code()),
        }
    }
}

/// Failure while downloading an amendment's full-text document.
///
/// Kept apart from [`AppError`] so callers can tell "no document" (a size of
/// zero) from "the document could not be fetched".
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid document URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: std::time::Duration },

    #[error("Cannot connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("Server answered {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request to {url} failed: {reason}")]
    Request { url: String, reason: String },
}

/// Result type alias used across the crate
pub type AppResult<T> = Result<T, AppError>;

/// Helper function to create a validation error
pub fn validation_error(msg: impl Into<String>) -> AppError {
    AppError::Validation(msg.into())
}

/// Helper function to create a not found error
pub fn not_found_error(msg: impl Into<String>) -> AppError {
    AppError::NotFound(msg.into())
}
