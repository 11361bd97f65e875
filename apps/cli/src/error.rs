//! # Application Error Type
//!
//! Unified error type for `wecare` commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CoreError   ──┐                                                        │
//! │  DbError     ──┼──► AppError { code, message } ──► stderr + exit code   │
//! │  ConfigError ──┤                                                        │
//! │  io::Error   ──┘                                                        │
//! │                                                                         │
//! │  Storage internals are logged with tracing::error! and shown to staff   │
//! │  as a generic message.                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Line-level problems during a sale or restock never reach this type: they
//! are reported at the prompt and the batch carries on.

use serde::Serialize;
use wecare_core::{CoreError, ValidationError};
use wecare_db::DbError;

use crate::config::ConfigError;

/// Error returned from a command.
#[derive(Debug, Clone, Serialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct AppError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ValidationError,
    InsufficientStock,
    /// Catalog, document or database failure
    StorageError,
    ConfigError,
    Internal,
}

impl ErrorCode {
    /// Process exit status for this error (sysexits.h where one fits).
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorCode::NotFound | ErrorCode::ValidationError | ErrorCode::InsufficientStock => 65,
            ErrorCode::StorageError => 74,
            ErrorCode::ConfigError => 78,
            ErrorCode::Internal => 70,
        }
    }
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        AppError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Internal, message)
    }
}

/// Converts storage errors to application errors.
impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => AppError::not_found(&entity, &id),
            DbError::Parse { path, line, reason } => AppError::new(
                ErrorCode::StorageError,
                format!(
                    "Catalog file {} is damaged at line {}: {}",
                    path.display(),
                    line,
                    reason
                ),
            ),
            DbError::Io(e) => {
                tracing::error!("File operation failed: {}", e);
                AppError::new(ErrorCode::StorageError, "Could not read or write store files")
            }
            DbError::Validation(e) => AppError::validation(e.to_string()),
            DbError::ConnectionFailed(_) => {
                AppError::new(ErrorCode::StorageError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                AppError::new(ErrorCode::StorageError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                AppError::new(ErrorCode::StorageError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                AppError::new(ErrorCode::StorageError, "Database transaction failed")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal storage error: {}", e);
                AppError::new(ErrorCode::StorageError, "Storage operation failed")
            }
        }
    }
}

/// Converts core errors to application errors.
impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => AppError::not_found("Product", &id),
            CoreError::InsufficientStock {
                product_id,
                available,
                requested,
            } => AppError::new(
                ErrorCode::InsufficientStock,
                format!(
                    "Insufficient stock for {}: {} available, {} requested",
                    product_id, available, requested
                ),
            ),
            CoreError::Validation(e) => AppError::validation(e.to_string()),
        }
    }
}

/// Input rejected before it reaches the processor (party names, `--item`).
impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::new(ErrorCode::ConfigError, err.to_string())
    }
}

/// Terminal I/O failures (closed stdout, unreadable stdin).
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("Terminal I/O failed: {}", err);
        AppError::internal(format!("Terminal I/O failed: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::internal(format!("JSON output failed: {}", err))
    }
}

/// Result type for commands.
pub type AppResult<T> = Result<T, AppError>;
