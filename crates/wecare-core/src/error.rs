//! # Error Types
//!
//! Domain-specific error types for wecare-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  wecare-core errors (this file)                                        │
//! │  ├── CoreError        - General domain errors                          │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── LineError        - A CoreError pinned to one line of a batch      │
//! │                                                                         │
//! │  wecare-db errors (separate crate)                                     │
//! │  └── DbError          - File and database failures                     │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── AppError         - What the terminal user sees                    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → LineError / AppError              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Line Errors Are Recoverable
//! A sale or restock batch never aborts on a bad line. The processor hands
//! back a [`LineError`] and keeps accepting lines; the caller decides whether
//! to re-prompt or move on.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Product cannot be found.
    ///
    /// ## When This Occurs
    /// - Product ID was mistyped at the sale prompt
    /// - Product was never stocked
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Insufficient stock to complete the line.
    ///
    /// ## User Workflow
    /// ```text
    /// Sell P001 (qty: 189)
    ///      │
    ///      ▼
    /// Needs 189 paid + 63 free = 252, on hand: 188
    ///      │
    ///      ▼
    /// InsufficientStock { product_id: "P001", available: 188, requested: 252 }
    ///      │
    ///      ▼
    /// CLI shows: "Only 188 available" and re-prompts
    /// ```
    #[error("Insufficient stock for {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// True when the error means "no such product".
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::ProductNotFound(_))
    }

    /// True when the error is an input problem (bad quantity, cost, field).
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., non-numeric quantity, comma in a name).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    pub fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }

    pub fn must_be_positive(field: &str) -> Self {
        ValidationError::MustBePositive {
            field: field.to_string(),
        }
    }

    pub fn invalid_format(field: &str, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Line Error
// =============================================================================

/// A rejected line inside a sale or restock batch.
///
/// `line` is the 1-based position of the request in the batch, counting
/// rejected lines too, so the caller can point at exactly what was typed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line} ({product_id}): {error}")]
pub struct LineError {
    pub line: usize,
    pub product_id: String,
    pub error: CoreError,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product_id: "P001".to_string(),
            available: 188,
            requested: 252,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for P001: available 188, requested 252"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(
            ValidationError::required("name").to_string(),
            "name is required"
        );
        assert_eq!(
            ValidationError::must_be_positive("quantity").to_string(),
            "quantity must be positive"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("product id").into();
        assert!(core_err.is_invalid_input());
        assert!(!core_err.is_not_found());
    }

    #[test]
    fn test_line_error_display() {
        let err = LineError {
            line: 2,
            product_id: "P404".to_string(),
            error: CoreError::ProductNotFound("P404".to_string()),
        };
        assert_eq!(err.to_string(), "line 2 (P404): Product not found: P404");
    }
}
