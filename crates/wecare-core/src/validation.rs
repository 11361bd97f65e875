//! # Validation Module
//!
//! Input validation for line requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI prompt                                                   │
//! │  ├── parse_quantity / Money::parse on raw text                         │
//! │  └── Immediate re-prompt on failure                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Transaction Processor                                        │
//! │  └── THIS MODULE: positive amounts, usable display fields              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Inventory Store                                              │
//! │  └── quantity never below zero                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::NewCustomer;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted display string (name, brand, origin).
pub const MAX_FIELD_LEN: usize = 200;

/// Highest accepted unit cost (Rs. 10,000,000.00). Keeps the doubled
/// selling price and line totals well inside `i64` minor units.
pub const MAX_COST_PRICE: Money = Money::from_major(10_000_000);

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product ID.
///
/// ## Rules
/// - Must not be blank
/// - No commas or line breaks (the catalog file is comma separated and does
///   not escape)
///
/// ```rust
/// use wecare_core::validation::validate_product_id;
///
/// assert!(validate_product_id("P001").is_ok());
/// assert!(validate_product_id("  ").is_err());
/// assert!(validate_product_id("P0,01").is_err());
/// ```
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::required("product id"));
    }
    reject_separators("product id", id)
}

/// Validates an optional display field (name, brand, origin).
///
/// Blank is allowed here; whether a blank value is acceptable depends on
/// whether the product already exists, which the processor decides.
pub fn validate_display_field(field: &str, value: &str) -> ValidationResult<()> {
    if value.len() > MAX_FIELD_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_FIELD_LEN,
        });
    }
    reject_separators(field, value)
}

fn reject_separators(field: &str, value: &str) -> ValidationResult<()> {
    if value.contains(',') || value.contains('\n') || value.contains('\r') {
        return Err(ValidationError::invalid_format(
            field,
            "must not contain commas or line breaks",
        ));
    }
    Ok(())
}

/// Validates customer details: a name is required, every field must fit a
/// comma-separated record.
///
/// ```rust
/// use wecare_core::validation::validate_new_customer;
/// use wecare_core::NewCustomer;
///
/// assert!(validate_new_customer(&NewCustomer::new("Asha Rao").phone("98450 12345")).is_ok());
/// assert!(validate_new_customer(&NewCustomer::new(" ")).is_err());
/// assert!(validate_new_customer(&NewCustomer::new("Asha").address("12, MG Road")).is_err());
/// ```
pub fn validate_new_customer(customer: &NewCustomer) -> ValidationResult<()> {
    if customer.name.trim().is_empty() {
        return Err(ValidationError::required("customer name"));
    }
    validate_display_field("customer name", &customer.name)?;
    validate_display_field("email", &customer.email)?;
    validate_display_field("phone", &customer.phone)?;
    validate_display_field("address", &customer.address)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ```rust
/// use wecare_core::validation::validate_quantity;
///
/// assert!(validate_quantity(1).is_ok());
/// assert!(validate_quantity(0).is_err());
/// assert!(validate_quantity(-3).is_err());
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::must_be_positive("quantity"));
    }
    Ok(())
}

/// Validates a unit cost price. Zero-cost stock is not allowed.
///
/// ```rust
/// use wecare_core::money::Money;
/// use wecare_core::validation::{validate_cost_price, MAX_COST_PRICE};
///
/// assert!(validate_cost_price(MAX_COST_PRICE).is_ok());
/// assert!(validate_cost_price(Money::parse("50000000000000000").unwrap()).is_err());
/// ```
pub fn validate_cost_price(cost: Money) -> ValidationResult<()> {
    if !cost.is_positive() {
        return Err(ValidationError::must_be_positive("cost price"));
    }
    if cost > MAX_COST_PRICE {
        return Err(ValidationError::invalid_format(
            "cost price",
            format!("must be at most {}", MAX_COST_PRICE),
        ));
    }
    Ok(())
}

/// Parses a quantity typed at a prompt.
///
/// ```rust
/// use wecare_core::validation::parse_quantity;
///
/// assert_eq!(parse_quantity(" 9 ").unwrap(), 9);
/// assert!(parse_quantity("nine").is_err());
/// ```
pub fn parse_quantity(input: &str) -> ValidationResult<i64> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::invalid_format("quantity", "expected a whole number"))
}

// =============================================================================
// Unit Tests
// =============================================================================
