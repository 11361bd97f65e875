//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With float cost prices:                                                │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (paise / cents)                      │
//! │    Rs. 280.50 is stored as 28050                                        │
//! │    9 × (Rs. 1000.00 × 2) = 1_800_000 minor units, exactly               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use wecare_core::money::Money;
//!
//! let cost = Money::parse("280.5").unwrap();
//! assert_eq!(cost.minor_units(), 28_050);
//! assert_eq!(cost.to_string(), "280.50");
//! assert_eq!((cost * 2).to_string(), "561.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};

use crate::error::ValidationError;

/// Minor units per major unit (100 paise to the rupee).
const MINOR_PER_MAJOR: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: differences and deltas can be negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **No symbol**: `Display` prints `1234.50`; the currency symbol is a
///   presentation concern handled by `document::DocumentStyle`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from whole major units.
    ///
    /// ```rust
    /// use wecare_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(1000).minor_units(), 100_000);
    /// ```
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * MINOR_PER_MAJOR)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor_units(&self) -> i64 {
        self.0
    }

    /// Returns the whole major-unit portion (truncated toward zero).
    #[inline]
    pub const fn major_part(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the minor-unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is strictly greater than zero.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Multiplies a unit amount by a quantity.
    ///
    /// ```rust
    /// use wecare_core::money::Money;
    ///
    /// let selling_price = Money::from_major(2000);
    /// assert_eq!(selling_price.multiply_quantity(9), Money::from_major(18_000));
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Like [`Money::multiply_quantity`], but `None` on overflow.
    #[inline]
    pub fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        self.0.checked_mul(qty).map(Money)
    }

    /// Sum of two amounts, `None` on overflow.
    ///
    /// ```rust
    /// use wecare_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(1).checked_add(Money::from_minor(50)), Some(Money::from_minor(150)));
    /// assert_eq!(Money::from_minor(i64::MAX).checked_add(Money::from_minor(1)), None);
    /// ```
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Parses a decimal amount such as `1000`, `1000.0` or `280.50`.
    ///
    /// ## Rules
    /// - Optional leading `-`
    /// - At most two fractional digits (anything finer cannot be represented
    ///   exactly and is rejected instead of rounded)
    /// - Surrounding whitespace is ignored
    ///
    /// ```rust
    /// use wecare_core::money::Money;
    ///
    /// assert_eq!(Money::parse("1000").unwrap(), Money::from_major(1000));
    /// assert_eq!(Money::parse("1000.0").unwrap(), Money::from_major(1000));
    /// assert!(Money::parse("12.345").is_err());
    /// assert!(Money::parse("abc").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Money, ValidationError> {
        let text = input.trim();
        let invalid = |reason: &str| ValidationError::invalid_format("amount", reason);

        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };

        let (whole, frac) = match digits.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (digits, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(invalid("expected a number"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("expected a number"));
        }
        if frac.len() > 2 {
            return Err(invalid("at most two decimal places"));
        }

        let major: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("amount too large"))?
        };
        let minor: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid("expected a number"))? * 10,
            _ => frac.parse().map_err(|_| invalid("expected a number"))?,
        };

        let total = major
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|m| m.checked_add(minor))
            .ok_or_else(|| invalid("amount too large"))?;

        Ok(Money(if negative { -total } else { total }))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Two fixed decimals, no currency symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major_part().abs(), self.minor_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Multiplication by a quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minor_and_major() {
        let money = Money::from_minor(28_050);
        assert_eq!(money.major_part(), 280);
        assert_eq!(money.minor_part(), 50);
        assert_eq!(Money::from_major(700).minor_units(), 70_000);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_major(18_000).to_string(), "18000.00");
        assert_eq!(Money::from_minor(28_050).to_string(), "280.50");
        assert_eq!(Money::from_minor(5).to_string(), "0.05");
        assert_eq!(Money::from_minor(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_parse_accepts_catalog_spellings() {
        assert_eq!(Money::parse("1000").unwrap(), Money::from_major(1000));
        assert_eq!(Money::parse(" 1000.0 ").unwrap(), Money::from_major(1000));
        assert_eq!(Money::parse("280.5").unwrap(), Money::from_minor(28_050));
        assert_eq!(Money::parse("280.55").unwrap(), Money::from_minor(28_055));
        assert_eq!(Money::parse(".5").unwrap(), Money::from_minor(50));
        assert_eq!(Money::parse("-3").unwrap(), Money::from_minor(-300));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Money::parse("").is_err());
        assert!(Money::parse(".").is_err());
        assert!(Money::parse("12.345").is_err());
        assert!(Money::parse("1e3").is_err());
        assert!(Money::parse("ten").is_err());
        assert!(Money::parse("99999999999999999999").is_err());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_major(10);
        let b = Money::from_major(5);

        assert_eq!((a + b).minor_units(), 1500);
        assert_eq!((a - b).minor_units(), 500);
        assert_eq!((a * 3).minor_units(), 3000);

        let mut running = Money::zero();
        running += a;
        assert_eq!(running, a);
    }

    #[test]
    fn test_sum() {
        let total: Money = [Money::from_major(1), Money::from_minor(50)].into_iter().sum();
        assert_eq!(total, Money::from_minor(150));
    }

    #[test]
    fn test_serde_is_transparent() {
        let json = serde_json::to_string(&Money::from_minor(28_050)).unwrap();
        assert_eq!(json, "28050");
    }
}
