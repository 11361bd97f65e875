//! # Domain Types
//!
//! Core domain types used throughout the store.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌──────────────────┐     │
//! │  │    Product      │   │  SaleLineRequest │   │  SaleLineResult  │     │
//! │  │  ─────────────  │   │  ──────────────  │   │  ──────────────  │     │
//! │  │  id             │   │  product_id      │──►│  paid / free     │     │
//! │  │  name, brand    │   │  quantity        │   │  unit_price      │     │
//! │  │  quantity       │   └──────────────────┘   │  line_total      │     │
//! │  │  cost_price     │                          └────────┬─────────┘     │
//! │  │  origin         │   ┌──────────────────┐            │               │
//! │  └─────────────────┘   │ RestockLine...   │            ▼               │
//! │                        │ (same idea)      │   ┌──────────────────┐     │
//! │                        └──────────────────┘   │   Transaction    │     │
//! │                                               │  kind, party,    │     │
//! │                                               │  lines, total    │     │
//! │                                               └──────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Requests and results are transient: they live for one batch and are never
//! stored as-is. Only `Product` and `Customer` are persisted.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::Money;
use crate::SELLING_PRICE_MULTIPLIER;

// =============================================================================
// Product
// =============================================================================

/// A product on the store's shelves.
///
/// Fields are read through accessors. Only [`crate::inventory::InventoryStore`]
/// can change a product once it is in the catalog, which keeps the
/// `quantity >= 0` invariant in one place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: String,
    name: String,
    brand: String,
    quantity: i64,
    cost_price: Money,
    origin: String,
}

impl Product {
    /// Builds a product record. No validation happens here; records loaded
    /// from storage are taken as they are.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        brand: impl Into<String>,
        quantity: i64,
        cost_price: Money,
        origin: impl Into<String>,
    ) -> Self {
        Product {
            id: id.into(),
            name: name.into(),
            brand: brand.into(),
            quantity,
            cost_price,
            origin: origin.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    /// Units on hand.
    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Wholesale unit cost.
    pub fn cost_price(&self) -> Money {
        self.cost_price
    }

    /// Country of origin.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Retail price: always recomputed from the cost, never stored.
    ///
    /// Saturates instead of overflowing; costs that pass
    /// [`validate_cost_price`](crate::validation::validate_cost_price) never
    /// get near the limit. Pricing a sale goes through
    /// [`Product::checked_selling_price`].
    #[inline]
    pub fn selling_price(&self) -> Money {
        self.checked_selling_price()
            .unwrap_or(Money::from_minor(i64::MAX))
    }

    /// Retail price, `None` if doubling the cost overflows.
    #[inline]
    pub fn checked_selling_price(&self) -> Option<Money> {
        self.cost_price.checked_multiply_quantity(SELLING_PRICE_MULTIPLIER)
    }

    pub(crate) fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity;
    }

    pub(crate) fn overwrite_details(&mut self, name: String, brand: String, origin: String, cost_price: Money) {
        self.name = name;
        self.brand = brand;
        self.origin = origin;
        self.cost_price = cost_price;
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer paid. Recorded on the invoice and in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    Upi,
}

impl PaymentMethod {
    /// Stable storage key (`cash`, `credit_card`, `upi`).
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::Upi => "upi",
        }
    }
}

/// Human label, as printed on receipts.
impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::Upi => "UPI",
        };
        f.write_str(label)
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    /// Accepts the storage key, the label, or the CLI spelling
    /// (`credit-card`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "credit_card" | "card" => Ok(PaymentMethod::CreditCard),
            "upi" => Ok(PaymentMethod::Upi),
            other => Err(ValidationError::invalid_format(
                "payment method",
                format!("'{}' is not one of cash, credit-card, upi", other),
            )),
        }
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A registered customer. The id is assigned by storage when the customer
/// is added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// Details for registering a customer. Only the name is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl NewCustomer {
    pub fn new(name: impl Into<String>) -> Self {
        NewCustomer {
            name: name.into(),
            ..NewCustomer::default()
        }
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Trims every field and checks it; see
    /// [`validate_new_customer`](crate::validation::validate_new_customer).
    pub fn into_customer(self, customer_id: impl Into<String>) -> Result<Customer, ValidationError> {
        let trimmed = NewCustomer {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
        };
        crate::validation::validate_new_customer(&trimmed)?;

        Ok(Customer {
            customer_id: customer_id.into(),
            name: trimmed.name,
            email: trimmed.email,
            phone: trimmed.phone,
            address: trimmed.address,
        })
    }
}

// =============================================================================
// Line Requests
// =============================================================================

/// One requested sale line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLineRequest {
    pub product_id: String,
    pub requested_quantity: i64,
}

impl SaleLineRequest {
    pub fn new(product_id: impl Into<String>, requested_quantity: i64) -> Self {
        SaleLineRequest {
            product_id: product_id.into(),
            requested_quantity,
        }
    }
}

/// One requested restock line.
///
/// `None` (or blank) display fields keep the existing product's values. For a
/// product that does not exist yet, `name` is required and the other fields
/// default to empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestockLineRequest {
    pub product_id: String,
    pub name: Option<String>,
    pub brand: Option<String>,
    pub origin: Option<String>,
    pub quantity: i64,
    pub cost_price: Money,
}

impl RestockLineRequest {
    /// A restock that only tops up stock and sets the cost.
    pub fn new(product_id: impl Into<String>, quantity: i64, cost_price: Money) -> Self {
        RestockLineRequest {
            product_id: product_id.into(),
            name: None,
            brand: None,
            origin: None,
            quantity,
            cost_price,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }
}

// =============================================================================
// Batch Requests
// =============================================================================

/// A complete sale: who is buying, who is selling, and the lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRequest {
    pub party_name: String,
    pub staff: String,
    pub payment_method: Option<PaymentMethod>,
    pub at: NaiveDateTime,
    pub lines: Vec<SaleLineRequest>,
}

impl SaleRequest {
    pub fn new(party_name: impl Into<String>, staff: impl Into<String>, at: NaiveDateTime) -> Self {
        SaleRequest {
            party_name: party_name.into(),
            staff: staff.into(),
            payment_method: None,
            at,
            lines: Vec::new(),
        }
    }

    pub fn payment(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }

    pub fn line(mut self, line: SaleLineRequest) -> Self {
        self.lines.push(line);
        self
    }
}

/// A complete restock delivery from one supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestockRequest {
    pub party_name: String,
    pub at: NaiveDateTime,
    pub lines: Vec<RestockLineRequest>,
}

impl RestockRequest {
    pub fn new(party_name: impl Into<String>, at: NaiveDateTime) -> Self {
        RestockRequest {
            party_name: party_name.into(),
            at,
            lines: Vec::new(),
        }
    }

    pub fn line(mut self, line: RestockLineRequest) -> Self {
        self.lines.push(line);
        self
    }
}

// =============================================================================
// Line Results
// =============================================================================

/// A committed sale line, with the product details frozen at sale time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLineResult {
    pub product_id: String,
    pub product_name: String,
    pub brand: String,
    /// Units billed.
    pub paid_quantity: i64,
    /// Promotion units handed over for nothing.
    pub free_quantity: i64,
    /// Selling price per paid unit.
    pub unit_price: Money,
    /// `paid_quantity * unit_price`.
    pub line_total: Money,
}

impl SaleLineResult {
    /// Units that left the shelf.
    pub fn units_removed(&self) -> i64 {
        self.paid_quantity + self.free_quantity
    }
}

/// A committed restock line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestockLineResult {
    pub product_id: String,
    pub product_name: String,
    pub brand: String,
    pub quantity: i64,
    /// Cost per unit paid to the supplier.
    pub unit_cost: Money,
    /// `quantity * unit_cost`.
    pub line_total: Money,
    /// True when this line created the product.
    pub created: bool,
}

// =============================================================================
// Transaction
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Sale,
    Restock,
}

impl TransactionKind {
    /// Who sits on the other side of the counter.
    pub fn party_label(&self) -> &'static str {
        match self {
            TransactionKind::Sale => "customer",
            TransactionKind::Restock => "supplier",
        }
    }
}

/// The committed lines of a transaction. The variant *is* the kind, so a
/// sale can never carry restock lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "lines", rename_all = "snake_case")]
pub enum TransactionLines {
    Sale(Vec<SaleLineResult>),
    Restock(Vec<RestockLineResult>),
}

impl TransactionLines {
    pub fn len(&self) -> usize {
        match self {
            TransactionLines::Sale(lines) => lines.len(),
            TransactionLines::Restock(lines) => lines.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A finished sale or restock, ready for the invoice writer and the ledger.
///
/// Only ever built by the processor, and only when at least one line
/// succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub party_name: String,
    pub timestamp: NaiveDateTime,
    /// Who rang up the sale; `None` for restocks.
    pub staff: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub lines: TransactionLines,
    pub total_amount: Money,
}

impl Transaction {
    pub fn kind(&self) -> TransactionKind {
        match self.lines {
            TransactionLines::Sale(_) => TransactionKind::Sale,
            TransactionLines::Restock(_) => TransactionKind::Restock,
        }
    }

    /// Sale lines, or an empty slice for a restock.
    pub fn sale_lines(&self) -> &[SaleLineResult] {
        match &self.lines {
            TransactionLines::Sale(lines) => lines,
            TransactionLines::Restock(_) => &[],
        }
    }

    /// Restock lines, or an empty slice for a sale.
    pub fn restock_lines(&self) -> &[RestockLineResult] {
        match &self.lines {
            TransactionLines::Restock(lines) => lines,
            TransactionLines::Sale(_) => &[],
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selling_price_is_double_cost() {
        let p = Product::new("P003", "Sunscreen", "Aqualogica", 200, Money::from_major(700), "India");
        assert_eq!(p.selling_price(), Money::from_major(1400));
    }

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!("cash".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!("Credit Card".parse::<PaymentMethod>().unwrap(), PaymentMethod::CreditCard);
        assert_eq!("credit-card".parse::<PaymentMethod>().unwrap(), PaymentMethod::CreditCard);
        assert_eq!("UPI".parse::<PaymentMethod>().unwrap(), PaymentMethod::Upi);
        assert!("cheque".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_payment_method_round_trips_through_storage_key() {
        for method in [PaymentMethod::Cash, PaymentMethod::CreditCard, PaymentMethod::Upi] {
            assert_eq!(method.as_str().parse::<PaymentMethod>().unwrap(), method);
        }
    }

    #[test]
    fn test_units_removed_counts_free_units() {
        let line = SaleLineResult {
            product_id: "P001".into(),
            product_name: "Vitamin C Serum".into(),
            brand: "Garnier".into(),
            paid_quantity: 9,
            free_quantity: 3,
            unit_price: Money::from_major(2000),
            line_total: Money::from_major(18_000),
        };
        assert_eq!(line.units_removed(), 12);
    }

    #[test]
    fn test_party_labels() {
        assert_eq!(TransactionKind::Sale.party_label(), "customer");
        assert_eq!(TransactionKind::Restock.party_label(), "supplier");
    }

    #[test]
    fn test_new_customer_is_trimmed_and_checked() {
        let customer = NewCustomer::new("  Asha Rao ")
            .phone(" 98450 12345")
            .into_customer("c-1")
            .unwrap();
        assert_eq!(customer.name, "Asha Rao");
        assert_eq!(customer.phone, "98450 12345");
        assert_eq!(customer.email, "");

        assert!(NewCustomer::new("   ").into_customer("c-2").is_err());
    }
}
