//! # Transaction Processor
//!
//! Turns sale and restock requests into inventory changes and a finished
//! [`Transaction`].
//!
//! ## Sale Line Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SaleLineRequest { P001, 9 }                                            │
//! │       │                                                                 │
//! │       ├── unknown product?        → LineError(ProductNotFound)          │
//! │       ├── quantity <= 0?          → LineError(MustBePositive)           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  free = 9 / 3 = 3,  removed = 9 + 3 = 12                                │
//! │       │                                                                 │
//! │       ├── removed > on hand?      → LineError(InsufficientStock)        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  unit = cost × 2,  line_total = 9 × unit   (free units never billed)    │
//! │       │                                                                 │
//! │       ├── total overflows i64?    → LineError(InvalidFormat)            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  adjust_quantity(P001, -12)  ← commit, this line only                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Per-Line Commit
//! Each line commits as soon as it is accepted. A later bad line is reported
//! and skipped; it does not undo earlier lines. A batch in which no line
//! succeeded produces no transaction at all.
//!
//! Two ways in:
//! - [`TransactionProcessor::begin_sale`] / [`SaleBatch::add_line`] for a
//!   caller that prompts line by line and wants each verdict immediately
//! - [`TransactionProcessor::process_sale`] for a fully formed request

use chrono::NaiveDateTime;
use tracing::debug;

use crate::error::{CoreError, CoreResult, LineError, ValidationError};
use crate::inventory::{InventoryStore, UpsertOutcome};
use crate::money::Money;
use crate::types::{
    PaymentMethod, Product, RestockLineRequest, RestockLineResult, RestockRequest, SaleLineRequest,
    SaleLineResult, SaleRequest, Transaction, TransactionLines,
};
use crate::validation::validate_quantity;
use crate::PAID_UNITS_PER_FREE_UNIT;

// =============================================================================
// Promotion & Pricing
// =============================================================================

/// Free units earned by buying `paid` units: one per three, rounded down.
///
/// ```rust
/// use wecare_core::processor::free_units;
///
/// assert_eq!(free_units(2), 0);
/// assert_eq!(free_units(3), 1);
/// assert_eq!(free_units(5), 1);
/// assert_eq!(free_units(9), 3);
/// ```
#[inline]
pub fn free_units(paid: i64) -> i64 {
    paid / PAID_UNITS_PER_FREE_UNIT
}

fn too_large() -> ValidationError {
    ValidationError::invalid_format("quantity", "line total too large")
}

/// Prices one sale line against a product without touching stock.
///
/// Runs every check the commit needs (quantity, stock, arithmetic), so a
/// line that quotes successfully will commit successfully.
pub fn quote_sale_line(product: &Product, paid_quantity: i64) -> CoreResult<SaleLineResult> {
    validate_quantity(paid_quantity)?;

    let free_quantity = free_units(paid_quantity);
    let insufficient = || CoreError::InsufficientStock {
        product_id: product.id().to_string(),
        available: product.quantity(),
        requested: paid_quantity.saturating_add(free_quantity),
    };
    let removed = paid_quantity.checked_add(free_quantity).ok_or_else(insufficient)?;
    if removed > product.quantity() {
        return Err(insufficient());
    }

    let unit_price = product
        .checked_selling_price()
        .ok_or_else(|| ValidationError::invalid_format("cost price", "selling price too large"))?;
    let line_total = unit_price
        .checked_multiply_quantity(paid_quantity)
        .ok_or_else(too_large)?;

    Ok(SaleLineResult {
        product_id: product.id().to_string(),
        product_name: product.name().to_string(),
        brand: product.brand().to_string(),
        paid_quantity,
        free_quantity,
        unit_price,
        line_total,
    })
}

// =============================================================================
// Processor
// =============================================================================

/// Result of running a whole batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    /// `None` when no line succeeded.
    pub transaction: Option<Transaction>,
    /// Every rejected line, in request order.
    pub line_errors: Vec<LineError>,
}

/// Applies sales and restocks to an [`InventoryStore`] it borrows
/// exclusively for as long as it lives.
#[derive(Debug)]
pub struct TransactionProcessor<'a> {
    store: &'a mut InventoryStore,
}

impl<'a> TransactionProcessor<'a> {
    pub fn new(store: &'a mut InventoryStore) -> Self {
        TransactionProcessor { store }
    }

    /// Products below the low-stock threshold.
    pub fn low_stock(&self) -> Vec<&Product> {
        self.store.low_stock()
    }

    /// Opens a sale for line-by-line processing.
    pub fn begin_sale(
        &mut self,
        party_name: impl Into<String>,
        staff: impl Into<String>,
        payment_method: Option<PaymentMethod>,
    ) -> SaleBatch<'_> {
        SaleBatch {
            store: &mut *self.store,
            party_name: party_name.into(),
            staff: staff.into(),
            payment_method,
            lines: Vec::new(),
            total: Money::zero(),
            attempted: 0,
        }
    }

    /// Opens a restock for line-by-line processing.
    pub fn begin_restock(&mut self, party_name: impl Into<String>) -> RestockBatch<'_> {
        RestockBatch {
            store: &mut *self.store,
            party_name: party_name.into(),
            lines: Vec::new(),
            total: Money::zero(),
            attempted: 0,
        }
    }

    /// Runs every line of a sale request in order.
    pub fn process_sale(&mut self, request: SaleRequest) -> BatchOutcome {
        let SaleRequest {
            party_name,
            staff,
            payment_method,
            at,
            lines,
        } = request;

        let mut batch = self.begin_sale(party_name, staff, payment_method);
        let line_errors = lines
            .iter()
            .filter_map(|line| batch.add_line(line).err())
            .collect();

        BatchOutcome {
            transaction: batch.finish(at),
            line_errors,
        }
    }

    /// Runs every line of a restock request in order.
    pub fn process_restock(&mut self, request: RestockRequest) -> BatchOutcome {
        let RestockRequest { party_name, at, lines } = request;

        let mut batch = self.begin_restock(party_name);
        let line_errors = lines
            .iter()
            .filter_map(|line| batch.add_line(line).err())
            .collect();

        BatchOutcome {
            transaction: batch.finish(at),
            line_errors,
        }
    }
}

// =============================================================================
// Sale Batch
// =============================================================================

/// An open sale. Lines commit one at a time; `finish` seals the transaction.
#[derive(Debug)]
pub struct SaleBatch<'s> {
    store: &'s mut InventoryStore,
    party_name: String,
    staff: String,
    payment_method: Option<PaymentMethod>,
    lines: Vec<SaleLineResult>,
    total: Money,
    attempted: usize,
}

impl SaleBatch<'_> {
    /// Processes and commits one line.
    pub fn add_line(&mut self, request: &SaleLineRequest) -> Result<&SaleLineResult, LineError> {
        self.attempted += 1;
        let product_id = request.product_id.trim();
        let line_error = |error: CoreError| LineError {
            line: self.attempted,
            product_id: product_id.to_string(),
            error,
        };

        let result = self
            .store
            .get(product_id)
            .and_then(|product| quote_sale_line(product, request.requested_quantity))
            .map_err(line_error)?;
        let total = self
            .total
            .checked_add(result.line_total)
            .ok_or_else(|| line_error(too_large().into()))?;

        // The quote already proved the stock is there.
        self.store
            .adjust_quantity(product_id, -result.units_removed())
            .map_err(line_error)?;

        debug!(
            product_id = %product_id,
            paid = result.paid_quantity,
            free = result.free_quantity,
            line_total = %result.line_total,
            "Sale line committed"
        );

        self.total = total;
        self.lines.push(result);
        Ok(&self.lines[self.lines.len() - 1])
    }

    /// Running total of committed lines.
    pub fn total(&self) -> Money {
        self.total
    }

    /// Read access to the store, e.g. to show remaining stock at a prompt.
    pub fn store(&self) -> &InventoryStore {
        &*self.store
    }

    /// Seals the sale. `None` if no line was committed.
    pub fn finish(self, at: NaiveDateTime) -> Option<Transaction> {
        if self.lines.is_empty() {
            debug!(party = %self.party_name, "Sale discarded: no committed lines");
            return None;
        }

        Some(Transaction {
            party_name: self.party_name,
            timestamp: at,
            staff: Some(self.staff),
            payment_method: self.payment_method,
            lines: TransactionLines::Sale(self.lines),
            total_amount: self.total,
        })
    }
}

// =============================================================================
// Restock Batch
// =============================================================================

/// An open restock delivery.
#[derive(Debug)]
pub struct RestockBatch<'s> {
    store: &'s mut InventoryStore,
    party_name: String,
    lines: Vec<RestockLineResult>,
    total: Money,
    attempted: usize,
}

impl RestockBatch<'_> {
    /// Processes and commits one line.
    pub fn add_line(&mut self, request: &RestockLineRequest) -> Result<&RestockLineResult, LineError> {
        self.attempted += 1;
        let line = self.attempted;
        let product_id = request.product_id.trim().to_string();
        let line_error = |error: CoreError| LineError {
            line,
            product_id: product_id.clone(),
            error,
        };

        let line_total = request
            .cost_price
            .checked_multiply_quantity(request.quantity)
            .ok_or_else(|| line_error(too_large().into()))?;
        let total = self
            .total
            .checked_add(line_total)
            .ok_or_else(|| line_error(too_large().into()))?;

        let outcome = self.store.upsert(request).map_err(line_error)?;
        let product = self.store.get(&product_id).map_err(line_error)?;

        let result = RestockLineResult {
            product_id: product_id.clone(),
            product_name: product.name().to_string(),
            brand: product.brand().to_string(),
            quantity: request.quantity,
            unit_cost: request.cost_price,
            line_total,
            created: outcome == UpsertOutcome::Inserted,
        };

        debug!(
            product_id = %product_id,
            quantity = result.quantity,
            created = result.created,
            "Restock line committed"
        );

        self.total = total;
        self.lines.push(result);
        Ok(&self.lines[self.lines.len() - 1])
    }

    /// Running cost of committed lines.
    pub fn total(&self) -> Money {
        self.total
    }

    /// Seals the restock. `None` if no line was committed.
    pub fn finish(self, at: NaiveDateTime) -> Option<Transaction> {
        if self.lines.is_empty() {
            debug!(party = %self.party_name, "Restock discarded: no committed lines");
            return None;
        }

        Some(Transaction {
            party_name: self.party_name,
            timestamp: at,
            staff: None,
            payment_method: None,
            lines: TransactionLines::Restock(self.lines),
            total_amount: self.total,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionKind;
    use crate::validation::MAX_COST_PRICE;
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    fn seeded() -> InventoryStore {
        InventoryStore::from_products(vec![
            Product::new("P001", "Vitamin C Serum", "Garnier", 200, Money::from_major(1000), "France"),
            Product::new("P002", "Skin Cleanser", "Cetaphil", 100, Money::from_major(280), "Switzerland"),
            Product::new("P003", "Sunscreen", "Aqualogica", 200, Money::from_major(700), "India"),
        ])
    }

    #[test]
    fn test_free_units_table() {
        for (paid, free) in [(1, 0), (2, 0), (3, 1), (5, 1), (6, 2), (9, 3), (10, 3)] {
            assert_eq!(free_units(paid), free, "paid {}", paid);
        }
    }

    #[test]
    fn test_sell_nine_of_p001() {
        let mut store = seeded();
        let outcome = TransactionProcessor::new(&mut store)
            .process_sale(SaleRequest::new("Asha", "admin", at()).line(SaleLineRequest::new("P001", 9)));

        assert!(outcome.line_errors.is_empty());
        let tx = outcome.transaction.unwrap();
        assert_eq!(tx.kind(), TransactionKind::Sale);
        assert_eq!(tx.staff.as_deref(), Some("admin"));

        let line = &tx.sale_lines()[0];
        assert_eq!(line.free_quantity, 3);
        assert_eq!(line.unit_price, Money::from_major(2000));
        assert_eq!(line.line_total, Money::from_major(18_000));
        assert_eq!(tx.total_amount, Money::from_major(18_000));
        assert_eq!(store.get("P001").unwrap().quantity(), 188);
    }

    #[test]
    fn test_oversized_sale_is_rejected_and_stock_untouched() {
        let mut store = seeded();
        store.adjust_quantity("P001", -12).unwrap();

        let outcome = TransactionProcessor::new(&mut store)
            .process_sale(SaleRequest::new("Asha", "admin", at()).line(SaleLineRequest::new("P001", 189)));

        assert!(outcome.transaction.is_none());
        assert_eq!(
            outcome.line_errors[0].error,
            CoreError::InsufficientStock {
                product_id: "P001".to_string(),
                available: 188,
                requested: 252,
            }
        );
        assert_eq!(store.get("P001").unwrap().quantity(), 188);
    }

    #[test]
    fn test_stock_check_counts_free_units() {
        // 100 on hand: 76 paid needs 76 + 25 = 101.
        let mut store = seeded();
        let mut processor = TransactionProcessor::new(&mut store);
        let mut sale = processor.begin_sale("Ravi", "admin", None);

        let err = sale.add_line(&SaleLineRequest::new("P002", 76)).unwrap_err();
        assert!(matches!(err.error, CoreError::InsufficientStock { requested: 101, .. }));

        // 75 paid needs exactly 100.
        let line = sale.add_line(&SaleLineRequest::new("P002", 75)).unwrap();
        assert_eq!(line.free_quantity, 25);
        assert_eq!(sale.store().get("P002").unwrap().quantity(), 0);
    }

    #[test]
    fn test_bad_lines_are_skipped_not_fatal() {
        let mut store = seeded();
        let request = SaleRequest::new("Meera", "admin", at())
            .payment(PaymentMethod::Upi)
            .line(SaleLineRequest::new("P404", 1))
            .line(SaleLineRequest::new("P002", 0))
            .line(SaleLineRequest::new("P003", 2))
            .line(SaleLineRequest::new("P002", -1));

        let outcome = TransactionProcessor::new(&mut store).process_sale(request);

        let lines: Vec<usize> = outcome.line_errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, [1, 2, 4]);
        assert!(outcome.line_errors[0].error.is_not_found());
        assert!(outcome.line_errors[1].error.is_invalid_input());

        let tx = outcome.transaction.unwrap();
        assert_eq!(tx.payment_method, Some(PaymentMethod::Upi));
        assert_eq!(tx.sale_lines().len(), 1);
        assert_eq!(tx.total_amount, Money::from_major(2800));
        assert_eq!(store.get("P003").unwrap().quantity(), 198);
    }

    #[test]
    fn test_lines_see_previous_lines_stock() {
        let mut store = seeded();
        let request = SaleRequest::new("Kiran", "admin", at())
            .line(SaleLineRequest::new("P002", 60)) // removes 80
            .line(SaleLineRequest::new("P002", 18)); // needs 24, only 20 left

        let outcome = TransactionProcessor::new(&mut store).process_sale(request);

        assert_eq!(outcome.line_errors.len(), 1);
        assert_eq!(outcome.line_errors[0].line, 2);
        assert_eq!(store.get("P002").unwrap().quantity(), 20);
    }

    #[test]
    fn test_empty_sale_emits_nothing() {
        let mut store = seeded();
        let before = store.clone();

        let outcome = TransactionProcessor::new(&mut store).process_sale(SaleRequest::new("Nobody", "admin", at()));

        assert!(outcome.transaction.is_none());
        assert!(outcome.line_errors.is_empty());
        assert_eq!(store, before);
    }

    #[test]
    fn test_all_lines_failing_emits_nothing() {
        let mut store = seeded();
        let outcome = TransactionProcessor::new(&mut store).process_sale(
            SaleRequest::new("Nobody", "admin", at()).line(SaleLineRequest::new("P404", 3)),
        );
        assert!(outcome.transaction.is_none());
        assert_eq!(outcome.line_errors.len(), 1);
    }

    #[test]
    fn test_restock_existing_and_new() {
        let mut store = seeded();
        let request = RestockRequest::new("Glow Distributors", at())
            .line(RestockLineRequest::new("P001", 20, Money::from_major(900)))
            .line(
                RestockLineRequest::new("P099", 50, Money::from_major(300))
                    .name("Toner")
                    .brand("Plum")
                    .origin("India"),
            );

        let outcome = TransactionProcessor::new(&mut store).process_restock(request);
        assert!(outcome.line_errors.is_empty());

        let tx = outcome.transaction.unwrap();
        assert_eq!(tx.kind(), TransactionKind::Restock);
        assert_eq!(tx.staff, None);
        // 20 × 900 + 50 × 300
        assert_eq!(tx.total_amount, Money::from_major(33_000));

        let lines = tx.restock_lines();
        assert!(!lines[0].created);
        assert!(lines[1].created);
        assert_eq!(lines[1].product_name, "Toner");

        let serum = store.get("P001").unwrap();
        assert_eq!(serum.quantity(), 220);
        assert_eq!(serum.cost_price(), Money::from_major(900));

        let toner = store.get("P099").unwrap();
        assert_eq!(toner.quantity(), 50);
        assert_eq!(toner.selling_price(), Money::from_major(600));
    }

    #[test]
    fn test_restock_invalid_line_does_not_mutate() {
        let mut store = seeded();
        let before = store.clone();

        let outcome = TransactionProcessor::new(&mut store).process_restock(
            RestockRequest::new("Glow Distributors", at())
                .line(RestockLineRequest::new("P001", 0, Money::from_major(900)))
                .line(RestockLineRequest::new("P001", 5, Money::zero())),
        );

        assert!(outcome.transaction.is_none());
        assert_eq!(outcome.line_errors.len(), 2);
        assert!(outcome.line_errors.iter().all(|e| e.error.is_invalid_input()));
        assert_eq!(store, before);
    }

    #[test]
    fn test_restock_result_uses_updated_name() {
        let mut store = seeded();
        let mut processor = TransactionProcessor::new(&mut store);
        let mut restock = processor.begin_restock("Glow Distributors");

        let line = restock
            .add_line(&RestockLineRequest::new("P002", 5, Money::from_major(290)).name("Gentle Cleanser"))
            .unwrap();
        assert_eq!(line.product_name, "Gentle Cleanser");
        assert_eq!(line.brand, "Cetaphil");
        assert_eq!(restock.total(), Money::from_major(1450));
    }

    #[test]
    fn test_restock_above_cost_ceiling_is_rejected() {
        let mut store = seeded();
        let before = store.clone();
        let huge = Money::parse("50000000000000000").unwrap();

        let outcome = TransactionProcessor::new(&mut store).process_restock(
            RestockRequest::new("Glow Distributors", at())
                .line(RestockLineRequest::new("PX", 1, huge).name("Gold Cream"))
                .line(RestockLineRequest::new("PY", 4, huge).name("Gold Toner")),
        );

        assert!(outcome.transaction.is_none());
        assert_eq!(outcome.line_errors.len(), 2);
        assert!(outcome.line_errors.iter().all(|e| e.error.is_invalid_input()));
        assert_eq!(store, before);
    }

    #[test]
    fn test_restock_total_overflow_rejects_line() {
        let mut store = seeded();
        let mut processor = TransactionProcessor::new(&mut store);
        let mut restock = processor.begin_restock("Bulk Traders");
        let bulk = RestockLineRequest::new("P001", 5_000_000_000, MAX_COST_PRICE);

        restock.add_line(&bulk).unwrap();
        let first_total = restock.total();

        let err = restock.add_line(&bulk).unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.error.is_invalid_input());
        assert_eq!(restock.total(), first_total);

        let tx = restock.finish(at()).unwrap();
        assert_eq!(tx.lines.len(), 1);
        assert_eq!(store.get("P001").unwrap().quantity(), 200 + 5_000_000_000);
    }

    #[test]
    fn test_sale_total_overflow_rejects_line() {
        let mut store = InventoryStore::from_products(vec![Product::new(
            "P900",
            "Bulk Serum",
            "Garnier",
            10_000_000_000,
            MAX_COST_PRICE,
            "France",
        )]);

        let outcome = TransactionProcessor::new(&mut store).process_sale(
            SaleRequest::new("Wholesale", "admin", at())
                .line(SaleLineRequest::new("P900", 3_000_000_000))
                .line(SaleLineRequest::new("P900", 3_000_000_000)),
        );

        assert_eq!(outcome.line_errors.len(), 1);
        assert_eq!(outcome.line_errors[0].line, 2);
        assert!(outcome.line_errors[0].error.is_invalid_input());
        let tx = outcome.transaction.unwrap();
        assert_eq!(tx.total_amount, MAX_COST_PRICE.multiply_quantity(6_000_000_000));
        assert_eq!(store.get("P900").unwrap().quantity(), 10_000_000_000 - 4_000_000_000);
    }

    #[test]
    fn test_sale_of_unpriceable_product_is_a_line_error() {
        let mut store = InventoryStore::from_products(vec![Product::new(
            "PX",
            "Gold Cream",
            "Lux",
            5,
            Money::from_minor(i64::MAX / 2 + 1),
            "India",
        )]);
        let before = store.clone();

        let outcome = TransactionProcessor::new(&mut store)
            .process_sale(SaleRequest::new("Asha", "admin", at()).line(SaleLineRequest::new("PX", 1)));

        assert!(outcome.transaction.is_none());
        assert!(outcome.line_errors[0].error.is_invalid_input());
        assert_eq!(store, before);
        assert_eq!(store.get("PX").unwrap().selling_price(), Money::from_minor(i64::MAX));
    }

    #[test]
    fn test_processor_low_stock() {
        let mut store = seeded();
        store.adjust_quantity("P003", -195).unwrap();
        let processor = TransactionProcessor::new(&mut store);
        let low: Vec<&str> = processor.low_stock().iter().map(|p| p.id()).collect();
        assert_eq!(low, ["P003"]);
    }
}
