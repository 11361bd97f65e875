//! # Documents
//!
//! Text for everything the store writes down: invoices, sales-ledger
//! entries and the daily stock alert.
//!
//! Rendering lives in the core (not the storage layer) so the invoice and the
//! ledger entry for a transaction are both built from the same
//! [`Transaction`] value and cannot drift apart. Storage only decides where
//! the text goes.
//!
//! ## Invoice Layout (sale)
//! ```text
//! Customer: Asha Rao
//! Date: 2024-03-01 10:30:00
//! Served by: admin
//! Payment Method: UPI
//!
//! Items Purchased:
//! Vitamin C Serum (Garnier) - Bought: 9, Free: 3, Rs. 18000.00
//!
//! Total Amount: Rs. 18000.00
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{Product, Transaction, TransactionKind, TransactionLines};

/// Timestamp inside file names.
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Timestamp printed inside documents.
pub const DISPLAY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Presentation settings shared by every document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStyle {
    /// Printed in front of every amount, e.g. `Rs.`.
    pub currency_symbol: String,
}

impl Default for DocumentStyle {
    fn default() -> Self {
        DocumentStyle {
            currency_symbol: "Rs.".to_string(),
        }
    }
}

impl DocumentStyle {
    /// Formats an amount with the currency symbol: `Rs. 18000.00`.
    pub fn amount(&self, money: Money) -> String {
        format!("{} {}", self.currency_symbol, money)
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// File name for a transaction's invoice.
///
/// `invoice_{customer|supplier}_{party}_{YYYY-MM-DD_HH-MM-SS}.txt`, with
/// spaces (and path separators) in the party name turned into underscores.
///
/// ```rust
/// # use chrono::NaiveDate;
/// # use wecare_core::document::invoice_filename;
/// # use wecare_core::{Money, Transaction, TransactionLines};
/// let tx = Transaction {
///     party_name: "Asha Rao".into(),
///     timestamp: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(10, 30, 0).unwrap(),
///     staff: Some("admin".into()),
///     payment_method: None,
///     lines: TransactionLines::Sale(vec![]),
///     total_amount: Money::zero(),
/// };
/// assert_eq!(invoice_filename(&tx), "invoice_customer_Asha_Rao_2024-03-01_10-30-00.txt");
/// ```
pub fn invoice_filename(tx: &Transaction) -> String {
    let party: String = tx
        .party_name
        .chars()
        .map(|c| if c == ' ' || c == '/' || c == '\\' { '_' } else { c })
        .collect();

    format!(
        "invoice_{}_{}_{}.txt",
        tx.kind().party_label(),
        party,
        tx.timestamp.format(FILE_TIMESTAMP_FORMAT)
    )
}

/// Full invoice text for a sale or a restock.
pub fn render_invoice(tx: &Transaction, style: &DocumentStyle) -> String {
    let mut out = String::new();

    match &tx.lines {
        TransactionLines::Sale(lines) => {
            out.push_str(&format!("Customer: {}\n", tx.party_name));
            out.push_str(&format!("Date: {}\n", display_time(tx.timestamp)));
            if let Some(staff) = &tx.staff {
                out.push_str(&format!("Served by: {}\n", staff));
            }
            if let Some(method) = tx.payment_method {
                out.push_str(&format!("Payment Method: {}\n", method));
            }
            out.push_str("\nItems Purchased:\n");
            for line in lines {
                out.push_str(&format!(
                    "{} ({}) - Bought: {}, Free: {}, {}\n",
                    line.product_name,
                    line.brand,
                    line.paid_quantity,
                    line.free_quantity,
                    style.amount(line.line_total)
                ));
            }
            out.push_str(&format!("\nTotal Amount: {}\n", style.amount(tx.total_amount)));
        }
        TransactionLines::Restock(lines) => {
            out.push_str(&format!("Supplier: {}\n", tx.party_name));
            out.push_str(&format!("Date: {}\n", display_time(tx.timestamp)));
            out.push_str("\nItems Restocked:\n");
            for line in lines {
                out.push_str(&format!(
                    "{} ({}) - Quantity: {}, Cost: {}\n",
                    line.product_name,
                    line.brand,
                    line.quantity,
                    style.amount(line.unit_cost)
                ));
            }
            out.push_str(&format!("\nTotal Cost: {}\n", style.amount(tx.total_amount)));
        }
    }

    out
}

// =============================================================================
// Sales Ledger
// =============================================================================

/// Ledger entry for a sale; `None` for a restock (restocks are not sales).
///
/// Each entry ends with a blank line so appended entries stay readable.
pub fn render_ledger_entry(tx: &Transaction, style: &DocumentStyle) -> Option<String> {
    if tx.kind() != TransactionKind::Sale {
        return None;
    }

    let mut out = String::new();
    out.push_str(&format!("Date: {}\n", display_time(tx.timestamp)));
    if let Some(staff) = &tx.staff {
        out.push_str(&format!("Staff: {}\n", staff));
    }
    out.push_str(&format!("Customer: {}\n", tx.party_name));
    for line in tx.sale_lines() {
        out.push_str(&format!(
            "{} ({}) - Qty: {}, {}\n",
            line.product_name,
            line.brand,
            line.paid_quantity,
            style.amount(line.line_total)
        ));
    }
    out.push_str(&format!("Total Sale: {}\n\n", style.amount(tx.total_amount)));
    Some(out)
}

// =============================================================================
// Stock Alert & Listings
// =============================================================================

/// The low-stock report.
pub fn render_stock_alert(low_stock: &[&Product]) -> String {
    let mut out = String::from("Stock Alerts\n");
    out.push_str(&"=".repeat(50));
    out.push('\n');

    if low_stock.is_empty() {
        out.push_str("All products have sufficient stock levels.\n");
    }
    for product in low_stock {
        out.push_str(&format!(
            "⚠️ {} ({}) - Only {} left!\n",
            product.name(),
            product.brand(),
            product.quantity()
        ));
    }
    out
}

/// One catalog line as shown to staff, with the selling price.
///
/// `P001 - Vitamin C Serum (Garnier) - Rs. 2000.00 - Qty: 200 - France`
pub fn render_product_line(product: &Product, style: &DocumentStyle) -> String {
    format!(
        "{} - {} ({}) - {} - Qty: {} - {}",
        product.id(),
        product.name(),
        product.brand(),
        style.amount(product.selling_price()),
        product.quantity(),
        product.origin()
    )
}

fn display_time(at: NaiveDateTime) -> String {
    at.format(DISPLAY_TIMESTAMP_FORMAT).to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
