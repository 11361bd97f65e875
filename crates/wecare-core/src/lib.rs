//! # wecare-core: Pure Business Logic for the WeCare Store
//!
//! This crate is the **heart** of the store tool. It holds the catalog in
//! memory, applies sales and restocks to it, and renders the documents that
//! record those transactions. It never touches the file system or a database.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        WeCare Store Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    `wecare` CLI (apps/cli)                      │   │
//! │  │     prompts ──► SaleRequest / RestockRequest ──► prints result  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ wecare-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ inventory │  │ processor │  │ document  │  │   money   │  │   │
//! │  │   │  Store    │◄─│ Sale      │─►│ Invoice   │  │  Money    │  │   │
//! │  │   │  Product  │  │ Restock   │  │ Ledger    │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 wecare-db (Storage Layer)                       │   │
//! │  │     products.txt, invoices, sales ledger, SQLite backend        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, line requests/results, Transaction)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//! - [`inventory`] - The in-memory Inventory Store
//! - [`processor`] - The Transaction Processor (sale and restock paths)
//! - [`document`] - Invoice, ledger and stock-alert text
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use wecare_core::inventory::InventoryStore;
//! use wecare_core::processor::TransactionProcessor;
//! use wecare_core::{Money, Product, SaleLineRequest, SaleRequest};
//!
//! let mut store = InventoryStore::from_products(vec![Product::new(
//!     "P001", "Vitamin C Serum", "Garnier", 200, Money::from_major(1000), "France",
//! )]);
//!
//! let at = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(10, 0, 0).unwrap();
//! let request = SaleRequest::new("Asha", "admin", at)
//!     .line(SaleLineRequest::new("P001", 9));
//!
//! let outcome = TransactionProcessor::new(&mut store).process_sale(request);
//! let tx = outcome.transaction.unwrap();
//!
//! // 9 paid + 3 free leaves 188 on the shelf; only the 9 are billed.
//! assert_eq!(store.get("P001").unwrap().quantity(), 188);
//! assert_eq!(tx.total_amount, Money::from_major(18_000));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod document;
pub mod error;
pub mod inventory;
pub mod money;
pub mod processor;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, LineError, ValidationError};
pub use document::DocumentStyle;
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Paid units needed to earn one free unit.
///
/// ## Business Reason
/// The store's loyalty promotion: buy three, get one free. The free count is
/// `paid / 3`, truncated, so 5 paid units still earn a single free unit.
pub const PAID_UNITS_PER_FREE_UNIT: i64 = 3;

/// Selling price is always cost price times this factor (100% markup).
pub const SELLING_PRICE_MULTIPLIER: i64 = 2;

/// Products with fewer units than this show up in the stock alert.
pub const LOW_STOCK_THRESHOLD: i64 = 10;
