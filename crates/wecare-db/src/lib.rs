//! # wecare-db: Storage Layer for the WeCare Store
//!
//! Loads and saves the catalog, and writes the documents every transaction
//! leaves behind. Two backends sit behind one [`Storage`] facade.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  wecare CLI                                                             │
//! │       │  storage.load_inventory() / commit_transaction()                │
//! │       ▼                                                                 │
//! │  ★ wecare-db (THIS CRATE) ★                                             │
//! │       │                                                                 │
//! │       ├── flatfile   products.txt, invoices/, sales ledger, alerts      │
//! │       └── SQLite     products, purchases, customers tables (sqlx)       │
//! │                                                                         │
//! │  Text comes from wecare_core::document; this crate only decides where   │
//! │  it goes and in what order.                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`storage`] - The backend-agnostic facade and commit ordering
//! - [`flatfile`] - Catalog codec and document/ledger/alert sinks
//! - [`pool`] - SQLite connection pool configuration
//! - [`migrations`] - Embedded database migrations
//! - [`repository`] - SQLite repositories (products, purchases, customers)
//! - [`seed`] - The default catalog
//! - [`error`] - Storage error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wecare_db::{BackendKind, LedgerLayout, Storage, StorageConfig};
//!
//! let storage = Storage::open(&StorageConfig {
//!     data_dir: "./wecare_data".into(),
//!     backend: BackendKind::FlatFile,
//!     ledger_layout: LedgerLayout::Single,
//! })
//! .await?;
//!
//! let mut store = storage.load_inventory().await?;
//! // ... run a sale through TransactionProcessor ...
//! storage.commit_transaction(&store, &tx, &style).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod flatfile;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;
pub mod storage;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use flatfile::{AlertFolder, CustomerFile, DocumentFolder, LedgerFile, LedgerLayout, ProductFile};
pub use pool::{Database, DbConfig};
pub use repository::customer::CustomerRepository;
pub use repository::product::ProductRepository;
pub use repository::purchase::{PurchaseRecord, PurchaseRepository};
pub use storage::{BackendKind, CommitReceipt, Storage, StorageConfig};
