//! # Flat-File Backend
//!
//! The store's plain-text files, laid out under one data directory:
//!
//! ```text
//! {data_dir}/
//! ├── products.txt                  ← ProductFile (the catalog)
//! ├── customers.txt                 ← CustomerFile
//! ├── invoices/                     ← DocumentFolder
//! │   └── invoice_customer_Asha_Rao_2024-03-01_10-30-00.txt
//! ├── sales_report.txt              ← LedgerFile (Single layout)
//! ├── sales_reports/                ← LedgerFile (Daily layout)
//! │   └── sales_report_2024-03-01.txt
//! └── stock_alerts/                 ← AlertFolder
//!     └── alert_20240301.txt
//! ```

pub mod alerts;
pub mod customers;
pub mod documents;
pub mod ledger;
pub mod products;

pub use alerts::AlertFolder;
pub use customers::CustomerFile;
pub use documents::DocumentFolder;
pub use ledger::{LedgerFile, LedgerLayout};
pub use products::{ProductFile, StagedCatalog};

/// Catalog file name inside the data directory.
pub const CATALOG_FILE: &str = "products.txt";

/// Customer registry file name inside the data directory.
pub const CUSTOMER_FILE: &str = "customers.txt";

/// Invoice folder name inside the data directory.
pub const INVOICE_DIR: &str = "invoices";

/// Alert folder name inside the data directory.
pub const ALERT_DIR: &str = "stock_alerts";
