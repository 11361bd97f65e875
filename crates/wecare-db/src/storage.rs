//! # Storage Facade
//!
//! One entry point over both backends, so the CLI never cares where the
//! catalog lives.
//!
//! ## Commit Order (flat files)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. stage catalog     products.txt.tmp                                  │
//! │  2. write invoice     invoices/invoice_customer_..._.txt                │
//! │  3. append ledger     sales_report.txt            (sales only)          │
//! │  4. publish catalog   rename .tmp → products.txt                        │
//! │                                                                         │
//! │  Fails at 2:  discard staged catalog                                    │
//! │  Fails at 3:  remove invoice, discard staged catalog                    │
//! │  Fails at 4:  retract ledger entry, remove invoice, drop staged file    │
//! │  Invoice, ledger and catalog therefore never disagree.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The SQLite backend writes the invoice first and then commits stock and
//! purchase rows in one SQL transaction, removing the invoice if that fails.

use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info};
use uuid::Uuid;
use wecare_core::document::{render_invoice, render_ledger_entry, render_stock_alert, DocumentStyle};
use wecare_core::inventory::InventoryStore;
use wecare_core::{Customer, NewCustomer, Transaction};

use crate::error::DbResult;
use crate::flatfile::{
    AlertFolder, CustomerFile, DocumentFolder, LedgerFile, LedgerLayout, ProductFile, ALERT_DIR, CATALOG_FILE,
    CUSTOMER_FILE, INVOICE_DIR,
};
use crate::repository::purchase::group_into_transactions;
use crate::{Database, DbConfig};

/// SQLite file name inside the data directory.
pub const DATABASE_FILE: &str = "wecare.db";

/// Which backend holds the catalog and the sales ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    FlatFile,
    Sqlite,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::FlatFile => "flat",
            BackendKind::Sqlite => "sqlite",
        }
    }
}

/// Where and how to store things.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub backend: BackendKind,
    /// Flat-file backend only.
    pub ledger_layout: LedgerLayout,
}

/// What a successful commit produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReceipt {
    pub transaction_id: Uuid,
    pub invoice_path: PathBuf,
    /// `None` for restocks, and for the SQLite backend (its ledger is the
    /// purchases table).
    pub ledger_path: Option<PathBuf>,
}

/// The store's persistent state.
#[derive(Debug, Clone)]
pub enum Storage {
    FlatFile {
        catalog: ProductFile,
        customers: CustomerFile,
        ledger: LedgerFile,
        documents: DocumentFolder,
        alerts: AlertFolder,
    },
    Sqlite {
        db: Database,
        documents: DocumentFolder,
        alerts: AlertFolder,
    },
}

impl Storage {
    /// Opens storage under `config.data_dir`, creating the directory and the
    /// default catalog on first use.
    pub async fn open(config: &StorageConfig) -> DbResult<Self> {
        let dir = &config.data_dir;
        fs::create_dir_all(dir).await?;

        let documents = DocumentFolder::new(dir.join(INVOICE_DIR));
        let alerts = AlertFolder::new(dir.join(ALERT_DIR));

        let storage = match config.backend {
            BackendKind::FlatFile => {
                let catalog = ProductFile::new(dir.join(CATALOG_FILE));
                catalog.ensure_seeded().await?;
                Storage::FlatFile {
                    catalog,
                    customers: CustomerFile::new(dir.join(CUSTOMER_FILE)),
                    ledger: LedgerFile::new(dir, config.ledger_layout),
                    documents,
                    alerts,
                }
            }
            BackendKind::Sqlite => {
                let db = Database::new(DbConfig::new(dir.join(DATABASE_FILE))).await?;
                db.ensure_seeded().await?;
                Storage::Sqlite { db, documents, alerts }
            }
        };

        info!(
            data_dir = %dir.display(),
            backend = config.backend.as_str(),
            "Storage opened"
        );
        Ok(storage)
    }

    pub fn backend(&self) -> BackendKind {
        match self {
            Storage::FlatFile { .. } => BackendKind::FlatFile,
            Storage::Sqlite { .. } => BackendKind::Sqlite,
        }
    }

    fn documents(&self) -> &DocumentFolder {
        match self {
            Storage::FlatFile { documents, .. } | Storage::Sqlite { documents, .. } => documents,
        }
    }

    fn alerts(&self) -> &AlertFolder {
        match self {
            Storage::FlatFile { alerts, .. } | Storage::Sqlite { alerts, .. } => alerts,
        }
    }

    /// Loads the catalog into a fresh Inventory Store.
    pub async fn load_inventory(&self) -> DbResult<InventoryStore> {
        match self {
            Storage::FlatFile { catalog, .. } => catalog.load_all().await,
            Storage::Sqlite { db, .. } => db.products().load_all().await,
        }
    }

    /// Persists the store after a transaction and writes its documents.
    pub async fn commit_transaction(
        &self,
        store: &InventoryStore,
        tx: &Transaction,
        style: &DocumentStyle,
    ) -> DbResult<CommitReceipt> {
        let invoice = render_invoice(tx, style);

        match self {
            Storage::FlatFile {
                catalog,
                ledger,
                documents,
                ..
            } => {
                let staged = catalog.stage(store).await?;

                let invoice_path = match documents.write_document(tx, &invoice).await {
                    Ok(path) => path,
                    Err(err) => {
                        staged.discard().await;
                        return Err(err);
                    }
                };

                let entry = render_ledger_entry(tx, style);
                let mut ledger_path = None;
                if let Some(entry) = &entry {
                    match ledger.append_entry(tx.timestamp.date(), entry).await {
                        Ok(path) => ledger_path = Some(path),
                        Err(err) => {
                            error!(error = %err, "Ledger append failed, backing out invoice");
                            documents.remove(&invoice_path).await;
                            staged.discard().await;
                            return Err(err);
                        }
                    }
                }

                if let Err(err) = staged.publish().await {
                    error!(
                        error = %err,
                        invoice = %invoice_path.display(),
                        "Catalog not saved, backing out invoice and ledger entry"
                    );
                    if let (Some(path), Some(entry)) = (&ledger_path, &entry) {
                        if let Err(retract_err) = ledger.retract_entry(path, entry).await {
                            error!(error = %retract_err, ledger = %path.display(), "Ledger entry could not be retracted");
                        }
                    }
                    documents.remove(&invoice_path).await;
                    return Err(err);
                }

                let receipt = CommitReceipt {
                    transaction_id: Uuid::new_v4(),
                    invoice_path,
                    ledger_path,
                };
                info!(
                    transaction_id = %receipt.transaction_id,
                    kind = ?tx.kind(),
                    total = %tx.total_amount,
                    "Transaction committed"
                );
                Ok(receipt)
            }
            Storage::Sqlite { db, documents, .. } => {
                let invoice_path = documents.write_document(tx, &invoice).await?;

                match db.commit_transaction(store, tx).await {
                    Ok(transaction_id) => Ok(CommitReceipt {
                        transaction_id,
                        invoice_path,
                        ledger_path: None,
                    }),
                    Err(err) => {
                        error!(error = %err, "SQLite commit failed, backing out invoice");
                        documents.remove(&invoice_path).await;
                        Err(err)
                    }
                }
            }
        }
    }

    /// Renders the low-stock report for `store` and writes the day's alert
    /// file. Returns the file written.
    pub async fn write_stock_alert(&self, store: &InventoryStore, date: NaiveDate) -> DbResult<PathBuf> {
        let body = render_stock_alert(&store.low_stock());
        self.alerts().write_alert(date, &body).await
    }

    /// The day's sales ledger text, empty when nothing was sold.
    pub async fn sales_report(&self, date: NaiveDate, style: &DocumentStyle) -> DbResult<String> {
        match self {
            Storage::FlatFile { ledger, .. } => ledger.read(date).await,
            Storage::Sqlite { db, .. } => {
                let records = db.purchases().list_for_date(date).await?;
                Ok(group_into_transactions(records)
                    .iter()
                    .filter_map(|tx| render_ledger_entry(tx, style))
                    .collect())
            }
        }
    }

    /// Registers a customer and returns the stored record with its new id.
    pub async fn add_customer(&self, details: NewCustomer) -> DbResult<Customer> {
        let customer = match self {
            Storage::FlatFile { customers, .. } => customers.append(details).await?,
            Storage::Sqlite { db, .. } => db.customers().insert(details).await?,
        };
        info!(customer_id = %customer.customer_id, "Customer registered");
        Ok(customer)
    }

    /// Every registered customer, in registration order.
    pub async fn list_customers(&self) -> DbResult<Vec<Customer>> {
        match self {
            Storage::FlatFile { customers, .. } => customers.load_all().await,
            Storage::Sqlite { db, .. } => db.customers().list().await,
        }
    }

    /// Releases the SQLite pool. Flat files hold nothing open between calls.
    pub async fn close(&self) {
        if let Storage::Sqlite { db, .. } = self {
            db.close().await;
        }
    }

    /// Folder invoices are written to.
    pub fn invoice_dir(&self) -> &Path {
        self.documents().dir()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
