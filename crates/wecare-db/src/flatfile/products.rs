//! # Catalog File
//!
//! `products.txt`, one product per line:
//!
//! ```text
//! P001, Vitamin C Serum, Garnier, 200, 1000.00, France
//! P002, Skin Cleanser, Cetaphil, 100, 280.00, Switzerland
//! ```
//!
//! Fields are separated by `", "` and trimmed on read. Nothing is escaped,
//! so a comma inside a field breaks the record; the processor refuses such
//! values before they get here, and a damaged line fails the load with its
//! line number.
//!
//! ## Atomic Replace
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stage()    → write products.txt.tmp, fsync                             │
//! │  publish()  → rename products.txt.tmp → products.txt                    │
//! │  discard()  → remove products.txt.tmp                                   │
//! │                                                                         │
//! │  A crash at any point leaves either the old or the new catalog.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use wecare_core::inventory::InventoryStore;
use wecare_core::validation::{validate_cost_price, validate_product_id};
use wecare_core::{Money, Product};

use crate::error::{DbError, DbResult};
use crate::seed::default_catalog;

const FIELD_COUNT: usize = 6;

/// The product catalog on disk.
#[derive(Debug, Clone)]
pub struct ProductFile {
    path: PathBuf,
}

impl ProductFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ProductFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole catalog. Blank lines are skipped.
    ///
    /// ## Errors
    /// - `DbError::Io` if the file cannot be read
    /// - `DbError::Parse` for the first line that does not decode
    pub async fn load_all(&self) -> DbResult<InventoryStore> {
        let text = fs::read_to_string(&self.path).await?;

        let mut products = Vec::new();
        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let product =
                decode_line(line).map_err(|reason| DbError::parse(&self.path, index + 1, reason))?;
            products.push(product);
        }

        debug!(path = %self.path.display(), count = products.len(), "Catalog loaded");
        Ok(InventoryStore::from_products(products))
    }

    /// Replaces the catalog with the store's contents.
    pub async fn save_all(&self, store: &InventoryStore) -> DbResult<()> {
        self.stage(store).await?.publish().await
    }

    /// Writes the new catalog beside the live one without replacing it.
    pub async fn stage(&self, store: &InventoryStore) -> DbResult<StagedCatalog> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let temp_path = temp_path_for(&self.path);
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(encode_catalog(store).as_bytes()).await?;
        file.sync_all().await?;

        Ok(StagedCatalog {
            temp_path,
            target: self.path.clone(),
            count: store.len(),
        })
    }

    /// Writes the default catalog if no catalog exists yet.
    ///
    /// Returns `true` when the file was created.
    pub async fn ensure_seeded(&self) -> DbResult<bool> {
        if fs::try_exists(&self.path).await? {
            return Ok(false);
        }

        info!(path = %self.path.display(), "No catalog found, writing default products");
        self.save_all(&default_catalog()).await?;
        Ok(true)
    }
}

/// A catalog written to a temp file, waiting to replace the live one.
#[derive(Debug)]
#[must_use = "a staged catalog must be published or discarded"]
pub struct StagedCatalog {
    temp_path: PathBuf,
    target: PathBuf,
    count: usize,
}

impl StagedCatalog {
    /// Renames the staged file over the live catalog. On failure the staged
    /// file is removed and the live catalog is left as it was.
    pub async fn publish(self) -> DbResult<()> {
        if let Err(err) = fs::rename(&self.temp_path, &self.target).await {
            self.discard().await;
            return Err(err.into());
        }
        debug!(path = %self.target.display(), count = self.count, "Catalog saved");
        Ok(())
    }

    /// Drops the staged file, leaving the live catalog untouched.
    pub async fn discard(self) {
        if let Err(err) = fs::remove_file(&self.temp_path).await {
            warn!(path = %self.temp_path.display(), error = %err, "Could not remove staged catalog");
        }
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

// =============================================================================
// Line Codec
// =============================================================================

/// Encodes one product as a catalog line (no trailing newline).
pub fn encode_line(product: &Product) -> String {
    format!(
        "{}, {}, {}, {}, {}, {}",
        product.id(),
        product.name(),
        product.brand(),
        product.quantity(),
        product.cost_price(),
        product.origin()
    )
}

/// Encodes a whole store, one line per product in catalog order.
pub fn encode_catalog(store: &InventoryStore) -> String {
    store
        .list()
        .iter()
        .map(|p| encode_line(p) + "\n")
        .collect()
}

/// Decodes one catalog line. The error is a human-readable reason.
pub fn decode_line(line: &str) -> Result<Product, String> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != FIELD_COUNT {
        return Err(format!(
            "expected {} fields, found {}",
            FIELD_COUNT,
            fields.len()
        ));
    }

    let id = fields[0];
    validate_product_id(id).map_err(|e| e.to_string())?;

    let quantity: i64 = fields[3]
        .parse()
        .map_err(|_| format!("quantity '{}' is not a whole number", fields[3]))?;
    if quantity < 0 {
        return Err(format!("quantity {} is negative", quantity));
    }

    let cost = Money::parse(fields[4]).map_err(|e| e.to_string())?;
    validate_cost_price(cost).map_err(|e| e.to_string())?;

    Ok(Product::new(id, fields[1], fields[2], quantity, cost, fields[5]))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use wecare_core::RestockLineRequest;

    #[test]
    fn test_encode_line() {
        let p = Product::new("P002", "Skin Cleanser", "Cetaphil", 100, Money::from_minor(28_050), "Switzerland");
        assert_eq!(encode_line(&p), "P002, Skin Cleanser, Cetaphil, 100, 280.50, Switzerland");
    }

    #[test]
    fn test_decode_line_trims_and_accepts_old_spellings() {
        let p = decode_line("P001,  Vitamin C Serum , Garnier, 200, 1000.0, France").unwrap();
        assert_eq!(p.id(), "P001");
        assert_eq!(p.name(), "Vitamin C Serum");
        assert_eq!(p.cost_price(), Money::from_major(1000));
        assert_eq!(p.origin(), "France");
    }

    #[test]
    fn test_decode_line_rejects_bad_records() {
        assert!(decode_line("P001, Serum, 30ml, Garnier, 200, 1000, France")
            .unwrap_err()
            .contains("expected 6 fields, found 7"));
        assert!(decode_line("P001, Serum, Garnier, lots, 1000, France").is_err());
        assert!(decode_line("P001, Serum, Garnier, -1, 1000, France").is_err());
        assert!(decode_line("P001, Serum, Garnier, 1, free, France").is_err());
        assert!(decode_line(", Serum, Garnier, 1, 10, France").is_err());
        assert!(decode_line("PX, Gold Cream, Lux, 1, 50000000000000000, India")
            .unwrap_err()
            .contains("cost price has invalid format: must be at most 10000000.00"));
    }

    #[tokio::test]
    async fn test_round_trip_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let file = ProductFile::new(dir.path().join("products.txt"));

        let mut store = default_catalog();
        store
            .upsert(&RestockLineRequest::new("P099", 50, Money::from_minor(29_999)).name("Toner").brand("Plum"))
            .unwrap();
        file.save_all(&store).await.unwrap();

        let loaded = file.load_all().await.unwrap();
        assert_eq!(loaded, store);

        file.save_all(&loaded).await.unwrap();
        let text = fs::read_to_string(file.path()).await.unwrap();
        assert_eq!(text, encode_catalog(&store));
        assert!(text.ends_with("P099, Toner, Plum, 50, 299.99, \n"));
    }

    #[tokio::test]
    async fn test_load_reports_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.txt");
        fs::write(
            &path,
            "P001, Vitamin C Serum, Garnier, 200, 1000.00, France\n\nP002, Cleanser, 100ml, Cetaphil, 100, 280.00, Switzerland\n",
        )
        .await
        .unwrap();

        let err = ProductFile::new(&path).load_all().await.unwrap_err();
        match err {
            DbError::Parse { line, .. } => assert_eq!(line, 3),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProductFile::new(dir.path().join("nope.txt")).load_all().await.unwrap_err();
        assert!(matches!(err, DbError::Io(_)));
    }

    #[tokio::test]
    async fn test_ensure_seeded_only_once() {
        let dir = tempfile::tempdir().unwrap();
        let file = ProductFile::new(dir.path().join("data").join("products.txt"));

        assert!(file.ensure_seeded().await.unwrap());
        assert_eq!(file.load_all().await.unwrap().len(), 3);

        let mut store = file.load_all().await.unwrap();
        store.adjust_quantity("P001", -12).unwrap();
        file.save_all(&store).await.unwrap();

        assert!(!file.ensure_seeded().await.unwrap());
        assert_eq!(file.load_all().await.unwrap().get("P001").unwrap().quantity(), 188);
    }

    #[tokio::test]
    async fn test_discarded_stage_leaves_catalog_alone() {
        let dir = tempfile::tempdir().unwrap();
        let file = ProductFile::new(dir.path().join("products.txt"));
        file.ensure_seeded().await.unwrap();

        let mut store = file.load_all().await.unwrap();
        store.adjust_quantity("P003", -200).unwrap();
        let staged = file.stage(&store).await.unwrap();
        staged.discard().await;

        assert_eq!(file.load_all().await.unwrap().get("P003").unwrap().quantity(), 200);
        assert!(!dir.path().join("products.txt.tmp").exists());
    }
}
