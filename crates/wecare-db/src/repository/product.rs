//! # Product Repository
//!
//! The `products` table. Catalog order is insertion order (`rowid`), and
//! upserts keep a product's rowid, so the SQLite catalog lists products in
//! the same order as `products.txt` would.

use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::debug;
use wecare_core::inventory::InventoryStore;
use wecare_core::{Money, Product};

use crate::error::DbResult;

/// A row of the `products` table.
#[derive(Debug, Clone, FromRow)]
struct ProductRow {
    product_id: String,
    name: String,
    brand: String,
    quantity: i64,
    cost_cents: i64,
    origin: String,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product::new(
            row.product_id,
            row.name,
            row.brand,
            row.quantity,
            Money::from_minor(row.cost_cents),
            row.origin,
        )
    }
}

/// Repository for the catalog table.
///
/// ## Usage
/// ```rust,ignore
/// let store = db.products().load_all().await?;
/// db.products().save_all(&store).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Loads every product, in catalog order.
    pub async fn load_all(&self) -> DbResult<InventoryStore> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            r#"
            SELECT product_id, name, brand, quantity, cost_cents, origin
            FROM products
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Catalog loaded from SQLite");
        Ok(InventoryStore::from_products(rows.into_iter().map(Product::from)))
    }

    /// Writes the whole store in one SQL transaction.
    pub async fn save_all(&self, store: &InventoryStore) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;
        upsert_all(&mut *tx, store.list()).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Gets a product by ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(
            r#"
            SELECT product_id, name, brand, quantity, cost_cents, origin
            FROM products
            WHERE product_id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Number of products in the table.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Inserts or updates each product on an open connection or transaction.
pub(crate) async fn upsert_all(conn: &mut SqliteConnection, products: &[Product]) -> DbResult<()> {
    for product in products {
        sqlx::query(
            r#"
            INSERT INTO products (product_id, name, brand, quantity, cost_cents, origin)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(product_id) DO UPDATE SET
                name = excluded.name,
                brand = excluded.brand,
                quantity = excluded.quantity,
                cost_cents = excluded.cost_cents,
                origin = excluded.origin
            "#,
        )
        .bind(product.id())
        .bind(product.name())
        .bind(product.brand())
        .bind(product.quantity())
        .bind(product.cost_price().minor_units())
        .bind(product.origin())
        .execute(&mut *conn)
        .await?;
    }

    debug!(count = products.len(), "Products upserted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::seed::default_catalog;
    use crate::{Database, DbConfig};
    use wecare_core::{Money, RestockLineRequest};

    #[tokio::test]
    async fn test_save_and_load_keep_catalog_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut store = default_catalog();
        store
            .upsert(&RestockLineRequest::new("P099", 50, Money::from_major(300)).name("Toner"))
            .unwrap();

        db.products().save_all(&store).await.unwrap();
        assert_eq!(db.products().count().await.unwrap(), 4);
        assert_eq!(db.products().load_all().await.unwrap(), store);
    }

    #[tokio::test]
    async fn test_upsert_updates_in_place() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut store = default_catalog();
        db.products().save_all(&store).await.unwrap();

        store
            .upsert(&RestockLineRequest::new("P001", 20, Money::from_major(900)))
            .unwrap();
        db.products().save_all(&store).await.unwrap();

        let serum = db.products().get_by_id("P001").await.unwrap().unwrap();
        assert_eq!(serum.quantity(), 220);
        assert_eq!(serum.cost_price(), Money::from_major(900));

        let ids: Vec<String> = db
            .products()
            .load_all()
            .await
            .unwrap()
            .list()
            .iter()
            .map(|p| p.id().to_string())
            .collect();
        assert_eq!(ids, ["P001", "P002", "P003"]);
        assert!(db.products().get_by_id("P404").await.unwrap().is_none());
    }
}
