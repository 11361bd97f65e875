//! # Inventory Store
//!
//! The in-memory product catalog and the only code allowed to change it.
//!
//! ## Mutation Boundary
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Who may touch a Product?                             │
//! │                                                                         │
//! │   get / list / search / low_stock   ──► read only, anyone               │
//! │                                                                         │
//! │   upsert(restock line)              ──► quantity += n                   │
//! │                                         cost, name, brand, origin       │
//! │                                         replaced                        │
//! │                                                                         │
//! │   adjust_quantity(id, delta)        ──► quantity += delta               │
//! │                                         refused if result < 0           │
//! │                                                                         │
//! │   Everything else gets `&Product`, whose fields are private.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every check runs before the first write, so a refused operation leaves the
//! store exactly as it was and nothing needs rolling back.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{Product, RestockLineRequest};
use crate::validation::{validate_cost_price, validate_display_field, validate_product_id, validate_quantity};
use crate::LOW_STOCK_THRESHOLD;

/// What `upsert` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new product was added with the given quantity as its initial stock.
    Inserted,
    /// An existing product was topped up.
    Restocked { previous_quantity: i64 },
}

/// Products keyed by ID, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryStore {
    products: Vec<Product>,
    index: HashMap<String, usize>,
}

impl InventoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        InventoryStore::default()
    }

    /// Builds a store from loaded records.
    ///
    /// A repeated ID replaces the earlier record in place, the way loading
    /// lines into a map would. Records are not validated: whatever storage
    /// holds is what the store holds.
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        let mut store = InventoryStore::new();
        for product in products {
            match store.index.get(product.id()) {
                Some(&pos) => store.products[pos] = product,
                None => {
                    store.index.insert(product.id().to_string(), store.products.len());
                    store.products.push(product);
                }
            }
        }
        store
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Looks up a product by ID.
    pub fn get(&self, id: &str) -> CoreResult<&Product> {
        self.index
            .get(id)
            .map(|&pos| &self.products[pos])
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All products in insertion order.
    pub fn list(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Products with fewer than [`LOW_STOCK_THRESHOLD`] units on hand.
    pub fn low_stock(&self) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.quantity() < LOW_STOCK_THRESHOLD)
            .collect()
    }

    /// Case-insensitive substring search over name, brand and origin.
    /// A blank keyword matches everything.
    pub fn search(&self, keyword: &str) -> Vec<&Product> {
        let keyword = keyword.trim().to_lowercase();
        self.products
            .iter()
            .filter(|p| {
                keyword.is_empty()
                    || p.name().to_lowercase().contains(&keyword)
                    || p.brand().to_lowercase().contains(&keyword)
                    || p.origin().to_lowercase().contains(&keyword)
            })
            .collect()
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Inserts a new product or restocks an existing one.
    ///
    /// ## Semantics
    /// - Existing ID: `quantity` is **added**; `cost_price` is **replaced**
    ///   unconditionally; name/brand/origin are replaced when given and
    ///   non-blank, kept otherwise.
    /// - New ID: inserted with the given fields, `quantity` as initial stock.
    ///   A name is required.
    ///
    /// ## Errors
    /// `CoreError::Validation` for a non-positive quantity or cost, a blank
    /// ID, or a display field the catalog file cannot hold.
    pub fn upsert(&mut self, request: &RestockLineRequest) -> CoreResult<UpsertOutcome> {
        let id = request.product_id.trim();
        validate_product_id(id)?;
        validate_quantity(request.quantity)?;
        validate_cost_price(request.cost_price)?;

        let name = given(&request.name);
        let brand = given(&request.brand);
        let origin = given(&request.origin);
        for (field, value) in [("name", name), ("brand", brand), ("origin", origin)] {
            if let Some(value) = value {
                validate_display_field(field, value)?;
            }
        }

        match self.index.get(id) {
            Some(&pos) => {
                let product = &mut self.products[pos];
                let previous_quantity = product.quantity();
                let quantity = previous_quantity
                    .checked_add(request.quantity)
                    .ok_or_else(|| ValidationError::invalid_format("quantity", "stock level too large"))?;

                let name = name.map_or_else(|| product.name().to_string(), str::to_string);
                let brand = brand.map_or_else(|| product.brand().to_string(), str::to_string);
                let origin = origin.map_or_else(|| product.origin().to_string(), str::to_string);

                product.overwrite_details(name, brand, origin, request.cost_price);
                product.set_quantity(quantity);

                debug!(product_id = %id, previous_quantity, quantity, "Restocked product");
                Ok(UpsertOutcome::Restocked { previous_quantity })
            }
            None => {
                let name = name.ok_or_else(|| ValidationError::required("name"))?;
                let product = Product::new(
                    id,
                    name,
                    brand.unwrap_or_default(),
                    request.quantity,
                    request.cost_price,
                    origin.unwrap_or_default(),
                );

                debug!(product_id = %id, quantity = request.quantity, "Inserted product");
                self.index.insert(id.to_string(), self.products.len());
                self.products.push(product);
                Ok(UpsertOutcome::Inserted)
            }
        }
    }

    /// Applies `quantity += delta` and returns the new quantity.
    ///
    /// ## Errors
    /// - `ProductNotFound` for an unknown ID
    /// - `InsufficientStock` if the result would be negative; `requested` is
    ///   the number of units the caller tried to take out
    pub fn adjust_quantity(&mut self, id: &str, delta: i64) -> CoreResult<i64> {
        let pos = *self
            .index
            .get(id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;
        let product = &mut self.products[pos];
        let available = product.quantity();

        let quantity = match available.checked_add(delta) {
            Some(q) if q >= 0 => q,
            Some(_) => {
                return Err(CoreError::InsufficientStock {
                    product_id: id.to_string(),
                    available,
                    requested: delta.saturating_neg(),
                })
            }
            None => {
                return Err(ValidationError::invalid_format("quantity", "stock level too large").into())
            }
        };

        product.set_quantity(quantity);
        debug!(product_id = %id, delta, quantity, "Adjusted stock");
        Ok(quantity)
    }
}

/// Treats a blank optional field as absent.
fn given(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn seeded() -> InventoryStore {
        InventoryStore::from_products(vec![
            Product::new("P001", "Vitamin C Serum", "Garnier", 200, Money::from_major(1000), "France"),
            Product::new("P002", "Skin Cleanser", "Cetaphil", 100, Money::from_major(280), "Switzerland"),
            Product::new("P003", "Sunscreen", "Aqualogica", 200, Money::from_major(700), "India"),
        ])
    }

    #[test]
    fn test_get_and_list_keep_file_order() {
        let store = seeded();
        assert_eq!(store.get("P002").unwrap().brand(), "Cetaphil");
        let ids: Vec<&str> = store.list().iter().map(|p| p.id()).collect();
        assert_eq!(ids, ["P001", "P002", "P003"]);
    }

    #[test]
    fn test_get_unknown_is_not_found() {
        let store = seeded();
        assert_eq!(
            store.get("P404").unwrap_err(),
            CoreError::ProductNotFound("P404".to_string())
        );
    }

    #[test]
    fn test_from_products_duplicate_replaces_in_place() {
        let store = InventoryStore::from_products(vec![
            Product::new("A", "First", "X", 1, Money::from_major(1), "Y"),
            Product::new("B", "Other", "X", 1, Money::from_major(1), "Y"),
            Product::new("A", "Second", "X", 5, Money::from_major(1), "Y"),
        ]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.list()[0].name(), "Second");
        assert_eq!(store.get("A").unwrap().quantity(), 5);
    }

    #[test]
    fn test_restock_existing_adds_quantity_and_replaces_cost() {
        let mut store = seeded();
        let outcome = store
            .upsert(&RestockLineRequest::new("P002", 25, Money::from_major(300)))
            .unwrap();

        assert_eq!(outcome, UpsertOutcome::Restocked { previous_quantity: 100 });
        let p = store.get("P002").unwrap();
        assert_eq!(p.quantity(), 125);
        assert_eq!(p.cost_price(), Money::from_major(300));
        // Blank display fields keep what was there.
        assert_eq!(p.name(), "Skin Cleanser");
        assert_eq!(p.origin(), "Switzerland");
    }

    #[test]
    fn test_restock_existing_overwrites_given_fields() {
        let mut store = seeded();
        store
            .upsert(
                &RestockLineRequest::new("P003", 10, Money::from_major(650))
                    .name("Sunscreen SPF50")
                    .brand("  ")
                    .origin("Korea"),
            )
            .unwrap();

        let p = store.get("P003").unwrap();
        assert_eq!(p.name(), "Sunscreen SPF50");
        assert_eq!(p.brand(), "Aqualogica");
        assert_eq!(p.origin(), "Korea");
    }

    #[test]
    fn test_insert_new_product_uses_quantity_verbatim() {
        let mut store = seeded();
        let outcome = store
            .upsert(&RestockLineRequest::new("P099", 50, Money::from_major(300)).name("Toner"))
            .unwrap();

        assert_eq!(outcome, UpsertOutcome::Inserted);
        let p = store.get("P099").unwrap();
        assert_eq!(p.quantity(), 50);
        assert_eq!(p.selling_price(), Money::from_major(600));
        assert_eq!(store.list().last().unwrap().id(), "P099");
    }

    #[test]
    fn test_insert_requires_name() {
        let mut store = seeded();
        let err = store
            .upsert(&RestockLineRequest::new("P100", 5, Money::from_major(10)))
            .unwrap_err();
        assert!(err.is_invalid_input());
        assert!(!store.contains("P100"));
    }

    #[test]
    fn test_upsert_rejects_non_positive_amounts_without_mutation() {
        let mut store = seeded();
        let before = store.clone();

        assert!(store.upsert(&RestockLineRequest::new("P001", 0, Money::from_major(10))).is_err());
        assert!(store.upsert(&RestockLineRequest::new("P001", -5, Money::from_major(10))).is_err());
        assert!(store.upsert(&RestockLineRequest::new("P001", 5, Money::zero())).is_err());
        assert!(store
            .upsert(&RestockLineRequest::new("P001", 5, Money::from_major(10)).name("Serum, 30ml"))
            .is_err());

        assert_eq!(store, before);
    }

    #[test]
    fn test_adjust_quantity_decrements() {
        let mut store = seeded();
        assert_eq!(store.adjust_quantity("P001", -12).unwrap(), 188);
        assert_eq!(store.get("P001").unwrap().quantity(), 188);
    }

    #[test]
    fn test_adjust_quantity_refuses_negative_result() {
        let mut store = seeded();
        let err = store.adjust_quantity("P002", -101).unwrap_err();
        assert_eq!(
            err,
            CoreError::InsufficientStock {
                product_id: "P002".to_string(),
                available: 100,
                requested: 101,
            }
        );
        assert_eq!(store.get("P002").unwrap().quantity(), 100);
    }

    #[test]
    fn test_adjust_quantity_to_exactly_zero_is_allowed() {
        let mut store = seeded();
        assert_eq!(store.adjust_quantity("P002", -100).unwrap(), 0);
    }

    #[test]
    fn test_adjust_quantity_unknown_product() {
        let mut store = seeded();
        assert!(store.adjust_quantity("P404", -1).unwrap_err().is_not_found());
    }

    #[test]
    fn test_low_stock_threshold_is_exclusive() {
        let mut store = seeded();
        store.adjust_quantity("P001", -191).unwrap(); // 9 left
        store.adjust_quantity("P002", -90).unwrap(); // 10 left

        let low: Vec<&str> = store.low_stock().iter().map(|p| p.id()).collect();
        assert_eq!(low, ["P001"]);
    }

    #[test]
    fn test_search_matches_name_brand_and_origin() {
        let store = seeded();
        let ids = |hits: Vec<&Product>| hits.iter().map(|p| p.id().to_string()).collect::<Vec<_>>();

        assert_eq!(ids(store.search("serum")), ["P001"]);
        assert_eq!(ids(store.search("CETAPHIL")), ["P002"]);
        assert_eq!(ids(store.search("india")), ["P003"]);
        assert_eq!(store.search("").len(), 3);
        assert!(store.search("shampoo").is_empty());
    }
}
