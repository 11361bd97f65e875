//! # Default Catalog
//!
//! The three products a fresh store starts with.

use wecare_core::inventory::InventoryStore;
use wecare_core::{Money, Product};

/// `(id, name, brand, quantity, cost in whole rupees, origin)`
pub const DEFAULT_PRODUCTS: &[(&str, &str, &str, i64, i64, &str)] = &[
    ("P001", "Vitamin C Serum", "Garnier", 200, 1000, "France"),
    ("P002", "Skin Cleanser", "Cetaphil", 100, 280, "Switzerland"),
    ("P003", "Sunscreen", "Aqualogica", 200, 700, "India"),
];

/// Builds an Inventory Store holding [`DEFAULT_PRODUCTS`] in order.
pub fn default_catalog() -> InventoryStore {
    InventoryStore::from_products(DEFAULT_PRODUCTS.iter().map(
        |&(id, name, brand, quantity, cost, origin)| {
            Product::new(id, name, brand, quantity, Money::from_major(cost), origin)
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let store = default_catalog();
        let ids: Vec<&str> = store.list().iter().map(|p| p.id()).collect();
        assert_eq!(ids, ["P001", "P002", "P003"]);
        assert_eq!(store.get("P002").unwrap().selling_price(), Money::from_major(560));
        assert!(store.low_stock().is_empty());
    }
}
