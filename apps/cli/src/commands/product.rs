//! # Product Commands
//!
//! `wecare list` and `wecare search <keyword>`.
//!
//! ## Output
//! ```text
//! Available Products:
//! P001 - Vitamin C Serum (Garnier) - Rs. 2000.00 - Qty: 200 - France
//! P002 - Skin Cleanser (Cetaphil) - Rs. 560.00 - Qty: 100 - Switzerland
//! ```
//!
//! With `--json` the same products are printed as an array of
//! [`ProductDto`].

use serde::Serialize;
use std::io::Write;
use tracing::debug;
use wecare_core::document::render_product_line;
use wecare_core::{DocumentStyle, Product, LOW_STOCK_THRESHOLD};

use crate::error::AppResult;
use crate::Session;

/// Product DTO for `--json` output.
///
/// Amounts are integer minor units (paise), as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub quantity: i64,
    pub cost_price_cents: i64,
    pub selling_price_cents: i64,
    pub origin: String,
    /// Below the low-stock threshold.
    pub low_stock: bool,
}

impl From<&Product> for ProductDto {
    fn from(p: &Product) -> Self {
        ProductDto {
            id: p.id().to_string(),
            name: p.name().to_string(),
            brand: p.brand().to_string(),
            quantity: p.quantity(),
            cost_price_cents: p.cost_price().minor_units(),
            selling_price_cents: p.selling_price().minor_units(),
            origin: p.origin().to_string(),
            low_stock: p.quantity() < LOW_STOCK_THRESHOLD,
        }
    }
}

/// Prints the whole catalog in file order.
pub async fn list<W: Write>(session: &Session, out: &mut W, json: bool) -> AppResult<()> {
    let store = session.storage.load_inventory().await?;
    debug!(count = store.len(), "Listing products");

    let products: Vec<&Product> = store.list().iter().collect();
    if json {
        return write_json(out, &products);
    }

    if products.is_empty() {
        writeln!(out, "No products in the catalog.")?;
        return Ok(());
    }
    writeln!(out, "Available Products:")?;
    write_lines(out, &products, &session.style)
}

/// Prints products whose name, brand or origin contains `keyword`.
pub async fn search<W: Write>(session: &Session, out: &mut W, keyword: &str, json: bool) -> AppResult<()> {
    let store = session.storage.load_inventory().await?;
    let matches = store.search(keyword);
    debug!(keyword = %keyword, matches = matches.len(), "Product search");

    if json {
        return write_json(out, &matches);
    }

    if matches.is_empty() {
        writeln!(out, "No products match '{}'.", keyword.trim())?;
        return Ok(());
    }
    write_lines(out, &matches, &session.style)
}

pub(crate) fn write_json<W: Write>(out: &mut W, products: &[&Product]) -> AppResult<()> {
    let dtos: Vec<ProductDto> = products.iter().map(|p| ProductDto::from(*p)).collect();
    serde_json::to_writer_pretty(&mut *out, &dtos)?;
    writeln!(out)?;
    Ok(())
}

fn write_lines<W: Write>(out: &mut W, products: &[&Product], style: &DocumentStyle) -> AppResult<()> {
    for product in products {
        writeln!(out, "{}", render_product_line(product, style))?;
    }
    Ok(())
}
