//! `wecare alerts`: low-stock scan.
//!
//! Always writes the day's alert file (`stock_alerts/alert_YYYYMMDD.txt`),
//! then prints the same text, or the products as JSON with `--json`.

use chrono::NaiveDate;
use std::io::Write;
use std::path::PathBuf;
use tracing::warn;
use wecare_core::document::render_stock_alert;

use super::product::write_json;
use crate::error::AppResult;
use crate::Session;

pub async fn alerts<W: Write>(session: &Session, out: &mut W, json: bool, today: NaiveDate) -> AppResult<PathBuf> {
    let store = session.storage.load_inventory().await?;
    let low_stock = store.low_stock();
    if !low_stock.is_empty() {
        warn!(count = low_stock.len(), "Products below low-stock threshold");
    }

    let path = session.storage.write_stock_alert(&store, today).await?;

    if json {
        write_json(out, &low_stock)?;
    } else {
        write!(out, "{}", render_stock_alert(&low_stock))?;
        writeln!(out, "Alert saved as {}", path.display())?;
    }
    Ok(path)
}
