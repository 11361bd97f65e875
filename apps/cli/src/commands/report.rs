//! `wecare report`: prints one day's sales ledger.

use chrono::NaiveDate;
use std::io::Write;

use crate::error::AppResult;
use crate::Session;

pub async fn report<W: Write>(session: &Session, out: &mut W, date: NaiveDate) -> AppResult<()> {
    let text = session.storage.sales_report(date, &session.style).await?;

    if text.trim().is_empty() {
        writeln!(out, "No sales recorded for {}.", date)?;
    } else {
        writeln!(out, "Sales Report for {}", date)?;
        writeln!(out, "{}", "=".repeat(50))?;
        write!(out, "{}", text)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SellArgs;
    use crate::commands::{fixtures, sale};
    use crate::Session;
    use tempfile::tempdir;
    use wecare_db::BackendKind;

    async fn sell_one(session: &Session, at: chrono::NaiveDateTime) {
        let args = SellArgs {
            customer: Some("Asha Rao".into()),
            payment: Some("cash".into()),
            items: vec!["P001:9".into()],
        };
        sale::sell(session, &mut fixtures::prompter(""), &args, at)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_report_after_sale() {
        let dir = tempdir().unwrap();
        let session = fixtures::session(&dir).await;
        let day = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        sell_one(&session, day.and_hms_opt(11, 0, 0).unwrap()).await;

        let mut out = Vec::new();
        report(&session, &mut out, day).await.unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("Sales Report for 2026-03-14\n"));
        assert!(text.contains("Date: 2026-03-14 11:00:00"));
        assert!(text.contains("Vitamin C Serum (Garnier) - Qty: 9, Rs. 18000.00"));
        assert!(text.contains("Total Sale: Rs. 18000.00"));
    }

    #[tokio::test]
    async fn test_report_for_quiet_day() {
        let dir = tempdir().unwrap();
        let session = fixtures::session(&dir).await;

        let mut out = Vec::new();
        report(&session, &mut out, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())
            .await
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No sales recorded for 2026-01-01.\n");
    }

    #[tokio::test]
    async fn test_sqlite_report_matches_flat_file() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let at = day.and_hms_opt(11, 0, 0).unwrap();

        let flat_dir = tempdir().unwrap();
        let flat = fixtures::session(&flat_dir).await;
        sell_one(&flat, at).await;

        let sqlite_dir = tempdir().unwrap();
        let sqlite = Session::open(fixtures::config(&sqlite_dir, BackendKind::Sqlite))
            .await
            .unwrap();
        sell_one(&sqlite, at).await;

        let mut flat_out = Vec::new();
        report(&flat, &mut flat_out, day).await.unwrap();
        let mut sqlite_out = Vec::new();
        report(&sqlite, &mut sqlite_out, day).await.unwrap();

        assert_eq!(flat_out, sqlite_out);
    }
}
