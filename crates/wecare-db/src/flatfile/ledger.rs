//! # Sales Ledger
//!
//! Append-only text record of completed sales, separate from the invoices.
//!
//! ## Layouts
//! ```text
//! Single:  {root}/sales_report.txt
//! Daily:   {root}/sales_reports/sales_report_2024-03-01.txt
//! ```
//!
//! Entries start with a `Date: YYYY-MM-DD HH:MM:SS` line and end with a
//! blank line, so a single-file ledger can still be read back per day.

use chrono::NaiveDate;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::error::DbResult;

/// Where ledger entries go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LedgerLayout {
    /// Everything in one `sales_report.txt`.
    #[default]
    Single,
    /// One file per calendar day.
    Daily,
}

impl LedgerLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerLayout::Single => "single",
            LedgerLayout::Daily => "daily",
        }
    }
}

/// The sales ledger under a data directory.
#[derive(Debug, Clone)]
pub struct LedgerFile {
    root: PathBuf,
    layout: LedgerLayout,
}

impl LedgerFile {
    pub fn new(root: impl Into<PathBuf>, layout: LedgerLayout) -> Self {
        LedgerFile {
            root: root.into(),
            layout,
        }
    }

    /// The file that holds entries for `date`.
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        match self.layout {
            LedgerLayout::Single => self.root.join("sales_report.txt"),
            LedgerLayout::Daily => self
                .root
                .join("sales_reports")
                .join(format!("sales_report_{}.txt", date.format("%Y-%m-%d"))),
        }
    }

    /// Appends one rendered entry dated `date`.
    pub async fn append_entry(&self, date: NaiveDate, entry: &str) -> DbResult<PathBuf> {
        let path = self.path_for(date);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(entry.as_bytes()).await?;
        file.flush().await?;

        debug!(path = %path.display(), "Ledger entry appended");
        Ok(path)
    }

    /// Removes `entry` from the end of the ledger at `path`, undoing the
    /// last [`LedgerFile::append_entry`]. Returns `false` and leaves the file
    /// alone if it no longer ends with that entry.
    pub async fn retract_entry(&self, path: &Path, entry: &str) -> DbResult<bool> {
        let text = fs::read_to_string(path).await?;
        if !text.ends_with(entry) {
            warn!(path = %path.display(), "Ledger changed since append, entry left in place");
            return Ok(false);
        }

        let file = fs::OpenOptions::new().write(true).open(path).await?;
        file.set_len((text.len() - entry.len()) as u64).await?;
        file.sync_all().await?;

        debug!(path = %path.display(), "Ledger entry retracted");
        Ok(true)
    }

    /// All entries recorded for `date`, in the order they were written.
    /// Empty when there were no sales that day.
    pub async fn read(&self, date: NaiveDate) -> DbResult<String> {
        let path = self.path_for(date);
        let text = match fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(String::new()),
            Err(err) => return Err(err.into()),
        };

        Ok(match self.layout {
            LedgerLayout::Daily => text,
            LedgerLayout::Single => entries_for(&text, date),
        })
    }
}

/// Picks the entries of one day out of a multi-day ledger.
fn entries_for(text: &str, date: NaiveDate) -> String {
    let prefix = format!("Date: {}", date.format("%Y-%m-%d"));
    text.split("\n\n")
        .filter(|entry| entry.trim_start().starts_with(&prefix))
        .map(|entry| format!("{}\n\n", entry.trim_start_matches('\n')))
        .collect()
}
