//! Invoice folder.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use wecare_core::document::invoice_filename;
use wecare_core::Transaction;

use crate::error::DbResult;

/// Writes one text document per transaction into a folder.
#[derive(Debug, Clone)]
pub struct DocumentFolder {
    dir: PathBuf,
}

impl DocumentFolder {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DocumentFolder { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `body` under the transaction's invoice file name and returns
    /// the path written.
    ///
    /// Never overwrites: a second invoice for the same party within the same
    /// second gets a `_2`, `_3`, ... suffix.
    pub async fn write_document(&self, tx: &Transaction, body: &str) -> DbResult<PathBuf> {
        fs::create_dir_all(&self.dir).await?;

        let filename = invoice_filename(tx);
        let stem = filename.trim_end_matches(".txt");

        let mut attempt = 1;
        loop {
            let path = if attempt == 1 {
                self.dir.join(&filename)
            } else {
                self.dir.join(format!("{}_{}.txt", stem, attempt))
            };

            match fs::OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(mut file) => {
                    file.write_all(body.as_bytes()).await?;
                    file.flush().await?;
                    debug!(path = %path.display(), "Invoice written");
                    return Ok(path);
                }
                Err(err) if err.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Removes a document written earlier. Used to back out an invoice whose
    /// transaction did not make it into the ledger.
    pub async fn remove(&self, path: &Path) {
        if let Err(err) = fs::remove_file(path).await {
            warn!(path = %path.display(), error = %err, "Could not remove invoice");
        }
    }
}
