//! # Commands
//!
//! One module per `wecare` subcommand.
//!
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports, shared test fixtures)
//! ├── product.rs  ◄─── list, search
//! ├── sale.rs     ◄─── sell
//! ├── restock.rs  ◄─── restock
//! ├── alert.rs    ◄─── alerts
//! ├── report.rs   ◄─── report
//! └── customer.rs ◄─── customer add, customer list
//! ```
//!
//! Commands write to any `io::Write` and, when they need answers, read
//! through a [`Prompter`](crate::prompt::Prompter), so tests run them
//! against byte buffers and a temporary data folder.

pub mod alert;
pub mod customer;
pub mod product;
pub mod report;
pub mod restock;
pub mod sale;

use wecare_core::validation::validate_display_field;
use wecare_core::ValidationError;

use crate::error::AppResult;

/// Checks a customer or supplier name given on the command line or at a
/// prompt.
fn party_name(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::required(field).into());
    }
    validate_display_field(field, value)?;
    Ok(value.to_string())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::io::Cursor;
    use tempfile::TempDir;
    use wecare_db::{BackendKind, LedgerLayout};

    use crate::config::StoreConfig;
    use crate::prompt::Prompter;
    use crate::Session;

    pub fn config(dir: &TempDir, backend: BackendKind) -> StoreConfig {
        StoreConfig {
            data_dir: dir.path().to_path_buf(),
            backend,
            ledger_layout: LedgerLayout::Single,
            staff: "priya".to_string(),
            currency_symbol: "Rs.".to_string(),
        }
    }

    pub async fn session(dir: &TempDir) -> Session {
        Session::open(config(dir, BackendKind::FlatFile)).await.unwrap()
    }

    pub fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    pub fn shown(prompter: &mut Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(prompter.output().clone()).unwrap()
    }
}
