//! # Store Configuration
//!
//! Loaded once at startup from environment variables, then overridden by
//! command-line flags.
//!
//! ## Sources (Priority Order)
//! 1. Flags (`--data-dir`, `--backend`, `--staff`)
//! 2. Environment variables (`WECARE_*`)
//! 3. Defaults (this file)
//!
//! | Variable               | Values               | Default              |
//! |------------------------|----------------------|----------------------|
//! | `WECARE_DATA_DIR`      | path                 | platform data dir    |
//! | `WECARE_BACKEND`       | `flat` \| `sqlite`   | `flat`               |
//! | `WECARE_LEDGER_LAYOUT` | `single` \| `daily`  | `single`             |
//! | `WECARE_STAFF`         | name                 | `admin`              |
//! | `WECARE_CURRENCY`      | symbol               | `Rs.`                |

use directories::ProjectDirs;
use std::env;
use std::path::PathBuf;
use wecare_core::DocumentStyle;
use wecare_db::{BackendKind, LedgerLayout, StorageConfig};

/// Fallback when the platform has no data directory (e.g. no `$HOME`).
const FALLBACK_DATA_DIR: &str = "./wecare_data";

const DEFAULT_STAFF: &str = "admin";

/// Runtime configuration for one `wecare` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub backend: BackendKind,
    pub ledger_layout: LedgerLayout,
    /// Recorded on invoices and ledger entries as the person who made the sale.
    pub staff: String,
    pub currency_symbol: String,
}

impl StoreConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from any key lookup. `load` passes the process
    /// environment; tests pass a map.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = match lookup("WECARE_DATA_DIR").filter(|v| !v.trim().is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir(),
        };

        let backend = match lookup("WECARE_BACKEND") {
            Some(value) => parse_backend("WECARE_BACKEND", &value)?,
            None => BackendKind::default(),
        };

        let ledger_layout = match lookup("WECARE_LEDGER_LAYOUT") {
            Some(value) => parse_ledger_layout("WECARE_LEDGER_LAYOUT", &value)?,
            None => LedgerLayout::default(),
        };

        let staff = lookup("WECARE_STAFF")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_STAFF.to_string());

        let currency_symbol = lookup("WECARE_CURRENCY")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DocumentStyle::default().currency_symbol);

        Ok(StoreConfig {
            data_dir,
            backend,
            ledger_layout,
            staff,
            currency_symbol,
        })
    }

    /// Applies command-line overrides.
    pub fn with_overrides(
        mut self,
        data_dir: Option<PathBuf>,
        backend: Option<&str>,
        staff: Option<&str>,
    ) -> Result<Self, ConfigError> {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        if let Some(backend) = backend {
            self.backend = parse_backend("--backend", backend)?;
        }
        if let Some(staff) = staff.map(str::trim).filter(|s| !s.is_empty()) {
            self.staff = staff.to_string();
        }
        Ok(self)
    }

    pub fn storage(&self) -> StorageConfig {
        StorageConfig {
            data_dir: self.data_dir.clone(),
            backend: self.backend,
            ledger_layout: self.ledger_layout,
        }
    }

    pub fn document_style(&self) -> DocumentStyle {
        DocumentStyle {
            currency_symbol: self.currency_symbol.clone(),
        }
    }
}

/// Platform data directory, e.g. `~/.local/share/store` on Linux.
fn default_data_dir() -> PathBuf {
    ProjectDirs::from("com", "wecare", "store")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR))
}

fn parse_backend(key: &str, value: &str) -> Result<BackendKind, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "flat" | "file" | "flatfile" => Ok(BackendKind::FlatFile),
        "sqlite" | "db" => Ok(BackendKind::Sqlite),
        _ => Err(ConfigError::invalid(key, value)),
    }
}

fn parse_ledger_layout(key: &str, value: &str) -> Result<LedgerLayout, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "single" => Ok(LedgerLayout::Single),
        "daily" => Ok(LedgerLayout::Daily),
        _ => Err(ConfigError::invalid(key, value)),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}

impl ConfigError {
    fn invalid(key: &str, value: &str) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}
