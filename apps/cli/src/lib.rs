//! # wecare
//!
//! Terminal front end for the WeCare store.
//!
//! ## Invocation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        One `wecare` Invocation                          │
//! │                                                                         │
//! │  main.rs: init tracing ──► parse Cli (clap)                             │
//! │                                  │                                      │
//! │                                  ▼                                      │
//! │  run(): StoreConfig::load() + flag overrides                            │
//! │                                  │                                      │
//! │                                  ▼                                      │
//! │  Session::open(): Storage::open (creates folder, seeds catalog)         │
//! │                                  │                                      │
//! │                                  ▼                                      │
//! │  commands::{product, sale, restock, alert, report, customer}            │
//! │         load_inventory ──► wecare-core ──► commit_transaction           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every command loads the catalog fresh and writes it back only after a
//! transaction with at least one committed line.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod prompt;

use std::io;
use wecare_core::DocumentStyle;
use wecare_db::Storage;

pub use cli::{Cli, Command, CustomerCommand};
pub use config::{ConfigError, StoreConfig};
pub use error::{AppError, AppResult, ErrorCode};
pub use prompt::Prompter;

/// Open storage plus the settings a command needs.
#[derive(Debug)]
pub struct Session {
    pub storage: Storage,
    pub config: StoreConfig,
    pub style: DocumentStyle,
}

impl Session {
    pub async fn open(config: StoreConfig) -> AppResult<Self> {
        let storage = Storage::open(&config.storage()).await?;
        Ok(Session {
            style: config.document_style(),
            storage,
            config,
        })
    }
}

/// Runs one parsed command against the configured store, talking to the
/// terminal on stdin/stdout.
pub async fn run(cli: Cli) -> AppResult<()> {
    let config = StoreConfig::load()?.with_overrides(
        cli.data_dir,
        cli.backend.as_deref(),
        cli.staff.as_deref(),
    )?;
    let session = Session::open(config).await?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut prompter = Prompter::new(stdin.lock(), stdout.lock());
    let now = chrono::Local::now().naive_local();

    let result = match cli.command {
        Command::List { json } => commands::product::list(&session, prompter.output(), json).await,
        Command::Search { keyword, json } => {
            commands::product::search(&session, prompter.output(), &keyword, json).await
        }
        Command::Sell(args) => commands::sale::sell(&session, &mut prompter, &args, now)
            .await
            .map(|_| ()),
        Command::Restock(args) => commands::restock::restock(&session, &mut prompter, &args, now)
            .await
            .map(|_| ()),
        Command::Alerts { json } => {
            commands::alert::alerts(&session, prompter.output(), json, now.date())
                .await
                .map(|_| ())
        }
        Command::Report { date } => {
            commands::report::report(&session, prompter.output(), date.unwrap_or(now.date())).await
        }
        Command::Customer { action } => match action {
            CustomerCommand::Add(args) => commands::customer::add(&session, &mut prompter, &args)
                .await
                .map(|_| ()),
            CustomerCommand::List { json } => {
                commands::customer::list(&session, prompter.output(), json).await
            }
        },
    };

    session.storage.close().await;
    result
}
