//! `wecare` binary entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use wecare_cli::Cli;

/// Initializes the tracing subscriber for logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Verbose logging for development
/// - `RUST_LOG=info` - Store opened, transactions committed
/// - Default - warnings, plus `wecare_cli` info (sale and restock summaries)
///
/// Logs go to stderr so prompts and invoices on stdout stay clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,wecare_cli=info,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(err) = wecare_cli::run(cli).await {
        eprintln!("Error: {}", err);
        std::process::exit(err.code.exit_code());
    }
}
