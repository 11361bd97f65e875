//! # Seed Data Generator
//!
//! Prepares a data directory for development: the default catalog plus,
//! optionally, a batch of generated demo products.
//!
//! ## Usage
//! ```bash
//! # Default three products in ./wecare_dev (flat files)
//! cargo run -p wecare-db --bin seed
//!
//! # SQLite backend with 200 extra demo products
//! cargo run -p wecare-db --bin seed -- --backend sqlite --demo 200
//!
//! # Specify data directory
//! cargo run -p wecare-db --bin seed -- --dir ./data
//! ```
//!
//! Demo products get IDs `P100`, `P101`, ... and deterministic stock and
//! cost so repeated runs produce the same catalog. Roughly one in eight is
//! generated below the low-stock threshold.

use std::env;
use std::path::PathBuf;
use wecare_core::{Money, RestockLineRequest};
use wecare_db::migrations::migration_status;
use wecare_db::{BackendKind, LedgerLayout, Storage, StorageConfig};

/// Product lines for demo data: `(name, brand, origin)`.
const DEMO_LINES: &[(&str, &str, &str)] = &[
    ("Hydrating Toner", "Plum", "India"),
    ("Niacinamide Serum", "Minimalist", "India"),
    ("Night Cream", "Olay", "USA"),
    ("Lip Balm", "Nivea", "Germany"),
    ("Micellar Water", "Bioderma", "France"),
    ("Face Wash", "Neutrogena", "USA"),
    ("Eye Gel", "Mamaearth", "India"),
    ("Clay Mask", "Innisfree", "South Korea"),
];

/// Parsed command line.
#[derive(Debug, PartialEq)]
struct SeedArgs {
    demo: usize,
    dir: PathBuf,
    backend: BackendKind,
    help: bool,
}

impl Default for SeedArgs {
    fn default() -> Self {
        SeedArgs {
            demo: 0,
            dir: PathBuf::from("./wecare_dev"),
            backend: BackendKind::FlatFile,
            help: false,
        }
    }
}

fn parse_args(args: &[String]) -> Result<SeedArgs, String> {
    let mut parsed = SeedArgs::default();
    let value = |i: usize| {
        args.get(i + 1)
            .ok_or_else(|| format!("{} needs a value", args[i]))
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--demo" | "-n" => {
                let raw = value(i)?;
                parsed.demo = raw
                    .parse()
                    .map_err(|_| format!("--demo expects a whole number, got '{}'", raw))?;
                i += 1;
            }
            "--dir" | "-d" => {
                parsed.dir = PathBuf::from(value(i)?);
                i += 1;
            }
            "--backend" | "-b" => {
                parsed.backend = match value(i)?.as_str() {
                    "sqlite" => BackendKind::Sqlite,
                    "flat" => BackendKind::FlatFile,
                    other => return Err(format!("unknown backend '{}' (expected flat or sqlite)", other)),
                };
                i += 1;
            }
            "--help" | "-h" => parsed.help = true,
            other => return Err(format!("unexpected argument '{}'", other)),
        }
        i += 1;
    }
    Ok(parsed)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let SeedArgs { demo, dir, backend, help } = parse_args(&args)?;

    if help {
        println!("WeCare Seed Data Generator");
        println!();
        println!("Usage: seed [OPTIONS]");
        println!();
        println!("Options:");
        println!("  -d, --dir <PATH>       Data directory (default: ./wecare_dev)");
        println!("  -b, --backend <KIND>   flat or sqlite (default: flat)");
        println!("  -n, --demo <N>         Extra demo products to add (default: 0)");
        println!("  -h, --help             Show this help message");
        return Ok(());
    }

    println!("🌱 WeCare Seed Data Generator");
    println!("=============================");
    println!("Data dir: {}", dir.display());
    println!("Backend:  {}", backend.as_str());
    println!();

    let storage = Storage::open(&StorageConfig {
        data_dir: dir,
        backend,
        ledger_layout: LedgerLayout::Single,
    })
    .await?;
    println!("✓ Storage ready with default catalog");
    if let Storage::Sqlite { db, .. } = &storage {
        let (total, applied) = migration_status(db.pool()).await?;
        println!("✓ Migrations applied: {}/{}", applied, total);
    }

    if demo == 0 {
        storage.close().await;
        return Ok(());
    }

    let mut store = storage.load_inventory().await?;
    let mut added = 0;
    for index in 0..demo {
        let request = demo_product(index);
        if store.contains(&request.product_id) {
            continue;
        }
        if let Err(e) = store.upsert(&request) {
            eprintln!("Failed to add {}: {}", request.product_id, e);
            continue;
        }
        added += 1;
    }

    // Persist without producing an invoice: this is setup, not a delivery.
    match &storage {
        Storage::FlatFile { catalog, .. } => catalog.save_all(&store).await?,
        Storage::Sqlite { db, .. } => db.products().save_all(&store).await?,
    }
    storage.close().await;

    println!("✓ Added {} demo products ({} total)", added, store.len());
    println!("  Low stock: {}", store.low_stock().len());
    Ok(())
}

/// Builds a deterministic demo product for `index`.
fn demo_product(index: usize) -> RestockLineRequest {
    let (name, brand, origin) = DEMO_LINES[index % DEMO_LINES.len()];
    let batch = index / DEMO_LINES.len();

    let quantity = if index % 8 == 7 { 3 } else { 20 + (index * 37 % 180) as i64 };
    let cost = Money::from_major(150 + (index * 53 % 900) as i64);

    let name = if batch == 0 {
        name.to_string()
    } else {
        format!("{} {}", name, batch + 1)
    };

    RestockLineRequest::new(format!("P{}", 100 + index), quantity, cost)
        .name(name)
        .brand(brand)
        .origin(origin)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("seed").chain(list.iter().copied()).map(String::from).collect()
    }

    #[test]
    fn test_parse_args() {
        let parsed = parse_args(&args(&["--backend", "sqlite", "-n", "200", "--dir", "./data"])).unwrap();
        assert_eq!(parsed.demo, 200);
        assert_eq!(parsed.backend, BackendKind::Sqlite);
        assert_eq!(parsed.dir, PathBuf::from("./data"));

        assert_eq!(parse_args(&args(&[])).unwrap(), SeedArgs::default());
    }

    #[test]
    fn test_bad_demo_count_is_reported() {
        assert_eq!(
            parse_args(&args(&["--demo", "lots"])).unwrap_err(),
            "--demo expects a whole number, got 'lots'"
        );
        assert_eq!(parse_args(&args(&["--demo", "-5"])).unwrap_err(), "--demo expects a whole number, got '-5'");
        assert_eq!(parse_args(&args(&["--demo"])).unwrap_err(), "--demo needs a value");
        assert!(parse_args(&args(&["--backend", "postgres"])).is_err());
    }
}
