//! Command-line arguments.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "wecare", version, about = "WeCare store inventory and sales")]
pub struct Cli {
    /// Folder holding the catalog, invoices and reports
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Storage backend: flat or sqlite
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Staff member recorded on sales
    #[arg(long, global = true)]
    pub staff: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show every product with its selling price
    List {
        #[arg(long)]
        json: bool,
    },
    /// Find products by name, brand or origin
    Search {
        keyword: String,
        #[arg(long)]
        json: bool,
    },
    /// Record a customer sale (buy 3, get 1 free)
    Sell(SellArgs),
    /// Record a supplier delivery
    Restock(RestockArgs),
    /// List products below the low-stock threshold and save today's alert
    Alerts {
        #[arg(long)]
        json: bool,
    },
    /// Print the sales ledger for a day
    Report {
        /// Day to report, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Manage the customer registry
    Customer {
        #[command(subcommand)]
        action: CustomerCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum CustomerCommand {
    /// Register a customer; prompts for details when --name is omitted
    Add(CustomerAddArgs),
    /// Show registered customers
    List {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct CustomerAddArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub address: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SellArgs {
    /// Customer name; prompted for when omitted
    #[arg(long)]
    pub customer: Option<String>,

    /// cash, credit-card or upi
    #[arg(long)]
    pub payment: Option<String>,

    /// Line item as ID:QTY, repeatable; prompts line by line when omitted
    #[arg(long = "item", value_name = "ID:QTY")]
    pub items: Vec<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RestockArgs {
    /// Supplier name; prompted for when omitted
    #[arg(long)]
    pub supplier: Option<String>,

    /// Line item as "id, name, brand, qty, cost, origin", repeatable
    #[arg(long = "item", value_name = "LINE")]
    pub items: Vec<String>,
}
