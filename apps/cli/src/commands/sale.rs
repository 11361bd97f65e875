//! # Sale Command
//!
//! `wecare sell`: takes line items (prompted or `--item ID:QTY`), applies
//! the buy-3-get-1-free promotion through the processor, then saves the
//! catalog, the invoice and the ledger entry together.
//!
//! ## Sale Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  customer name (flag or prompt)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  load_inventory ──► begin_sale                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  for each line: add_line ──► ✓ committed | ✗ reported, keep going       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  finish(now) ──► None: nothing recorded, no files touched               │
//! │       │                                                                 │
//! │       ▼ Some(tx)                                                        │
//! │  commit_transaction ──► print invoice, message, low-stock warnings      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDateTime;
use rand::seq::SliceRandom;
use std::io::{BufRead, Write};
use tracing::info;
use wecare_core::document::render_invoice;
use wecare_core::processor::{SaleBatch, TransactionProcessor};
use wecare_core::{DocumentStyle, PaymentMethod, SaleLineRequest};
use wecare_db::CommitReceipt;

use super::party_name;
use crate::cli::SellArgs;
use crate::error::AppResult;
use crate::prompt::{parse_sale_item, LinePrompt, Prompter};
use crate::Session;

/// Printed after every completed sale, one picked at random.
pub const MESSAGES: &[&str] = &[
    "You're doing amazing! 💪",
    "Great job closing that sale! 🎉",
    "Keep going, sales star! 🌟",
    "Another happy customer! 😊",
    "You're rocking it! 🔥",
];

/// Runs one sale. Returns the receipt, or `None` when no line was sold.
pub async fn sell<R: BufRead, W: Write>(
    session: &Session,
    prompter: &mut Prompter<R, W>,
    args: &SellArgs,
    now: NaiveDateTime,
) -> AppResult<Option<CommitReceipt>> {
    let payment = args
        .payment
        .as_deref()
        .map(str::parse::<PaymentMethod>)
        .transpose()?;

    let customer = match &args.customer {
        Some(name) => name.clone(),
        None => match prompter.ask_required("Customer name")? {
            Some(name) => name,
            None => {
                writeln!(prompter.output(), "Sale cancelled.")?;
                return Ok(None);
            }
        },
    };
    let customer = party_name("customer name", &customer)?;

    let mut store = session.storage.load_inventory().await?;
    let tx = {
        let mut processor = TransactionProcessor::new(&mut store);
        let mut batch = processor.begin_sale(customer, session.config.staff.as_str(), payment);

        if args.items.is_empty() {
            loop {
                match prompter.next_sale_line()? {
                    LinePrompt::Done => break,
                    LinePrompt::Invalid(reason) => writeln!(prompter.output(), "  ✗ {}", reason)?,
                    LinePrompt::Line(request) => {
                        add_line(&mut batch, prompter.output(), &request, &session.style)?
                    }
                }
            }
        } else {
            for item in &args.items {
                match parse_sale_item(item) {
                    Ok(request) => add_line(&mut batch, prompter.output(), &request, &session.style)?,
                    Err(err) => writeln!(prompter.output(), "  ✗ {}: {}", item, err)?,
                }
            }
        }

        batch.finish(now)
    };

    let Some(tx) = tx else {
        writeln!(prompter.output(), "No items sold; nothing recorded.")?;
        return Ok(None);
    };

    let receipt = session
        .storage
        .commit_transaction(&store, &tx, &session.style)
        .await?;
    info!(
        customer = %tx.party_name,
        lines = tx.lines.len(),
        total = %tx.total_amount,
        "Sale recorded"
    );

    let out = prompter.output();
    writeln!(out)?;
    write!(out, "{}", render_invoice(&tx, &session.style))?;
    writeln!(out)?;
    writeln!(out, "{}", motivational_message())?;
    writeln!(out, "Invoice saved as {}", receipt.invoice_path.display())?;

    for product in store.low_stock() {
        if tx.sale_lines().iter().any(|line| line.product_id == product.id()) {
            writeln!(
                out,
                "⚠️ {} ({}) is running low: only {} left",
                product.name(),
                product.brand(),
                product.quantity()
            )?;
        }
    }

    Ok(Some(receipt))
}

fn add_line<W: Write>(
    batch: &mut SaleBatch<'_>,
    out: &mut W,
    request: &SaleLineRequest,
    style: &DocumentStyle,
) -> AppResult<()> {
    let product_id = match batch.add_line(request) {
        Ok(line) => {
            writeln!(
                out,
                "  ✓ {} ({}) - Bought: {}, Free: {}, {}",
                line.product_name,
                line.brand,
                line.paid_quantity,
                line.free_quantity,
                style.amount(line.line_total)
            )?;
            line.product_id.clone()
        }
        Err(err) => {
            writeln!(out, "  ✗ {}", err)?;
            return Ok(());
        }
    };

    let left = batch.store().get(&product_id).map(|p| p.quantity())?;
    writeln!(out, "    {} left, running total {}", left, style.amount(batch.total()))?;
    Ok(())
}

fn motivational_message() -> &'static str {
    MESSAGES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("Sale complete.")
}
