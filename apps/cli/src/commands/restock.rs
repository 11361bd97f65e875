//! # Restock Command
//!
//! `wecare restock`: records a supplier delivery. Known products gain stock
//! and take the new cost price; unknown IDs become new products. Restocks
//! write a supplier invoice but no ledger entry.

use chrono::NaiveDateTime;
use std::io::{BufRead, Write};
use tracing::info;
use wecare_core::document::render_invoice;
use wecare_core::processor::{RestockBatch, TransactionProcessor};
use wecare_core::{DocumentStyle, RestockLineRequest};
use wecare_db::CommitReceipt;

use super::party_name;
use crate::cli::RestockArgs;
use crate::error::AppResult;
use crate::prompt::{parse_restock_item, LinePrompt, Prompter};
use crate::Session;

/// Runs one delivery. Returns the receipt, or `None` when no line was
/// accepted.
pub async fn restock<R: BufRead, W: Write>(
    session: &Session,
    prompter: &mut Prompter<R, W>,
    args: &RestockArgs,
    now: NaiveDateTime,
) -> AppResult<Option<CommitReceipt>> {
    let supplier = match &args.supplier {
        Some(name) => name.clone(),
        None => match prompter.ask_required("Supplier name")? {
            Some(name) => name,
            None => {
                writeln!(prompter.output(), "Restock cancelled.")?;
                return Ok(None);
            }
        },
    };
    let supplier = party_name("supplier name", &supplier)?;

    let mut store = session.storage.load_inventory().await?;
    let tx = {
        let mut processor = TransactionProcessor::new(&mut store);
        let mut batch = processor.begin_restock(supplier);

        if args.items.is_empty() {
            loop {
                match prompter.next_restock_line()? {
                    LinePrompt::Done => break,
                    LinePrompt::Invalid(reason) => writeln!(prompter.output(), "  ✗ {}", reason)?,
                    LinePrompt::Line(request) => {
                        add_line(&mut batch, prompter.output(), &request, &session.style)?
                    }
                }
            }
        } else {
            for item in &args.items {
                match parse_restock_item(item) {
                    Ok(request) => add_line(&mut batch, prompter.output(), &request, &session.style)?,
                    Err(err) => writeln!(prompter.output(), "  ✗ {}: {}", item, err)?,
                }
            }
        }

        batch.finish(now)
    };

    let Some(tx) = tx else {
        writeln!(prompter.output(), "No items restocked; nothing recorded.")?;
        return Ok(None);
    };

    let receipt = session
        .storage
        .commit_transaction(&store, &tx, &session.style)
        .await?;
    info!(
        supplier = %tx.party_name,
        lines = tx.lines.len(),
        total = %tx.total_amount,
        "Restock recorded"
    );

    let out = prompter.output();
    writeln!(out)?;
    write!(out, "{}", render_invoice(&tx, &session.style))?;
    writeln!(out)?;
    writeln!(out, "Restock invoice saved as {}", receipt.invoice_path.display())?;

    Ok(Some(receipt))
}

fn add_line<W: Write>(
    batch: &mut RestockBatch<'_>,
    out: &mut W,
    request: &RestockLineRequest,
    style: &DocumentStyle,
) -> AppResult<()> {
    match batch.add_line(request) {
        Ok(line) => {
            let action = if line.created { "Added" } else { "Restocked" };
            writeln!(
                out,
                "  ✓ {} {} ({}) - Quantity: {}, Cost: {}",
                action,
                line.product_name,
                line.brand,
                line.quantity,
                style.amount(line.unit_cost)
            )?
        }
        Err(err) => {
            writeln!(out, "  ✗ {}", err)?;
            return Ok(());
        }
    }
    writeln!(out, "    running total {}", style.amount(batch.total()))?;
    Ok(())
}
