//! # Purchase Repository
//!
//! The `purchases` table: one row per committed sale line. This is the
//! SQLite backend's sales ledger; a day's report is rebuilt from it.

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::{debug, warn};
use uuid::Uuid;
use wecare_core::{Money, PaymentMethod, SaleLineResult, Transaction, TransactionLines};

use super::customer::find_id_by_name;
use crate::error::DbResult;

/// A row of the `purchases` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct PurchaseRecord {
    pub purchase_id: String,
    pub transaction_id: String,
    pub customer: String,
    pub customer_id: Option<String>,
    pub staff: String,
    pub product_id: String,
    pub product_name: String,
    pub brand: String,
    pub quantity: i64,
    pub free_quantity: i64,
    pub unit_price_cents: i64,
    pub total_cents: i64,
    pub payment_method: Option<String>,
    pub purchased_at: NaiveDateTime,
}

/// Repository for sale line records.
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    pool: SqlitePool,
}

impl PurchaseRepository {
    /// Creates a new PurchaseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PurchaseRepository { pool }
    }

    /// Every purchase row from `date`, oldest first.
    pub async fn list_for_date(&self, date: NaiveDate) -> DbResult<Vec<PurchaseRecord>> {
        let records: Vec<PurchaseRecord> = sqlx::query_as(
            r#"
            SELECT
                purchase_id, transaction_id, customer, customer_id, staff,
                product_id, product_name, brand,
                quantity, free_quantity, unit_price_cents, total_cents,
                payment_method, purchased_at
            FROM purchases
            WHERE date(purchased_at) = ?1
            ORDER BY purchased_at, rowid
            "#,
        )
        .bind(date.format("%Y-%m-%d").to_string())
        .fetch_all(&self.pool)
        .await?;

        debug!(%date, count = records.len(), "Purchases listed");
        Ok(records)
    }

    /// The rows of one transaction.
    pub async fn list_for_transaction(&self, transaction_id: Uuid) -> DbResult<Vec<PurchaseRecord>> {
        let records: Vec<PurchaseRecord> = sqlx::query_as(
            r#"
            SELECT
                purchase_id, transaction_id, customer, customer_id, staff,
                product_id, product_name, brand,
                quantity, free_quantity, unit_price_cents, total_cents,
                payment_method, purchased_at
            FROM purchases
            WHERE transaction_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(transaction_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}

/// Inserts one row per sale line, linked to the registered customer of the
/// same name when there is one. Restocks have no purchase rows.
pub(crate) async fn insert_sale(
    conn: &mut SqliteConnection,
    transaction_id: Uuid,
    tx: &Transaction,
) -> DbResult<usize> {
    if tx.sale_lines().is_empty() {
        return Ok(0);
    }

    let staff = tx.staff.as_deref().unwrap_or_default();
    let payment = tx.payment_method.map(|m| m.as_str());
    let customer_id = find_id_by_name(&mut *conn, &tx.party_name).await?;

    for line in tx.sale_lines() {
        sqlx::query(
            r#"
            INSERT INTO purchases (
                purchase_id, transaction_id, customer, customer_id, staff,
                product_id, product_name, brand,
                quantity, free_quantity, unit_price_cents, total_cents,
                payment_method, purchased_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(transaction_id.to_string())
        .bind(&tx.party_name)
        .bind(customer_id.as_deref())
        .bind(staff)
        .bind(&line.product_id)
        .bind(&line.product_name)
        .bind(&line.brand)
        .bind(line.paid_quantity)
        .bind(line.free_quantity)
        .bind(line.unit_price.minor_units())
        .bind(line.line_total.minor_units())
        .bind(payment)
        .bind(tx.timestamp)
        .execute(&mut *conn)
        .await?;
    }

    debug!(
        %transaction_id,
        lines = tx.sale_lines().len(),
        registered = customer_id.is_some(),
        "Purchase rows inserted"
    );
    Ok(tx.sale_lines().len())
}

/// Rebuilds sale transactions from purchase rows, grouping consecutive rows
/// that share a transaction id.
pub fn group_into_transactions(records: Vec<PurchaseRecord>) -> Vec<Transaction> {
    let mut transactions: Vec<(String, Transaction)> = Vec::new();

    for record in records {
        let line = SaleLineResult {
            product_id: record.product_id,
            product_name: record.product_name,
            brand: record.brand,
            paid_quantity: record.quantity,
            free_quantity: record.free_quantity,
            unit_price: Money::from_minor(record.unit_price_cents),
            line_total: Money::from_minor(record.total_cents),
        };

        if let Some((id, tx)) = transactions.last_mut() {
            if *id == record.transaction_id {
                tx.total_amount += line.line_total;
                if let TransactionLines::Sale(lines) = &mut tx.lines {
                    lines.push(line);
                }
                continue;
            }
        }

        let payment_method = record.payment_method.as_deref().and_then(|m| match m.parse::<PaymentMethod>() {
            Ok(method) => Some(method),
            Err(err) => {
                warn!(purchase_id = %record.purchase_id, error = %err, "Unknown payment method");
                None
            }
        });

        transactions.push((
            record.transaction_id,
            Transaction {
                party_name: record.customer,
                timestamp: record.purchased_at,
                staff: Some(record.staff),
                payment_method,
                total_amount: line.line_total,
                lines: TransactionLines::Sale(vec![line]),
            },
        ));
    }

    transactions.into_iter().map(|(_, tx)| tx).collect()
}
