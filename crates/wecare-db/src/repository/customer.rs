//! # Customer Repository
//!
//! The `customers` table. Purchases point at it through
//! `purchases.customer_id` when the sale was made to a registered customer.

use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;
use wecare_core::{Customer, NewCustomer};

use crate::error::DbResult;

#[derive(Debug, FromRow)]
struct CustomerRow {
    customer_id: String,
    name: String,
    email: String,
    phone: String,
    address: String,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            customer_id: row.customer_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            address: row.address,
        }
    }
}

/// Repository for registered customers.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Registers a customer under a fresh id.
    ///
    /// ## Errors
    /// - `DbError::Validation` if the details do not validate
    pub async fn insert(&self, details: NewCustomer) -> DbResult<Customer> {
        let customer = details.into_customer(Uuid::new_v4().to_string())?;

        sqlx::query(
            r#"
            INSERT INTO customers (customer_id, name, email, phone, address)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&customer.customer_id)
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.address)
        .execute(&self.pool)
        .await?;

        debug!(customer_id = %customer.customer_id, "Customer inserted");
        Ok(customer)
    }

    /// Every customer, in registration order.
    pub async fn list(&self) -> DbResult<Vec<Customer>> {
        let rows: Vec<CustomerRow> = sqlx::query_as(
            r#"
            SELECT customer_id, name, email, phone, address
            FROM customers
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Customer::from).collect())
    }
}

/// Id of the earliest registered customer called `name` (case-insensitive),
/// if any.
pub(crate) async fn find_id_by_name(conn: &mut SqliteConnection, name: &str) -> DbResult<Option<String>> {
    let id: Option<String> = sqlx::query_scalar(
        r#"
        SELECT customer_id
        FROM customers
        WHERE name = ?1 COLLATE NOCASE
        ORDER BY rowid
        LIMIT 1
        "#,
    )
    .bind(name.trim())
    .fetch_optional(&mut *conn)
    .await?;

    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_insert_and_list() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let asha = db
            .customers()
            .insert(NewCustomer::new("Asha Rao").email("asha@example.com"))
            .await
            .unwrap();
        db.customers().insert(NewCustomer::new("Ravi")).await.unwrap();

        let all = db.customers().list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], asha);
        assert_eq!(all[1].name, "Ravi");
        assert_eq!(all[1].address, "");
    }

    #[tokio::test]
    async fn test_invalid_customer_is_not_inserted() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = db.customers().insert(NewCustomer::new("  ")).await.unwrap_err();
        assert!(err.to_string().contains("customer name is required"));
        assert!(db.customers().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_id_ignores_case() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let asha = db.customers().insert(NewCustomer::new("Asha Rao")).await.unwrap();

        let mut conn = db.pool().acquire().await.unwrap();
        assert_eq!(
            find_id_by_name(&mut *conn, "asha rao").await.unwrap(),
            Some(asha.customer_id)
        );
        assert_eq!(find_id_by_name(&mut *conn, "Meena").await.unwrap(), None);
    }
}
