//! `wecare customer`: the customer registry.
//!
//! Sales to a name that matches a registered customer are linked to that
//! customer in the SQLite purchases table. Registering is optional; walk-in
//! sales work the same either way.

use serde::Serialize;
use std::io::{BufRead, Write};
use tracing::info;
use wecare_core::{Customer, NewCustomer};

use crate::cli::CustomerAddArgs;
use crate::error::AppResult;
use crate::prompt::Prompter;
use crate::Session;

/// Customer as printed by `customer list --json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    pub customer_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl From<Customer> for CustomerDto {
    fn from(c: Customer) -> Self {
        CustomerDto {
            customer_id: c.customer_id,
            name: c.name,
            email: c.email,
            phone: c.phone,
            address: c.address,
        }
    }
}

/// Registers one customer. Returns `None` when the prompt was abandoned.
pub async fn add<R: BufRead, W: Write>(
    session: &Session,
    prompter: &mut Prompter<R, W>,
    args: &CustomerAddArgs,
) -> AppResult<Option<Customer>> {
    let details = match &args.name {
        Some(name) => NewCustomer {
            name: name.clone(),
            email: args.email.clone().unwrap_or_default(),
            phone: args.phone.clone().unwrap_or_default(),
            address: args.address.clone().unwrap_or_default(),
        },
        None => {
            let Some(name) = prompter.ask_required("Customer name")? else {
                writeln!(prompter.output(), "Customer not added.")?;
                return Ok(None);
            };
            let mut details = NewCustomer::new(name);
            for (label, field) in [
                ("Email", &mut details.email),
                ("Phone", &mut details.phone),
                ("Address", &mut details.address),
            ] {
                *field = prompter.ask(label)?.unwrap_or_default();
            }
            details
        }
    };

    let customer = session.storage.add_customer(details).await?;
    info!(customer_id = %customer.customer_id, "Customer added");
    writeln!(
        prompter.output(),
        "Customer {} added successfully (id {}).",
        customer.name,
        customer.customer_id
    )?;
    Ok(Some(customer))
}

pub async fn list<W: Write>(session: &Session, out: &mut W, json: bool) -> AppResult<()> {
    let customers = session.storage.list_customers().await?;

    if json {
        let dtos: Vec<CustomerDto> = customers.into_iter().map(CustomerDto::from).collect();
        serde_json::to_writer_pretty(&mut *out, &dtos)?;
        writeln!(out)?;
        return Ok(());
    }

    if customers.is_empty() {
        writeln!(out, "No customers registered.")?;
        return Ok(());
    }
    writeln!(out, "Registered Customers:")?;
    for c in &customers {
        let contact: Vec<&str> = [c.phone.as_str(), c.email.as_str(), c.address.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();
        if contact.is_empty() {
            writeln!(out, "{}", c.name)?;
        } else {
            writeln!(out, "{} - {}", c.name, contact.join(" - "))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SellArgs;
    use crate::commands::{fixtures, sale};
    use crate::error::ErrorCode;
    use crate::Session;
    use tempfile::tempdir;
    use wecare_db::BackendKind;

    #[tokio::test]
    async fn test_interactive_add_then_list() {
        let dir = tempdir().unwrap();
        let session = fixtures::session(&dir).await;
        let mut prompter = fixtures::prompter("Asha Rao\nasha@example.com\n98450 12345\n\n");

        let customer = add(&session, &mut prompter, &CustomerAddArgs::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(customer.email, "asha@example.com");
        assert_eq!(customer.address, "");
        assert!(fixtures::shown(&mut prompter).contains("Customer Asha Rao added successfully"));

        let mut out = Vec::new();
        list(&session, &mut out, false).await.unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Registered Customers:\nAsha Rao - 98450 12345 - asha@example.com\n"
        );
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let dir = tempdir().unwrap();
        let session = fixtures::session(&dir).await;
        let args = CustomerAddArgs {
            name: Some("  ".into()),
            ..CustomerAddArgs::default()
        };

        let err = add(&session, &mut fixtures::prompter(""), &args).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(session.storage.list_customers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sqlite_sale_links_registered_customer() {
        let dir = tempdir().unwrap();
        let session = Session::open(fixtures::config(&dir, BackendKind::Sqlite)).await.unwrap();
        let args = CustomerAddArgs {
            name: Some("Asha Rao".into()),
            phone: Some("98450 12345".into()),
            ..CustomerAddArgs::default()
        };
        let customer = add(&session, &mut fixtures::prompter(""), &args).await.unwrap().unwrap();

        let sale_args = SellArgs {
            customer: Some("Asha Rao".into()),
            items: vec!["P002:1".into()],
            ..SellArgs::default()
        };
        let now = chrono::NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let receipt = sale::sell(&session, &mut fixtures::prompter(""), &sale_args, now)
            .await
            .unwrap()
            .unwrap();

        let wecare_db::Storage::Sqlite { db, .. } = &session.storage else {
            panic!("expected the SQLite backend");
        };
        let rows = db.purchases().list_for_transaction(receipt.transaction_id).await.unwrap();
        assert_eq!(rows[0].customer_id.as_deref(), Some(customer.customer_id.as_str()));

        let mut out = Vec::new();
        list(&session, &mut out, true).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["customerId"], customer.customer_id.as_str());
    }
}
