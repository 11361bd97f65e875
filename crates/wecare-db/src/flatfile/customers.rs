//! `customers.txt`: the flat-file customer registry.
//!
//! One customer per line, `customer_id, name, email, phone, address`, in
//! registration order. A missing file means no customers yet.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;
use wecare_core::{Customer, NewCustomer};

use crate::error::{DbError, DbResult};

const FIELD_COUNT: usize = 5;

#[derive(Debug, Clone)]
pub struct CustomerFile {
    path: PathBuf,
}

impl CustomerFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CustomerFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every registered customer, oldest first.
    pub async fn load_all(&self) -> DbResult<Vec<Customer>> {
        let text = match fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        text.lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                decode_line(line).map_err(|reason| DbError::parse(&self.path, index + 1, reason))
            })
            .collect()
    }

    /// Validates `details`, gives them a fresh id and appends the record.
    pub async fn append(&self, details: NewCustomer) -> DbResult<Customer> {
        let customer = details.into_customer(Uuid::new_v4().to_string())?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(format!("{}\n", encode_line(&customer)).as_bytes())
            .await?;
        file.flush().await?;

        debug!(customer_id = %customer.customer_id, "Customer appended");
        Ok(customer)
    }
}

fn encode_line(customer: &Customer) -> String {
    format!(
        "{}, {}, {}, {}, {}",
        customer.customer_id, customer.name, customer.email, customer.phone, customer.address
    )
}

fn decode_line(line: &str) -> Result<Customer, String> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != FIELD_COUNT {
        return Err(format!("expected {} fields, found {}", FIELD_COUNT, fields.len()));
    }
    if fields[0].is_empty() || fields[1].is_empty() {
        return Err("customer id and name are required".to_string());
    }

    Ok(Customer {
        customer_id: fields[0].to_string(),
        name: fields[1].to_string(),
        email: fields[2].to_string(),
        phone: fields[3].to_string(),
        address: fields[4].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let file = CustomerFile::new(dir.path().join("customers.txt"));
        assert!(file.load_all().await.unwrap().is_empty());

        let asha = file
            .append(NewCustomer::new("Asha Rao").email("asha@example.com"))
            .await
            .unwrap();
        file.append(NewCustomer::new("Ravi").address("MG Road")).await.unwrap();

        let all = file.load_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], asha);
        assert_eq!(all[1].address, "MG Road");
        assert_eq!(all[1].phone, "");
    }

    #[tokio::test]
    async fn test_rejected_customer_leaves_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let file = CustomerFile::new(dir.path().join("customers.txt"));

        let err = file.append(NewCustomer::new("Asha").address("12, MG Road")).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
        assert!(!file.path().exists());
    }

    #[test]
    fn test_decode_line_rejects_short_records() {
        assert!(decode_line("c-1, Asha").unwrap_err().contains("expected 5 fields"));
        assert!(decode_line(", Asha, , , ").is_err());
    }
}
