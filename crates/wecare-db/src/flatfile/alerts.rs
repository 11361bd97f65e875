//! Daily low-stock report files.

use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::error::DbResult;

/// `stock_alerts/alert_YYYYMMDD.txt`, one file per day.
#[derive(Debug, Clone)]
pub struct AlertFolder {
    dir: PathBuf,
}

impl AlertFolder {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        AlertFolder { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("alert_{}.txt", date.format("%Y%m%d")))
    }

    /// Writes the day's alert, replacing an earlier one from the same day.
    pub async fn write_alert(&self, date: NaiveDate, body: &str) -> DbResult<PathBuf> {
        fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(date);
        fs::write(&path, body).await?;
        debug!(path = %path.display(), "Stock alert written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_alert_is_overwritten_per_day() {
        let dir = tempfile::tempdir().unwrap();
        let alerts = AlertFolder::new(dir.path().join("stock_alerts"));
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        alerts.write_alert(date, "first").await.unwrap();
        let path = alerts.write_alert(date, "second").await.unwrap();

        assert!(path.ends_with("stock_alerts/alert_20240301.txt"));
        assert_eq!(fs::read_to_string(path).await.unwrap(), "second");
    }
}
