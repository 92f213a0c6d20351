use super::traits::ConfigSection;
use crate::error::DashboardError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings for the dashboard process: where the price history lives, which
/// column holds the timestamp, and how many assets are pre-selected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub date_column: String,
    pub selection_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("crypto_prices.csv"),
            date_column: "Date".to_string(),
            selection_limit: 10,
        }
    }
}

impl ConfigSection for DashboardConfig {
    fn section_name() -> &'static str {
        "dashboard"
    }

    fn validate(&self) -> Result<(), DashboardError> {
        if self.date_column.trim().is_empty() {
            return Err(DashboardError::Configuration(
                "Date column name must not be empty".to_string(),
            ));
        }
        if self.selection_limit == 0 {
            return Err(DashboardError::Configuration(
                "Selection limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
