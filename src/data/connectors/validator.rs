use super::types::RequiredColumn;
use crate::error::{DashboardError, Result};
use polars::prelude::*;
use std::collections::HashSet;

pub struct SchemaValidator;

impl SchemaValidator {
    /// Check that all required columns are present. Every missing column is
    /// collected so the error names the full set, sorted alphabetically.
    pub fn validate_columns(df: &DataFrame) -> Result<()> {
        let present: HashSet<&str> = df.get_column_names().iter().map(|c| c.as_str()).collect();

        let mut missing: Vec<String> = RequiredColumn::all()
            .into_iter()
            .filter(|c| !present.contains(c.as_str()))
            .map(|c| c.as_str().to_string())
            .collect();

        if !missing.is_empty() {
            missing.sort();
            return Err(DashboardError::Schema { missing });
        }
        Ok(())
    }

    /// Check that the price and volume columns carry numeric values.
    pub fn validate_numeric(df: &DataFrame) -> Result<()> {
        for required in RequiredColumn::numeric() {
            let series = df.column(required.as_str())?;
            if !matches!(
                series.dtype(),
                DataType::Float64
                    | DataType::Float32
                    | DataType::Int64
                    | DataType::Int32
                    | DataType::UInt64
                    | DataType::UInt32
            ) {
                return Err(DashboardError::DataLoading(format!(
                    "Column '{}' must be numeric, found {:?}",
                    required.as_str(),
                    series.dtype()
                )));
            }
        }
        Ok(())
    }
}
