use super::validator::SchemaValidator;
use crate::error::{DashboardError, Result};
use crate::types::{Dataset, PriceRecord};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use log::info;
use polars::prelude::*;
use std::path::Path;

/// Accepted textual timestamp layouts, tried in order after RFC 3339.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

pub struct CsvConnector;

impl CsvConnector {
    /// Load a CSV price history into a typed, timestamp-sorted dataset.
    ///
    /// `date_field` names the column holding the timestamps. Any schema
    /// violation, unparseable date, null required field, negative volume or
    /// empty asset name fails the whole load.
    pub fn load<P: AsRef<Path>>(source: P, date_field: &str) -> Result<Dataset> {
        let path = source.as_ref();
        if !path.exists() {
            return Err(DashboardError::ResourceNotFound {
                path: path.display().to_string(),
            });
        }

        let df = CsvReadOptions::default()
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()
            .map_err(|e| {
                DashboardError::DataLoading(format!("Failed to read {}: {}", path.display(), e))
            })?;

        let df = Self::trim_headers(df)?;
        SchemaValidator::validate_columns(&df)?;
        SchemaValidator::validate_numeric(&df)?;

        if !df.get_column_names().iter().any(|c| c.as_str() == date_field) {
            return Err(DashboardError::Schema {
                missing: vec![date_field.to_string()],
            });
        }

        let records = Self::extract_records(&df, date_field)?;
        info!("Loaded {} rows from {}", records.len(), path.display());

        Ok(Dataset::new(records))
    }

    /// Strip surrounding whitespace from column headers.
    fn trim_headers(mut df: DataFrame) -> Result<DataFrame> {
        let renames: Vec<(String, String)> = df
            .get_column_names()
            .iter()
            .filter(|c| c.as_str() != c.as_str().trim())
            .map(|c| (c.as_str().to_string(), c.as_str().trim().to_string()))
            .collect();

        for (from, to) in renames {
            df.rename(&from, to.into()).map_err(|e| {
                DashboardError::DataLoading(format!("Failed to rename column: {}", e))
            })?;
        }
        Ok(df)
    }

    /// Materialize the frame into typed records.
    fn extract_records(df: &DataFrame, date_field: &str) -> Result<Vec<PriceRecord>> {
        let date_col = df.column(date_field)?.cast(&DataType::String)?;
        let dates = date_col.str()?;
        let name_col = df.column("name")?.cast(&DataType::String)?;
        let names = name_col.str()?;

        let open_col = df.column("Open")?.cast(&DataType::Float64)?;
        let opens = open_col.f64()?;
        let high_col = df.column("High")?.cast(&DataType::Float64)?;
        let highs = high_col.f64()?;
        let low_col = df.column("Low")?.cast(&DataType::Float64)?;
        let lows = low_col.f64()?;
        let close_col = df.column("Close")?.cast(&DataType::Float64)?;
        let closes = close_col.f64()?;
        let volume_col = df.column("Volume")?.cast(&DataType::Float64)?;
        let volumes = volume_col.f64()?;

        let mut records = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let raw_date = dates.get(i).ok_or_else(|| DashboardError::DateParse {
                row: i,
                value: "<null>".to_string(),
            })?;
            let timestamp =
                Self::parse_timestamp(raw_date).ok_or_else(|| DashboardError::DateParse {
                    row: i,
                    value: raw_date.to_string(),
                })?;

            let name = names
                .get(i)
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .ok_or_else(|| {
                    DashboardError::DataLoading(format!("Row {}: empty asset name", i))
                })?;

            let open = opens.get(i).ok_or_else(|| Self::null_field(i, "Open"))?;
            let high = highs.get(i).ok_or_else(|| Self::null_field(i, "High"))?;
            let low = lows.get(i).ok_or_else(|| Self::null_field(i, "Low"))?;
            let close = closes.get(i).ok_or_else(|| Self::null_field(i, "Close"))?;
            let volume = volumes.get(i).ok_or_else(|| Self::null_field(i, "Volume"))?;

            if volume < 0.0 {
                return Err(DashboardError::DataLoading(format!(
                    "Row {}: negative volume {}",
                    i, volume
                )));
            }

            records.push(PriceRecord {
                timestamp,
                date: timestamp.date(),
                open,
                high,
                low,
                close,
                volume,
                name: name.to_string(),
            });
        }

        Ok(records)
    }

    /// Parse a timestamp value. Offset-carrying values are converted to UTC
    /// before the offset is dropped; date-only values get a midnight time.
    fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_utc());
        }
        for fmt in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
                return Some(dt);
            }
        }
        for fmt in DATE_FORMATS {
            if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
                return Some(d.and_time(NaiveTime::MIN));
            }
        }
        None
    }

    fn null_field(row: usize, column: &str) -> DashboardError {
        DashboardError::DataLoading(format!(
            "Row {}: null value in required column {}",
            row, column
        ))
    }
}
