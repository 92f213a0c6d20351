use crate::types::Dataset;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Columns every price history source must provide. Header names are matched
/// exactly after trimming surrounding whitespace; a `ticker` column may be
/// present but is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredColumn {
    Date,
    Open,
    High,
    Low,
    Close,
    Volume,
    Name,
}

impl RequiredColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Open => "Open",
            Self::High => "High",
            Self::Low => "Low",
            Self::Close => "Close",
            Self::Volume => "Volume",
            Self::Name => "name",
        }
    }

    pub fn all() -> Vec<Self> {
        vec![
            Self::Date,
            Self::Open,
            Self::High,
            Self::Low,
            Self::Close,
            Self::Volume,
            Self::Name,
        ]
    }

    /// The columns whose values must be numeric.
    pub fn numeric() -> Vec<Self> {
        vec![Self::Open, Self::High, Self::Low, Self::Close, Self::Volume]
    }
}

/// Metadata about a loaded dataset, consumed by the presenter's controls and
/// the process log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub source: String,
    pub num_rows: usize,
    pub assets: Vec<String>,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

impl DatasetMetadata {
    pub fn describe<P: AsRef<Path>>(source: P, dataset: &Dataset) -> Self {
        Self {
            source: source.as_ref().to_string_lossy().to_string(),
            num_rows: dataset.len(),
            assets: dataset.names(),
            date_range: dataset.date_range(),
        }
    }
}
