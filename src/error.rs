use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Resource not found: {path}")]
    ResourceNotFound { path: String },

    #[error("Missing required columns: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("Unparseable date at row {row}: {value:?}")]
    DateParse { row: usize, value: String },

    #[error("Data loading error: {0}")]
    DataLoading(String),

    #[error("No rows match the current filter")]
    EmptyFilter,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
