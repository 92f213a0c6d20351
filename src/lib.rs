pub mod analytics;
pub mod config;
pub mod data;
pub mod error;
pub mod types;
pub mod view;

pub use error::{DashboardError, Result};
pub use types::{Dataset, PriceRecord};
