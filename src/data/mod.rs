pub mod cache;
pub mod connectors;

pub use cache::DatasetCache;
pub use connectors::{CsvConnector, DatasetMetadata, RequiredColumn, SchemaValidator};
