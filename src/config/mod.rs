pub mod dashboard;
pub mod manager;
pub mod traits;

pub use dashboard::DashboardConfig;
pub use manager::{AppConfig, ConfigManager};
pub use traits::ConfigSection;
