pub mod aggregate;
pub mod filter;

pub use aggregate::{daily_mean_close, daily_volume, summarize, DailyClose, DailyVolume, Kpis, SummaryRow};
pub use filter::{FilterCriteria, FilteredView};
