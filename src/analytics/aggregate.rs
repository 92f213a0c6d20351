//! The four aggregate queries over a filtered view. All are pure; each
//! rejects an empty view with `EmptyFilter` rather than producing NaN.

use super::filter::FilteredView;
use crate::error::{DashboardError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Headline figures for the current selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    /// Sum of volume, truncated toward zero.
    pub total_volume: u64,
    /// Mean close across all selected rows, rounded to 6 decimal places.
    pub avg_close: f64,
    /// Percent change between the first and last daily mean close.
    pub pct_change: f64,
}

impl Kpis {
    pub fn compute(view: &FilteredView) -> Result<Self> {
        if view.is_empty() {
            return Err(DashboardError::EmptyFilter);
        }

        let total_volume: f64 = view.rows().iter().map(|r| r.volume).sum();
        let close_sum: f64 = view.rows().iter().map(|r| r.close).sum();
        let avg_close = round6(close_sum / view.len() as f64);

        let daily = daily_mean_close(view)?;
        let pct_change = match (daily.first(), daily.last()) {
            (Some(first), Some(last)) => percent_change(first.mean_close, last.mean_close),
            _ => 0.0,
        };

        Ok(Self {
            total_volume: total_volume as u64,
            avg_close,
            pct_change,
        })
    }
}

/// Mean close across all selected assets on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyClose {
    pub date: NaiveDate,
    pub mean_close: f64,
}

/// Summed volume for one asset on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyVolume {
    pub date: NaiveDate,
    pub name: String,
    pub volume: f64,
}

/// One summary table row per asset in the view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub name: String,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub first_close: f64,
    pub last_close: f64,
    pub avg_close: f64,
    pub min_close: f64,
    pub max_close: f64,
    pub total_volume: f64,
    pub pct_change: f64,
}

/// Date -> mean(close), ascending by date.
pub fn daily_mean_close(view: &FilteredView) -> Result<Vec<DailyClose>> {
    if view.is_empty() {
        return Err(DashboardError::EmptyFilter);
    }

    let mut groups: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for row in view.rows() {
        let entry = groups.entry(row.date).or_insert((0.0, 0));
        entry.0 += row.close;
        entry.1 += 1;
    }

    Ok(groups
        .into_iter()
        .map(|(date, (sum, count))| DailyClose {
            date,
            mean_close: sum / count as f64,
        })
        .collect())
}

/// (date, name) -> sum(volume), ascending by date then name. Each pair
/// appears at most once.
pub fn daily_volume(view: &FilteredView) -> Result<Vec<DailyVolume>> {
    if view.is_empty() {
        return Err(DashboardError::EmptyFilter);
    }

    let mut groups: BTreeMap<(NaiveDate, String), f64> = BTreeMap::new();
    for row in view.rows() {
        *groups.entry((row.date, row.name.clone())).or_insert(0.0) += row.volume;
    }

    Ok(groups
        .into_iter()
        .map(|((date, name), volume)| DailyVolume { date, name, volume })
        .collect())
}

struct SummaryAccumulator {
    first_date: NaiveDate,
    last_date: NaiveDate,
    first_close: f64,
    last_close: f64,
    close_sum: f64,
    count: usize,
    min_close: f64,
    max_close: f64,
    total_volume: f64,
}

/// Per-asset summary rows, ordered by name ascending. "First" and "last"
/// follow the view's date ordering, not input position in an unsorted source.
pub fn summarize(view: &FilteredView) -> Result<Vec<SummaryRow>> {
    if view.is_empty() {
        return Err(DashboardError::EmptyFilter);
    }

    let mut groups: BTreeMap<String, SummaryAccumulator> = BTreeMap::new();
    for row in view.rows() {
        groups
            .entry(row.name.clone())
            .and_modify(|acc| {
                acc.last_date = row.date;
                acc.last_close = row.close;
                acc.close_sum += row.close;
                acc.count += 1;
                acc.min_close = acc.min_close.min(row.close);
                acc.max_close = acc.max_close.max(row.close);
                acc.total_volume += row.volume;
            })
            .or_insert(SummaryAccumulator {
                first_date: row.date,
                last_date: row.date,
                first_close: row.close,
                last_close: row.close,
                close_sum: row.close,
                count: 1,
                min_close: row.close,
                max_close: row.close,
                total_volume: row.volume,
            });
    }

    Ok(groups
        .into_iter()
        .map(|(name, acc)| SummaryRow {
            name,
            first_date: acc.first_date,
            last_date: acc.last_date,
            first_close: acc.first_close,
            last_close: acc.last_close,
            avg_close: acc.close_sum / acc.count as f64,
            min_close: acc.min_close,
            max_close: acc.max_close,
            total_volume: acc.total_volume,
            pct_change: percent_change(acc.first_close, acc.last_close),
        })
        .collect())
}

/// `(last - first) / first * 100`, or 0.0 when `first` is zero.
pub fn percent_change(first: f64, last: f64) -> f64 {
    if first == 0.0 {
        0.0
    } else {
        (last - first) / first * 100.0
    }
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::filter::{FilterCriteria, FilteredView};
    use crate::types::{Dataset, PriceRecord};
    use chrono::NaiveTime;

    fn record(day: u32, name: &str, close: f64, volume: f64) -> PriceRecord {
        let date = NaiveDate::from_ymd_opt(2021, 6, day).unwrap();
        PriceRecord {
            timestamp: date.and_time(NaiveTime::MIN),
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume,
            name: name.to_string(),
        }
    }

    fn select_all(dataset: &Dataset) -> FilteredView<'_> {
        let criteria = FilterCriteria::default_for(dataset, usize::MAX).unwrap();
        FilteredView::select(dataset, &criteria)
    }

    #[test]
    fn test_pct_change_from_daily_means() {
        // Daily mean closes are [10.0, 20.0] -> +100%.
        let dataset = Dataset::new(vec![
            record(1, "BTC", 5.0, 1.0),
            record(1, "ETH", 15.0, 1.0),
            record(2, "BTC", 20.0, 1.0),
        ]);
        let kpis = Kpis::compute(&select_all(&dataset)).unwrap();
        assert_eq!(kpis.pct_change, 100.0);
    }

    #[test]
    fn test_pct_change_zero_guard() {
        let dataset = Dataset::new(vec![
            record(1, "BTC", 0.0, 1.0),
            record(2, "BTC", 20.0, 1.0),
        ]);
        let kpis = Kpis::compute(&select_all(&dataset)).unwrap();
        assert_eq!(kpis.pct_change, 0.0);
    }

    #[test]
    fn test_kpi_totals_and_rounding() {
        let dataset = Dataset::new(vec![
            record(1, "BTC", 1.0000004, 10.9),
            record(2, "BTC", 2.0000004, 20.9),
        ]);
        let kpis = Kpis::compute(&select_all(&dataset)).unwrap();

        // 31.8 truncates toward zero.
        assert_eq!(kpis.total_volume, 31);
        // Mean 1.5000004 rounds at the sixth decimal place.
        assert_eq!(kpis.avg_close, 1.5);
    }

    #[test]
    fn test_daily_mean_close_series() {
        let dataset = Dataset::new(vec![
            record(2, "BTC", 30.0, 1.0),
            record(1, "BTC", 10.0, 1.0),
            record(1, "ETH", 20.0, 1.0),
        ]);
        let series = daily_mean_close(&select_all(&dataset)).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, NaiveDate::from_ymd_opt(2021, 6, 1).unwrap());
        assert_eq!(series[0].mean_close, 15.0);
        assert_eq!(series[1].mean_close, 30.0);
    }

    #[test]
    fn test_daily_volume_grouping_unique_pairs() {
        let dataset = Dataset::new(vec![
            record(1, "BTC", 1.0, 5.0),
            record(1, "BTC", 1.0, 7.0),
            record(1, "ETH", 1.0, 3.0),
            record(2, "BTC", 1.0, 11.0),
        ]);
        let series = daily_volume(&select_all(&dataset)).unwrap();

        // One entry per (date, name), date ascending then name ascending.
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].name, "BTC");
        assert_eq!(series[0].volume, 12.0);
        assert_eq!(series[1].name, "ETH");
        assert_eq!(series[1].volume, 3.0);
        assert_eq!(series[2].date, NaiveDate::from_ymd_opt(2021, 6, 2).unwrap());
        assert_eq!(series[2].volume, 11.0);
    }

    #[test]
    fn test_summary_aggregation() {
        let dataset = Dataset::new(vec![
            record(1, "BTC", 100.0, 5.0),
            record(2, "BTC", 150.0, 7.0),
        ]);
        let summary = summarize(&select_all(&dataset)).unwrap();

        assert_eq!(summary.len(), 1);
        let row = &summary[0];
        assert_eq!(row.name, "BTC");
        assert_eq!(row.first_close, 100.0);
        assert_eq!(row.last_close, 150.0);
        assert_eq!(row.avg_close, 125.0);
        assert_eq!(row.min_close, 100.0);
        assert_eq!(row.max_close, 150.0);
        assert_eq!(row.total_volume, 12.0);
        assert_eq!(row.pct_change, 50.0);
        assert_eq!(row.first_date, NaiveDate::from_ymd_opt(2021, 6, 1).unwrap());
        assert_eq!(row.last_date, NaiveDate::from_ymd_opt(2021, 6, 2).unwrap());
    }

    #[test]
    fn test_summary_first_last_follow_date_order() {
        // Input is deliberately unsorted; Dataset::new restores date order, so
        // "first" must be the day-1 close even though day-3 came first.
        let dataset = Dataset::new(vec![
            record(3, "BTC", 300.0, 1.0),
            record(1, "BTC", 100.0, 1.0),
            record(2, "BTC", 200.0, 1.0),
        ]);
        let summary = summarize(&select_all(&dataset)).unwrap();

        assert_eq!(summary[0].first_close, 100.0);
        assert_eq!(summary[0].last_close, 300.0);
        assert_eq!(summary[0].pct_change, 200.0);
    }

    #[test]
    fn test_summary_ordered_by_name() {
        let dataset = Dataset::new(vec![
            record(1, "ETH", 1.0, 1.0),
            record(1, "BTC", 1.0, 1.0),
            record(1, "DOGE", 1.0, 1.0),
        ]);
        let summary = summarize(&select_all(&dataset)).unwrap();

        let names: Vec<&str> = summary.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["BTC", "DOGE", "ETH"]);
    }

    #[test]
    fn test_summary_zero_guard() {
        let dataset = Dataset::new(vec![
            record(1, "BTC", 0.0, 1.0),
            record(2, "BTC", 50.0, 1.0),
        ]);
        let summary = summarize(&select_all(&dataset)).unwrap();
        assert_eq!(summary[0].pct_change, 0.0);
    }

    #[test]
    fn test_empty_view_rejected_everywhere() {
        let dataset = Dataset::new(vec![record(1, "BTC", 1.0, 1.0)]);
        let criteria = FilterCriteria::new(
            Vec::<String>::new(),
            NaiveDate::from_ymd_opt(2021, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2021, 6, 30).unwrap(),
        );
        let view = FilteredView::select(&dataset, &criteria);

        assert!(matches!(
            Kpis::compute(&view),
            Err(DashboardError::EmptyFilter)
        ));
        assert!(matches!(
            daily_mean_close(&view),
            Err(DashboardError::EmptyFilter)
        ));
        assert!(matches!(
            daily_volume(&view),
            Err(DashboardError::EmptyFilter)
        ));
        assert!(matches!(
            summarize(&view),
            Err(DashboardError::EmptyFilter)
        ));
    }
}
