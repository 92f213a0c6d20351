//! Presenter boundary: one synchronous render per interaction. The external
//! presenter consumes the serialized [`DashboardView`]; nothing here is
//! reactive or stateful.

use crate::analytics::{daily_volume, summarize, DailyVolume, FilterCriteria, FilteredView, Kpis, SummaryRow};
use crate::error::{DashboardError, Result};
use crate::types::Dataset;
use chrono::{NaiveDate, NaiveDateTime};
use log::warn;
use serde::{Deserialize, Serialize};

/// KPI values with the display form of the percent change (two decimals).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiView {
    pub total_volume: u64,
    pub avg_close: f64,
    pub pct_change: f64,
    pub pct_change_display: String,
}

impl From<Kpis> for KpiView {
    fn from(kpis: Kpis) -> Self {
        Self {
            total_volume: kpis.total_volume,
            avg_close: kpis.avg_close,
            pct_change: kpis.pct_change,
            pct_change_display: format!("{:.2}%", kpis.pct_change),
        }
    }
}

/// One point of the close-over-time line chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: NaiveDateTime,
    pub close: f64,
    pub name: String,
}

/// What the presenter needs to draw its filter widgets: the selectable names,
/// the selectable date bounds, and the current selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Controls {
    pub asset_options: Vec<String>,
    pub selected_assets: Vec<String>,
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Everything the presenter renders for one interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub kpis: KpiView,
    pub price_chart: Vec<PricePoint>,
    pub volume_chart: Vec<DailyVolume>,
    pub summary: Vec<SummaryRow>,
    pub controls: Controls,
}

/// Run Filter -> Aggregator for one interaction.
///
/// An empty filter result aborts the render with `EmptyFilter`; the caller is
/// expected to keep its previous view and surface the warning.
pub fn render(dataset: &Dataset, criteria: &FilterCriteria) -> Result<DashboardView> {
    let view = FilteredView::select(dataset, criteria);
    if view.is_empty() {
        warn!(
            "No rows for selection of {} assets in [{}, {}]",
            criteria.names.len(),
            criteria.start,
            criteria.end
        );
        return Err(DashboardError::EmptyFilter);
    }

    let kpis = Kpis::compute(&view)?;
    let volume_chart = daily_volume(&view)?;
    let summary = summarize(&view)?;

    let price_chart = view
        .rows()
        .iter()
        .map(|r| PricePoint {
            timestamp: r.timestamp,
            close: r.close,
            name: r.name.clone(),
        })
        .collect();

    let (min_date, max_date) = dataset
        .date_range()
        .unwrap_or((criteria.start, criteria.end));
    let controls = Controls {
        asset_options: dataset.names(),
        selected_assets: criteria.names.iter().cloned().collect(),
        min_date,
        max_date,
        start: criteria.start,
        end: criteria.end,
    };

    Ok(DashboardView {
        kpis: KpiView::from(kpis),
        price_chart,
        volume_chart,
        summary,
        controls,
    })
}
