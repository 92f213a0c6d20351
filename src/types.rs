use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One row of price history for a single asset.
///
/// `timestamp` is the value parsed from the source's date column; `date` is
/// the timezone-naive calendar date derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub timestamp: NaiveDateTime,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub name: String,
}

/// An immutable price table, sorted ascending by timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    records: Vec<PriceRecord>,
}

impl Dataset {
    /// Build a dataset from unordered records. The sort is stable: rows with
    /// equal timestamps keep their input order.
    pub fn new(mut records: Vec<PriceRecord>) -> Self {
        records.sort_by_key(|r| r.timestamp);
        Self { records }
    }

    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct asset names, sorted ascending.
    pub fn names(&self) -> Vec<String> {
        let names: BTreeSet<&str> = self.records.iter().map(|r| r.name.as_str()).collect();
        names.into_iter().map(String::from).collect()
    }

    /// Earliest and latest calendar date in the table, if any rows exist.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }
}
