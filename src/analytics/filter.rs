use crate::types::{Dataset, PriceRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A user's selection: which assets and which inclusive date interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub names: BTreeSet<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FilterCriteria {
    pub fn new<I, S>(names: I, start: NaiveDate, end: NaiveDate) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            start,
            end,
        }
    }

    /// The initial selection for a freshly loaded dataset: the first `limit`
    /// names alphabetically (all of them if there are no more than `limit`),
    /// over the dataset's full date range. None if the dataset has no rows.
    pub fn default_for(dataset: &Dataset, limit: usize) -> Option<Self> {
        let (start, end) = dataset.date_range()?;
        let names: BTreeSet<String> = dataset.names().into_iter().take(limit).collect();
        Some(Self { names, start, end })
    }
}

/// The rows of a dataset matching a [`FilterCriteria`], in dataset order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    rows: Vec<&'a PriceRecord>,
}

impl<'a> FilteredView<'a> {
    /// An empty name set yields an empty view, as does `start > end`.
    pub fn select(dataset: &'a Dataset, criteria: &FilterCriteria) -> Self {
        let rows = dataset
            .records()
            .iter()
            .filter(|r| {
                criteria.names.contains(&r.name)
                    && r.date >= criteria.start
                    && r.date <= criteria.end
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[&'a PriceRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
