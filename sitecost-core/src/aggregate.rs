//! Filter-and-aggregate engine: records + filter -> per-category totals.
//!
//! The engine is a pure function of its inputs. It never fails: an empty
//! selection produces the empty-state series, not an error, and a total that
//! would leave the `Decimal` range is pinned at `Decimal::MAX`/`MIN`.

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::filter::FilterCriteria;
use crate::record::RecordStore;

pub const TITLE_BY_CATEGORY: &str = "Total cost by category";
pub const TITLE_EMPTY: &str = "No data for the selected filters";

/// Order of the output entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryOrder {
    /// Order in which each category first shows up in the filtered rows.
    #[default]
    FirstSeen,
    /// Byte-wise ascending category name.
    Alphabetical,
}

/// Summed amount for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
    /// Number of records that contributed.
    pub count: usize,
    /// The true sum left the `Decimal` range; `total` is pinned at the bound.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub saturated: bool,
}

impl CategoryTotal {
    fn new(category: &str) -> Self {
        Self {
            category: category.to_string(),
            total: Decimal::ZERO,
            count: 0,
            saturated: false,
        }
    }

    fn add(&mut self, amount: Decimal) {
        self.count += 1;
        match self.total.checked_add(amount) {
            Some(t) => self.total = t,
            None => {
                self.total = self.total.saturating_add(amount);
                self.saturated = true;
            }
        }
    }
}

/// Chart-ready output of the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateSeries {
    pub title: String,
    pub entries: Vec<CategoryTotal>,
}

impl AggregateSeries {
    pub fn empty() -> Self {
        Self {
            title: TITLE_EMPTY.to_string(),
            entries: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn grand_total(&self) -> Decimal {
        self.entries
            .iter()
            .fold(Decimal::ZERO, |acc, e| acc.saturating_add(e.total))
    }
}

/// Title for a non-empty result.
pub fn series_title(filter: &FilterCriteria) -> String {
    match &filter.category {
        Some(c) => format!("Total cost for {c}"),
        None => TITLE_BY_CATEGORY.to_string(),
    }
}

/// Aggregate with first-appearance ordering.
pub fn aggregate(store: &RecordStore, filter: &FilterCriteria) -> AggregateSeries {
    aggregate_with(store, filter, CategoryOrder::FirstSeen)
}

pub fn aggregate_with(
    store: &RecordStore,
    filter: &FilterCriteria,
    order: CategoryOrder,
) -> AggregateSeries {
    let mut groups: IndexMap<&str, CategoryTotal> = IndexMap::new();
    for rec in store.records().iter().filter(|r| filter.matches(r)) {
        groups
            .entry(rec.category.as_str())
            .or_insert_with(|| CategoryTotal::new(&rec.category))
            .add(rec.amount);
    }
    let mut entries: Vec<CategoryTotal> = groups.into_values().collect();

    for e in entries.iter().filter(|e| e.saturated) {
        warn!(
            category = %e.category,
            total = %e.total,
            "category total out of range; pinned at the limit"
        );
    }

    trace!(
        records = store.len(),
        groups = entries.len(),
        category = ?filter.category,
        "aggregated cost records"
    );

    if entries.is_empty() {
        return AggregateSeries::empty();
    }

    if order == CategoryOrder::Alphabetical {
        entries.sort_by(|a, b| a.category.cmp(&b.category));
    }

    AggregateSeries {
        title: series_title(filter),
        entries,
    }
}
