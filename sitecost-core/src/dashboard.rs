//! Dashboard wiring: the filter-change handler and full-page snapshots.
//!
//! A `Dashboard` borrows the store; it holds no state that changes between
//! calls, so one instance can answer any number of filter events.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregate::{AggregateSeries, CategoryOrder, aggregate_with};
use crate::chart::{ChartFigure, ChartStyle};
use crate::filter::FilterCriteria;
use crate::record::RecordStore;
use crate::table::{DEFAULT_PAGE_SIZE, TablePage, paginate};

pub const DEFAULT_HEADING: &str = "Twin House - Cost Control";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSettings {
    pub heading: String,
    pub page_size: usize,
    pub chart: ChartStyle,
    pub order: CategoryOrder,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            heading: DEFAULT_HEADING.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            chart: ChartStyle::default(),
            order: CategoryOrder::FirstSeen,
        }
    }
}

/// Everything needed to draw the page once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub heading: String,
    /// Drop-down options, first-appearance order.
    pub categories: Vec<String>,
    pub filter: FilterCriteria,
    pub series: AggregateSeries,
    pub chart: ChartFigure,
    pub table: TablePage,
    pub grand_total: Decimal,
    /// Set when the store holds no records at all (e.g. the source failed to load).
    pub no_data: bool,
}

pub struct Dashboard<'a> {
    store: &'a RecordStore,
    settings: DashboardSettings,
}

impl<'a> Dashboard<'a> {
    pub fn new(store: &'a RecordStore, settings: DashboardSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    pub fn series(&self, filter: &FilterCriteria) -> AggregateSeries {
        aggregate_with(self.store, filter, self.settings.order)
    }

    /// Recompute the chart for a new filter selection.
    pub fn on_filter_change(&self, filter: &FilterCriteria) -> ChartFigure {
        debug!(
            category = ?filter.category,
            range = ?filter.range,
            "filter changed"
        );
        ChartFigure::from_series(&self.series(filter), &self.settings.chart)
    }

    pub fn table_page(&self, page: usize) -> TablePage {
        paginate(self.store, page, self.settings.page_size)
    }

    pub fn snapshot(&self, filter: &FilterCriteria, page: usize) -> DashboardView {
        let series = self.series(filter);
        let chart = ChartFigure::from_series(&series, &self.settings.chart);
        DashboardView {
            heading: self.settings.heading.clone(),
            categories: self.store.categories().into_iter().map(String::from).collect(),
            filter: filter.clone(),
            grand_total: series.grand_total(),
            series,
            chart,
            table: self.table_page(page),
            no_data: self.store.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::TITLE_EMPTY;
    use crate::record::CostRecord;
    use chrono::NaiveDate;

    fn store() -> RecordStore {
        let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day).unwrap();
        RecordStore::from_records(vec![
            CostRecord::new(d(1, 10), "Materials", Decimal::new(50000, 2)),
            CostRecord::new(d(1, 15), "Labor", Decimal::new(30000, 2)),
            CostRecord::new(d(2, 1), "Materials", Decimal::new(20000, 2)),
        ])
    }

    #[test]
    fn test_on_filter_change_returns_figure() {
        let s = store();
        let dash = Dashboard::new(&s, DashboardSettings::default());
        let fig = dash.on_filter_change(&FilterCriteria::all().with_category("Labor"));
        assert_eq!(fig.layout.title, "Total cost for Labor");
        assert_eq!(fig.data[0].x, vec!["Labor"]);
    }

    #[test]
    fn test_snapshot_of_loaded_store() {
        let s = store();
        let dash = Dashboard::new(&s, DashboardSettings::default());
        let view = dash.snapshot(&FilterCriteria::all(), 0);
        assert_eq!(view.heading, DEFAULT_HEADING);
        assert_eq!(view.categories, vec!["Materials", "Labor"]);
        assert_eq!(view.grand_total, Decimal::new(100000, 2));
        assert_eq!(view.table.rows.len(), 3);
        assert!(!view.no_data);
    }

    #[test]
    fn test_snapshot_of_empty_store_flags_no_data() {
        let s = RecordStore::empty();
        let dash = Dashboard::new(&s, DashboardSettings::default());
        let view = dash.snapshot(&FilterCriteria::all(), 0);
        assert!(view.no_data);
        assert!(view.categories.is_empty());
        assert_eq!(view.chart.layout.title, TITLE_EMPTY);
        assert_eq!(view.grand_total, Decimal::ZERO);
    }

    #[test]
    fn test_settings_order_is_used() {
        let s = store();
        let settings = DashboardSettings {
            order: CategoryOrder::Alphabetical,
            ..DashboardSettings::default()
        };
        let dash = Dashboard::new(&s, settings);
        let fig = dash.on_filter_change(&FilterCriteria::all());
        assert_eq!(fig.data[0].x, vec!["Labor", "Materials"]);
    }
}
