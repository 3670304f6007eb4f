//! sitecost-core: cost records, filter criteria and the filter-aggregate engine
//! behind the cost dashboard, plus the chart and table view models it renders.

pub mod aggregate;
pub mod chart;
pub mod dashboard;
pub mod filter;
pub mod record;
pub mod table;

pub use aggregate::{
    AggregateSeries, CategoryOrder, CategoryTotal, TITLE_BY_CATEGORY, TITLE_EMPTY, aggregate,
    aggregate_with,
};
pub use chart::{ChartFigure, ChartStyle};
pub use dashboard::{Dashboard, DashboardSettings, DashboardView};
pub use filter::{DateRange, FilterCriteria, parse_filter_date};
pub use record::{Column, ColumnKind, CostRecord, RecordStore};
pub use table::{DEFAULT_PAGE_SIZE, TablePage, paginate};
