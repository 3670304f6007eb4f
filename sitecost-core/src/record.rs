//! Cost records and the read-only store they live in.

use chrono::NaiveDate;
use indexmap::IndexSet;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Display format used for dates in tables and labels.
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// One row of the cost sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostRecord {
    pub date: NaiveDate,
    pub category: String,
    /// Reporting currency. Zero and negative values (refunds, corrections) are valid.
    pub amount: Decimal,
    /// Passthrough cells, aligned with the store's passthrough columns.
    #[serde(default)]
    pub extra: Vec<String>,
}

impl CostRecord {
    pub fn new(date: NaiveDate, category: impl Into<String>, amount: Decimal) -> Self {
        Self {
            date,
            category: category.into(),
            amount,
            extra: Vec::new(),
        }
    }

    pub fn with_extra(mut self, extra: Vec<String>) -> Self {
        self.extra = extra;
        self
    }
}

/// What a source column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Date,
    Category,
    Amount,
    /// Index into `CostRecord::extra`.
    Passthrough(usize),
}

/// A named column, in source header order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Immutable, ordered collection of every loaded record.
///
/// Built once at startup. There is no mutation API: share it by reference
/// (or behind an `Arc`) between any number of readers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordStore {
    columns: Vec<Column>,
    records: Vec<CostRecord>,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::empty()
    }
}

impl RecordStore {
    pub fn new(columns: Vec<Column>, records: Vec<CostRecord>) -> Self {
        Self { columns, records }
    }

    /// The store used when the source cannot be read: no rows, core columns only.
    pub fn empty() -> Self {
        Self::new(default_columns(), Vec::new())
    }

    /// A store with the three core columns, convenient for callers that build
    /// records in code.
    pub fn from_records(records: Vec<CostRecord>) -> Self {
        Self::new(default_columns(), records)
    }

    pub fn records(&self) -> &[CostRecord] {
        &self.records
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct categories in order of first appearance.
    pub fn categories(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|r| r.category.as_str())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    /// Exact sum of every amount in the store, pinned at `Decimal::MAX`/`MIN`.
    pub fn total(&self) -> Decimal {
        self.records
            .iter()
            .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r.amount))
    }

    /// Display text for one cell.
    pub fn cell(&self, record: &CostRecord, column: &Column) -> String {
        match column.kind {
            ColumnKind::Date => record.date.format(DISPLAY_DATE_FORMAT).to_string(),
            ColumnKind::Category => record.category.clone(),
            ColumnKind::Amount => format_amount(record.amount),
            ColumnKind::Passthrough(i) => record.extra.get(i).cloned().unwrap_or_default(),
        }
    }
}

/// Two-decimal rendering used everywhere amounts are shown to a person.
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

fn default_columns() -> Vec<Column> {
    vec![
        Column::new("date", ColumnKind::Date),
        Column::new("category", ColumnKind::Category),
        Column::new("amount", ColumnKind::Amount),
    ]
}
