use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Day/month/year, the format the cost sheet is kept in.
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Source header names for the three columns the engine needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub date: String,
    pub category: String,
    pub amount: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            date: "date".to_string(),
            category: "category".to_string(),
            amount: "amount".to_string(),
        }
    }
}

/// Where the cost sheet lives and how to read it.
///
/// `path` is either a CSV file or a directory holding one `<sheet>.csv` per
/// workbook sheet; `sheet` selects among the latter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    pub path: PathBuf,
    pub sheet: Option<String>,
    pub columns: ColumnMap,
    pub date_format: String,
}

impl SourceSpec {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sheet: None,
            columns: ColumnMap::default(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    pub fn with_columns(mut self, columns: ColumnMap) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_date_format(mut self, fmt: impl Into<String>) -> Self {
        self.date_format = fmt.into();
        self
    }
}
