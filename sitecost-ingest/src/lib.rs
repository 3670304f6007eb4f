//! sitecost-ingest: loads the cost sheet (CSV export of the workbook) into a
//! `RecordStore`, failing open to an empty store.

pub mod amount;
pub mod error;
pub mod loader;
pub mod types;

pub use amount::parse_amount;
pub use error::LoadError;
pub use loader::{LoadReport, SkipReason, SkippedRow, load_store, try_load_store};
pub use types::{ColumnMap, DEFAULT_DATE_FORMAT, SourceSpec};
