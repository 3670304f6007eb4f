use std::path::PathBuf;
use thiserror::Error;

/// Why a source could not be turned into a store.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("source not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("{} is a workbook directory; a sheet name is required", .0.display())]
    SheetRequired(PathBuf),

    #[error("sheet '{sheet}' not found in {}", .path.display())]
    SheetNotFound { sheet: String, path: PathBuf },

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("reading source: {0}")]
    Io(#[from] std::io::Error),

    #[error("amount pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}
