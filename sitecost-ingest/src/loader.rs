//! CSV cost-sheet loader.
//!
//! Expected layout: one header row, then one row per expense. Only the
//! date, category and amount columns are interpreted; every other column
//! is carried through as text for the table view.
//!
//!   Data,Categoria,Valor (R$),Observação
//!   10/01/2024,Materiais,500.00,cimento
//!
//! Rows that cannot be decoded, or that cannot satisfy the store invariants
//! (valid date, non-blank category, parseable amount), are skipped and
//! reported, never fatal. Only an unreadable header or an I/O failure aborts
//! the load.

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use serde::Serialize;
use sitecost_core::{Column, ColumnKind, CostRecord, RecordStore};
use std::io;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

use crate::amount::AmountParser;
use crate::error::LoadError;
use crate::types::SourceSpec;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "value", rename_all = "kebab-case")]
pub enum SkipReason {
    BadDate(String),
    BadAmount(String),
    BlankCategory,
    /// The row itself could not be decoded (e.g. bytes that are not UTF-8).
    Unreadable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// 1-based line in the source, header included.
    pub line: u64,
    pub reason: SkipReason,
}

/// A loaded store plus the rows that were left out of it.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub store: RecordStore,
    pub skipped: Vec<SkippedRow>,
}

/// Load the cost sheet, falling back to an empty store on any failure so the
/// dashboard can still start.
pub fn load_store(spec: &SourceSpec) -> RecordStore {
    match try_load_store(spec) {
        Ok(report) => report.store,
        Err(err) => {
            error!(
                error = %err,
                path = %spec.path.display(),
                "could not load cost sheet; continuing with no data"
            );
            RecordStore::empty()
        }
    }
}

/// Strict variant of [`load_store`].
pub fn try_load_store(spec: &SourceSpec) -> Result<LoadReport, LoadError> {
    let path = resolve_source_path(spec)?;
    let file = std::fs::File::open(&path)?;
    let report = read_store(file, spec)?;
    info!(
        path = %path.display(),
        records = report.store.len(),
        skipped = report.skipped.len(),
        "loaded cost sheet"
    );
    Ok(report)
}

/// Pick the CSV file to read: the path itself, or `<dir>/<sheet>.csv` for a
/// workbook exported as a directory of sheets.
pub fn resolve_source_path(spec: &SourceSpec) -> Result<PathBuf, LoadError> {
    let path = &spec.path;
    if !path.exists() {
        return Err(LoadError::NotFound(path.clone()));
    }

    if path.is_dir() {
        let sheet = spec
            .sheet
            .as_deref()
            .ok_or_else(|| LoadError::SheetRequired(path.clone()))?;
        let candidate = path.join(format!("{sheet}.csv"));
        if !candidate.is_file() {
            return Err(LoadError::SheetNotFound {
                sheet: sheet.to_string(),
                path: path.clone(),
            });
        }
        return Ok(candidate);
    }

    if let Some(sheet) = &spec.sheet {
        debug!(sheet = %sheet, path = %path.display(), "single CSV file; sheet selector ignored");
    }
    Ok(path.clone())
}

/// Parse CSV text from any reader into a store.
pub fn read_store<R: io::Read>(reader: R, spec: &SourceSpec) -> Result<LoadReport, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let (columns, layout) = map_columns(&headers, spec)?;
    let amounts = AmountParser::new()?;

    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                let line = err.position().map(|p| p.line()).unwrap_or(i as u64 + 2);
                warn!(line, error = %err, "skipping unreadable cost row");
                skipped.push(SkippedRow {
                    line,
                    reason: SkipReason::Unreadable(err.to_string()),
                });
                continue;
            }
        };
        let line = row.position().map(|p| p.line()).unwrap_or(i as u64 + 2);

        if row.iter().all(|c| c.is_empty()) {
            continue;
        }

        match build_record(&row, &layout, spec, &amounts) {
            Ok(rec) => records.push(rec),
            Err(reason) => {
                warn!(line, reason = ?reason, "skipping cost row");
                skipped.push(SkippedRow { line, reason });
            }
        }
    }

    Ok(LoadReport {
        store: RecordStore::new(columns, records),
        skipped,
    })
}

/// Source positions of the core columns and of each passthrough column.
struct Layout {
    date: usize,
    category: usize,
    amount: usize,
    passthrough: Vec<usize>,
}

fn map_columns(
    headers: &StringRecord,
    spec: &SourceSpec,
) -> Result<(Vec<Column>, Layout), LoadError> {
    let find = |name: &str| -> Result<usize, LoadError> {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
    };

    let date = find(spec.columns.date.as_str())?;
    let category = find(spec.columns.category.as_str())?;
    let amount = find(spec.columns.amount.as_str())?;

    let mut columns = Vec::with_capacity(headers.len());
    let mut passthrough = Vec::new();
    for (i, h) in headers.iter().enumerate() {
        let kind = if i == date {
            ColumnKind::Date
        } else if i == category {
            ColumnKind::Category
        } else if i == amount {
            ColumnKind::Amount
        } else {
            passthrough.push(i);
            ColumnKind::Passthrough(passthrough.len() - 1)
        };
        columns.push(Column::new(h, kind));
    }

    Ok((
        columns,
        Layout {
            date,
            category,
            amount,
            passthrough,
        },
    ))
}

fn build_record(
    row: &StringRecord,
    layout: &Layout,
    spec: &SourceSpec,
    amounts: &AmountParser,
) -> Result<CostRecord, SkipReason> {
    let cell = |i: usize| row.get(i).unwrap_or("");

    let date_raw = cell(layout.date);
    let date = parse_date(date_raw, &spec.date_format)
        .ok_or_else(|| SkipReason::BadDate(date_raw.to_string()))?;

    let category = cell(layout.category);
    if category.is_empty() {
        return Err(SkipReason::BlankCategory);
    }

    let amount_raw = cell(layout.amount);
    let amount = amounts
        .parse(amount_raw)
        .map_err(|_| SkipReason::BadAmount(amount_raw.to_string()))?;

    let extra = layout
        .passthrough
        .iter()
        .map(|&i| cell(i).to_string())
        .collect();

    Ok(CostRecord::new(date, category, amount).with_extra(extra))
}

/// The configured format first; then ISO dates, which is how spreadsheet
/// tools export cells that were typed as real dates.
fn parse_date(s: &str, format: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, format)
        .ok()
        .or_else(|| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}
