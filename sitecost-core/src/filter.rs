//! Filter criteria built from dashboard input.

use anyhow::{Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::record::{CostRecord, DISPLAY_DATE_FORMAT};

/// Inclusive `[start, end]` date interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// An inverted range (start after end) is allowed and matches nothing.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// What the user selected. Both range bounds travel together: there is no
/// one-sided range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub category: Option<String>,
    pub range: Option<DateRange>,
}

impl FilterCriteria {
    /// No filtering at all.
    pub fn all() -> Self {
        Self::default()
    }

    /// Sanitize raw widget values.
    ///
    /// A blank category means "any category". The range is kept only when
    /// both endpoints are present.
    pub fn from_parts(
        category: Option<String>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Self {
        let category = category.filter(|c| !c.trim().is_empty());
        let range = match (start, end) {
            (Some(s), Some(e)) => Some(DateRange::new(s, e)),
            _ => None,
        };
        Self { category, range }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.range = Some(DateRange::new(start, end));
        self
    }

    /// Range first, then exact (case-sensitive) category match.
    pub fn matches(&self, record: &CostRecord) -> bool {
        if let Some(range) = &self.range {
            if !range.contains(record.date) {
                return false;
            }
        }
        match &self.category {
            Some(c) => record.category == *c,
            None => true,
        }
    }
}

/// Parse a date typed on the command line or sent by a date picker.
///
/// Accepts `YYYY-MM-DD` and `DD/MM/YYYY`.
pub fn parse_filter_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, DISPLAY_DATE_FORMAT) {
        return Ok(d);
    }
    bail!("invalid date '{s}' (expected YYYY-MM-DD or DD/MM/YYYY)")
}
