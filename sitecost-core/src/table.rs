//! Paginated view of the full record store.

use serde::{Deserialize, Serialize};

use crate::record::RecordStore;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One page of display rows. `page` is 0-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablePage {
    pub page: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub total_rows: usize,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TablePage {
    pub fn is_last(&self) -> bool {
        self.page + 1 >= self.page_count
    }
}

/// Cut page `page` out of the store.
///
/// Pages past the end come back with no rows. An empty store still reports
/// one page.
pub fn paginate(store: &RecordStore, page: usize, page_size: usize) -> TablePage {
    let page_size = page_size.max(1);
    let total_rows = store.len();
    let page_count = total_rows.div_ceil(page_size).max(1);

    let headers = store.columns().iter().map(|c| c.name.clone()).collect();
    let rows = store
        .records()
        .iter()
        .skip(page.saturating_mul(page_size))
        .take(page_size)
        .map(|r| store.columns().iter().map(|c| store.cell(r, c)).collect())
        .collect();

    TablePage {
        page,
        page_count,
        page_size,
        total_rows,
        headers,
        rows,
    }
}

/// Aligned plain-text table with a page footer.
pub fn render_text(page: &TablePage) -> String {
    let mut widths: Vec<usize> = page.headers.iter().map(|h| h.chars().count()).collect();
    for row in &page.rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: &[String]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{c:<w$}"))
            .collect();
        padded.join(" | ").trim_end().to_string()
    };

    let mut out = String::new();
    out.push_str(&line(page.headers.as_slice()));
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');
    for row in &page.rows {
        out.push_str(&line(row.as_slice()));
        out.push('\n');
    }
    out.push_str(&format!(
        "page {} of {} ({} rows)\n",
        page.page + 1,
        page.page_count,
        page.total_rows
    ));
    out
}
