//! Bar chart description handed to whatever draws it.
//!
//! `ChartFigure` serializes to the `{ data, layout }` shape browser plotting
//! libraries accept. `render_text` draws the same series in a terminal.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::aggregate::AggregateSeries;
use crate::record::format_amount;

pub const DEFAULT_BAR_COLOR: &str = "#1f77b4";
pub const X_AXIS_TITLE: &str = "Category";
pub const Y_AXIS_TITLE: &str = "Total amount";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartStyle {
    pub bar_color: String,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            bar_color: DEFAULT_BAR_COLOR.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarTrace {
    pub x: Vec<String>,
    pub y: Vec<f64>,
    #[serde(rename = "type")]
    pub kind: String,
    pub marker: Marker,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub title: String,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub title: String,
    pub xaxis: Axis,
    pub yaxis: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartFigure {
    pub data: Vec<BarTrace>,
    pub layout: Layout,
}

impl ChartFigure {
    pub fn from_series(series: &AggregateSeries, style: &ChartStyle) -> Self {
        let visible = !series.is_empty();
        let data = if visible {
            vec![BarTrace {
                x: series.entries.iter().map(|e| e.category.clone()).collect(),
                // Floats only at the drawing boundary; totals stay exact upstream.
                y: series
                    .entries
                    .iter()
                    .map(|e| e.total.to_f64().unwrap_or_default())
                    .collect(),
                kind: "bar".to_string(),
                marker: Marker {
                    color: style.bar_color.clone(),
                },
                name: "Cost".to_string(),
            }]
        } else {
            Vec::new()
        };

        Self {
            data,
            layout: Layout {
                title: series.title.clone(),
                xaxis: Axis {
                    title: X_AXIS_TITLE.to_string(),
                    visible,
                },
                yaxis: Axis {
                    title: Y_AXIS_TITLE.to_string(),
                    visible,
                },
            },
        }
    }
}

/// Horizontal text bar chart, one line per category.
///
/// Bars are scaled to the largest absolute total; negative totals are drawn
/// with `-` instead of `#`.
pub fn render_text(series: &AggregateSeries, width: usize) -> String {
    let mut out = String::new();
    out.push_str(&series.title);
    out.push('\n');

    if series.is_empty() {
        return out;
    }

    let label_w = series
        .entries
        .iter()
        .map(|e| e.category.chars().count())
        .max()
        .unwrap_or(0);
    let max = series
        .entries
        .iter()
        .map(|e| e.total.abs())
        .max()
        .unwrap_or(Decimal::ZERO);

    for e in &series.entries {
        let len = bar_len(e.total.abs(), max, width);
        let glyph = if e.total.is_sign_negative() { "-" } else { "#" };
        out.push_str(&format!(
            "{:<label_w$} | {:<width$} {}\n",
            e.category,
            glyph.repeat(len),
            format_amount(e.total),
        ));
    }

    out
}

/// `value <= max`, so the ratio is in `[0, 1]` and scaling it by `width`
/// stays far inside the `Decimal` range.
fn bar_len(value: Decimal, max: Decimal, width: usize) -> usize {
    let Some(ratio) = value.checked_div(max) else {
        return 0;
    };
    ratio
        .checked_mul(Decimal::from(width))
        .and_then(|scaled| scaled.round().to_usize())
        .unwrap_or(width)
        .min(width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{CategoryTotal, TITLE_EMPTY};

    fn series() -> AggregateSeries {
        AggregateSeries {
            title: "Total cost by category".to_string(),
            entries: vec![
                CategoryTotal {
                    category: "Materials".to_string(),
                    total: Decimal::new(50000, 2),
                    count: 1,
                    saturated: false,
                },
                CategoryTotal {
                    category: "Labor".to_string(),
                    total: Decimal::new(25000, 2),
                    count: 1,
                    saturated: false,
                },
            ],
        }
    }

    #[test]
    fn test_figure_for_series() {
        let fig = ChartFigure::from_series(&series(), &ChartStyle::default());
        assert_eq!(fig.data.len(), 1);
        assert_eq!(fig.data[0].x, vec!["Materials", "Labor"]);
        assert_eq!(fig.data[0].y, vec![500.0, 250.0]);
        assert_eq!(fig.data[0].marker.color, DEFAULT_BAR_COLOR);
        assert!(fig.layout.xaxis.visible);
        assert_eq!(fig.layout.title, "Total cost by category");
    }

    #[test]
    fn test_figure_for_empty_series_hides_axes() {
        let fig = ChartFigure::from_series(&AggregateSeries::empty(), &ChartStyle::default());
        assert!(fig.data.is_empty());
        assert!(!fig.layout.xaxis.visible);
        assert!(!fig.layout.yaxis.visible);
        assert_eq!(fig.layout.title, TITLE_EMPTY);
    }

    #[test]
    fn test_figure_json_shape() {
        let fig = ChartFigure::from_series(&series(), &ChartStyle::default());
        let v = serde_json::to_value(&fig).unwrap();
        assert_eq!(v["data"][0]["type"], "bar");
        assert_eq!(v["layout"]["xaxis"]["title"], X_AXIS_TITLE);
    }

    #[test]
    fn test_render_text_scales_bars() {
        let text = render_text(&series(), 10);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Total cost by category");
        assert!(lines[1].starts_with("Materials | ##########"));
        assert!(lines[1].ends_with("500.00"));
        assert!(lines[2].starts_with("Labor     | #####"));
        assert!(!lines[2].contains("######"));
    }

    #[test]
    fn test_render_text_negative_total() {
        let s = AggregateSeries {
            title: "t".to_string(),
            entries: vec![CategoryTotal {
                category: "Refund".to_string(),
                total: Decimal::new(-1000, 2),
                count: 1,
                saturated: false,
            }],
        };
        let text = render_text(&s, 4);
        assert!(text.contains("Refund | ----"));
        assert!(text.contains("-10.00"));
    }

    #[test]
    fn test_render_text_near_decimal_limits() {
        let s = AggregateSeries {
            title: "t".to_string(),
            entries: vec![
                CategoryTotal {
                    category: "Huge".to_string(),
                    total: Decimal::MAX,
                    count: 1,
                    saturated: false,
                },
                CategoryTotal {
                    category: "Tiny".to_string(),
                    total: Decimal::ONE,
                    count: 1,
                    saturated: false,
                },
            ],
        };
        let text = render_text(&s, 40);
        let lines: Vec<_> = text.lines().collect();
        assert!(lines[1].starts_with(&format!("Huge | {}", "#".repeat(40))));
        assert!(lines[2].starts_with("Tiny | "));
        assert!(!lines[2].contains('#'));
    }

    #[test]
    fn test_render_text_empty() {
        assert_eq!(render_text(&AggregateSeries::empty(), 10), format!("{TITLE_EMPTY}\n"));
    }
}
