use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sitecost_core::{CategoryOrder, ChartStyle, DEFAULT_PAGE_SIZE, DashboardSettings};
use sitecost_ingest::{ColumnMap, DEFAULT_DATE_FORMAT, SourceSpec};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::state::ensure_sitecost_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceSection,
    pub display: DisplaySection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSection {
    /// CSV file, or a directory with one `<sheet>.csv` per workbook sheet.
    pub path: PathBuf,
    pub sheet: Option<String>,
    /// chrono format string for the date column.
    pub date_format: String,
    pub columns: ColumnMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    pub heading: String,
    pub page_size: usize,
    pub bar_color: String,
    pub order: CategoryOrder,
}

impl Default for SourceSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from("costs.csv"),
            sheet: None,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            columns: ColumnMap::default(),
        }
    }
}

impl Default for DisplaySection {
    fn default() -> Self {
        let settings = DashboardSettings::default();
        Self {
            heading: settings.heading,
            page_size: DEFAULT_PAGE_SIZE,
            bar_color: settings.chart.bar_color,
            order: CategoryOrder::FirstSeen,
        }
    }
}

impl Config {
    pub fn source_spec(&self) -> SourceSpec {
        SourceSpec {
            path: self.source.path.clone(),
            sheet: self.source.sheet.clone(),
            columns: self.source.columns.clone(),
            date_format: self.source.date_format.clone(),
        }
    }

    pub fn dashboard_settings(&self) -> DashboardSettings {
        DashboardSettings {
            heading: self.display.heading.clone(),
            page_size: self.display.page_size,
            chart: ChartStyle {
                bar_color: self.display.bar_color.clone(),
            },
            order: self.display.order,
        }
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(ensure_sitecost_home()?.join("config.toml"))
}

/// `explicit` comes from `--config` / `SITECOST_CONFIG`. A missing file means defaults.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(p) => Ok(p.to_path_buf()),
        None => default_config_path(),
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file; using defaults");
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_config(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn parse_config(s: &str) -> Result<Config> {
    Ok(toml::from_str(s)?)
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }
    save_config(path, &Config::default())?;
    println!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let cfg = parse_config(
            r#"
[source]
path = "controle_custos"
sheet = "Custos Das Casas"

[source.columns]
date = "Data"
category = "Categoria"
amount = "Valor (R$)"

[display]
order = "alphabetical"
"#,
        )
        .unwrap();

        assert_eq!(cfg.source.sheet.as_deref(), Some("Custos Das Casas"));
        assert_eq!(cfg.source.columns.amount, "Valor (R$)");
        assert_eq!(cfg.source.date_format, DEFAULT_DATE_FORMAT);
        assert_eq!(cfg.display.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(cfg.display.order, CategoryOrder::Alphabetical);

        let spec = cfg.source_spec();
        assert_eq!(spec.path, PathBuf::from("controle_custos"));
        assert_eq!(spec.columns.date, "Data");
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        assert_eq!(parse_config(&s).unwrap(), Config::default());
    }

    #[test]
    fn test_unknown_order_is_error() {
        assert!(parse_config("[display]\norder = \"random\"\n").is_err());
    }

    #[test]
    fn test_missing_file_is_default() {
        let cfg = load_config(Path::new("/nonexistent/sitecost/config.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_dashboard_settings_follow_display() {
        let mut cfg = Config::default();
        cfg.display.bar_color = "#ff7f0e".to_string();
        cfg.display.page_size = 25;
        let settings = cfg.dashboard_settings();
        assert_eq!(settings.chart.bar_color, "#ff7f0e");
        assert_eq!(settings.page_size, 25);
    }
}
