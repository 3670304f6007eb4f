use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sitecost_core::{
    CategoryOrder, Dashboard, FilterCriteria, RecordStore, chart, parse_filter_date, table,
};
use sitecost_ingest::load_store;
use std::path::PathBuf;
use tracing::{info, warn};

mod config;
mod logging;
mod state;

use config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "sitecost",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("SITECOST_BUILD_SHA"), ")"),
    about = "Construction cost dashboard: totals by category, filters, paginated table"
)]
struct Cli {
    /// Config file (default: ~/.sitecost/config.toml)
    #[arg(long, global = true, env = "SITECOST_CONFIG")]
    config: Option<PathBuf>,

    /// Cost sheet: a CSV file or a directory of per-sheet CSVs (overrides config)
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Sheet to read when --source is a directory (overrides config)
    #[arg(long, global = true)]
    sheet: Option<String>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Only this category (exact, case-sensitive)
    #[arg(long)]
    category: Option<String>,

    /// Range start, YYYY-MM-DD or DD/MM/YYYY (needs --end)
    #[arg(long)]
    start: Option<String>,

    /// Range end, inclusive (needs --start)
    #[arg(long)]
    end: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bar chart of total cost per category
    Chart {
        #[command(flatten)]
        filter: FilterArgs,

        /// Print the chart description as JSON instead of text bars
        #[arg(long)]
        json: bool,

        /// Sort categories by name instead of first appearance
        #[arg(long)]
        alphabetical: bool,

        /// Width of the longest bar, in characters
        #[arg(long, default_value_t = 40)]
        width: usize,
    },

    /// Paginated table of every record
    Table {
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Rows per page (default from config, normally 10)
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Distinct categories, in order of first appearance
    Categories,

    /// Full dashboard snapshot (heading, options, chart, table page) as JSON
    Dashboard {
        #[command(flatten)]
        filter: FilterArgs,

        /// Table page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Configuration file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config file if none exists
    Init,

    /// Print the effective configuration
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config_path = config::resolve_config_path(cli.config.as_deref())?;
    let mut cfg = config::load_config(&config_path)?;
    if let Some(source) = &cli.source {
        cfg.source.path = source.clone();
    }
    if let Some(sheet) = &cli.sheet {
        cfg.source.sheet = Some(sheet.clone());
    }

    match cli.command {
        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(&config_path)?,
            ConfigCommand::Show => {
                println!("# {}", config_path.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },

        Command::Chart {
            filter,
            json,
            alphabetical,
            width,
        } => {
            if alphabetical {
                cfg.display.order = CategoryOrder::Alphabetical;
            }
            let filter = filter_criteria(&filter)?;
            let store = open_store(&cfg);
            let dashboard = Dashboard::new(&store, cfg.dashboard_settings());

            if json {
                let figure = dashboard.on_filter_change(&filter);
                println!("{}", serde_json::to_string_pretty(&figure)?);
            } else {
                let series = dashboard.series(&filter);
                println!("{}\n", dashboard.settings().heading);
                print!("{}", chart::render_text(&series, width));
                if !series.is_empty() {
                    println!(
                        "\nTotal: {} across {} records",
                        sitecost_core::record::format_amount(series.grand_total()),
                        series.entries.iter().map(|e| e.count).sum::<usize>()
                    );
                }
            }
        }

        Command::Table { page, page_size } => {
            if let Some(n) = page_size {
                cfg.display.page_size = n;
            }
            let store = open_store(&cfg);
            let dashboard = Dashboard::new(&store, cfg.dashboard_settings());
            let page = dashboard.table_page(page.saturating_sub(1));
            if page.page >= page.page_count {
                warn!(
                    requested = page.page + 1,
                    pages = page.page_count,
                    "page is past the end of the table"
                );
            }
            print!("{}", table::render_text(&page));
        }

        Command::Categories => {
            let store = open_store(&cfg);
            let categories = store.categories();
            if categories.is_empty() {
                println!("(no data)");
            }
            for c in categories {
                println!("{c}");
            }
        }

        Command::Dashboard { filter, page } => {
            let filter = filter_criteria(&filter)?;
            let store = open_store(&cfg);
            let dashboard = Dashboard::new(&store, cfg.dashboard_settings());
            let view = dashboard.snapshot(&filter, page.saturating_sub(1));
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
    }

    Ok(())
}

fn open_store(cfg: &Config) -> RecordStore {
    let store = load_store(&cfg.source_spec());
    if store.is_empty() {
        warn!(path = %cfg.source.path.display(), "no cost records available");
    } else {
        info!(records = store.len(), "cost records ready");
    }
    store
}

/// Validate command-line filter values and build the criteria the engine takes.
fn filter_criteria(args: &FilterArgs) -> Result<FilterCriteria> {
    let start = args
        .start
        .as_deref()
        .map(parse_filter_date)
        .transpose()
        .context("--start")?;
    let end = args
        .end
        .as_deref()
        .map(parse_filter_date)
        .transpose()
        .context("--end")?;

    if start.is_some() != end.is_some() {
        warn!("date range needs both --start and --end; ignoring the range");
    }

    Ok(FilterCriteria::from_parts(args.category.clone(), start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_filter_criteria_from_args() {
        let args = FilterArgs {
            category: Some("Materials".into()),
            start: Some("01/01/2024".into()),
            end: Some("2024-01-31".into()),
        };
        let f = filter_criteria(&args).unwrap();
        assert_eq!(f.category.as_deref(), Some("Materials"));
        let range = f.range.unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
    }

    #[test]
    fn test_one_sided_range_from_args_is_dropped() {
        let args = FilterArgs {
            start: Some("2024-01-01".into()),
            ..FilterArgs::default()
        };
        assert_eq!(filter_criteria(&args).unwrap(), FilterCriteria::all());
    }

    #[test]
    fn test_bad_date_is_error() {
        let args = FilterArgs {
            start: Some("Jan 1".into()),
            end: Some("2024-01-31".into()),
            ..FilterArgs::default()
        };
        let err = filter_criteria(&args).unwrap_err();
        assert!(format!("{err:#}").contains("--start"));
    }

    #[test]
    fn test_parse_chart_args() {
        let cli = Cli::try_parse_from([
            "sitecost", "chart", "--category", "Labor", "--json", "--source", "x.csv",
        ])
        .unwrap();
        assert_eq!(cli.source, Some(PathBuf::from("x.csv")));
        match cli.command {
            Command::Chart { filter, json, .. } => {
                assert!(json);
                assert_eq!(filter.category.as_deref(), Some("Labor"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
