//! Climate Dash CLI
//!
//! Command-line front end for the dashboard core:
//! - Inspect the loaded source tables
//! - Print or export the transformed measurement table
//! - Print chart series
//! - Edit utility-class strings
//! - Generate a default config file

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use climate_dash::banner::write_banner;
use climate_dash::config::{generate_default_config, Config};
use climate_dash::{update_utility_classes, DataPipeline, Metric, Table, Value};
use std::io::Write;
use std::path::PathBuf;

const HEADER_WIDTH: usize = 80;

#[derive(Parser)]
#[command(name = "climate-dash")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Weather dashboard data and styling tools")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ~/.config/climate-dash/config.toml or ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MetricArg {
    Precipitation,
    Temperature,
}

impl From<MetricArg> for Metric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Precipitation => Metric::Precipitation,
            MetricArg::Temperature => Metric::Temperature,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the tables loaded from the database and CSV file
    Tables,

    /// Print the month/day averaged measurement table
    Transform {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print per-month chart series for a statistic (JSON)
    Series {
        #[arg(value_enum)]
        metric: MetricArg,
    },

    /// Remove and/or add classes in a utility-class string
    Classes {
        /// Current class string
        current: String,
        /// Classes to remove
        #[arg(short, long)]
        remove: Vec<String>,
        /// Classes to add
        #[arg(short, long)]
        add: Vec<String>,
        /// Don't warn about classes sharing a prefix
        #[arg(long)]
        ignore_prefix_warning: bool,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    if let Err(e) = climate_dash::logging::init(&config.logging) {
        eprintln!("Logging already initialized: {}", e);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Tables => {
            let raw = pipeline(&config)?.load(&config.data.source_paths())?;
            let mut tables: Vec<&Table> = raw.tables.values().collect();
            tables.push(&raw.csv);

            match cli.format {
                OutputFormat::Json => {
                    let summary: Vec<serde_json::Value> = tables
                        .iter()
                        .map(|t| {
                            serde_json::json!({
                                "name": t.name,
                                "rows": t.height(),
                                "columns": t.columns,
                            })
                        })
                        .collect();
                    writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
                }
                OutputFormat::Csv => {
                    let mut summary = Table::new(
                        "tables",
                        vec!["name".to_string(), "rows".to_string(), "columns".to_string()],
                    );
                    for t in &tables {
                        summary.push_row(vec![
                            Value::from(t.name.as_str()),
                            Value::Integer(t.height() as i64),
                            Value::from(t.columns.join(" ")),
                        ])?;
                    }
                    summary.write_csv(&mut out)?;
                }
                OutputFormat::Table => {
                    write_banner(&mut out, "LOADED TABLES", HEADER_WIDTH, None)?;
                    writeln!(out, "{:<24} {:>8}  {}", "Table", "Rows", "Columns")?;
                    writeln!(out, "{}", "-".repeat(HEADER_WIDTH))?;
                    for t in &tables {
                        writeln!(
                            out,
                            "{:<24} {:>8}  {}",
                            t.name,
                            t.height(),
                            t.columns.join(", ")
                        )?;
                    }
                }
            }
        }

        Commands::Transform { output } => {
            let data = pipeline(&config)?.run(&config.data.source_paths())?;
            let transformed = data.transformed;

            let mut buffer = Vec::new();
            match cli.format {
                OutputFormat::Json => {
                    serde_json::to_writer_pretty(&mut buffer, &transformed.to_records())?;
                    writeln!(buffer)?;
                }
                OutputFormat::Csv => transformed.to_table().write_csv(&mut buffer)?,
                OutputFormat::Table => {
                    let display = &transformed.display;
                    let precision = |column: &str| -> Option<usize> {
                        if column == display.precipitation {
                            Some(2)
                        } else if column == display.temperature {
                            Some(1)
                        } else {
                            None
                        }
                    };
                    write_banner(&mut buffer, "HAWAII CLIMATE", HEADER_WIDTH, None)?;
                    print_table(&mut buffer, &transformed.to_table(), precision)?;
                }
            }

            match output {
                Some(path) => {
                    std::fs::write(&path, &buffer)
                        .with_context(|| format!("writing {:?}", path))?;
                    writeln!(out, "Exported {} rows to {:?}", transformed.len(), path)?;
                }
                None => out.write_all(&buffer)?,
            }
        }

        Commands::Series { metric } => {
            let data = pipeline(&config)?.run(&config.data.source_paths())?;
            let metric = Metric::from(metric);
            let body = serde_json::json!({
                "title": metric.title(),
                "series": data.transformed.series(metric),
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
        }

        Commands::Classes {
            current,
            remove,
            add,
            ignore_prefix_warning,
        } => {
            let remove: Vec<&str> = remove.iter().map(|s| s.as_str()).collect();
            let add: Vec<&str> = add.iter().map(|s| s.as_str()).collect();
            let updated = update_utility_classes(&current, &remove, &add, ignore_prefix_warning)?;
            writeln!(out, "{}", updated)?;
        }

        Commands::Config { output } => {
            let content = generate_default_config();

            match output {
                Some(path) => {
                    // Create parent directory if needed
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &content)?;
                    writeln!(out, "Config written to {:?}", path)?;
                }
                None => {
                    write!(out, "{}", content)?;
                }
            }
        }
    }

    Ok(())
}

fn pipeline(config: &Config) -> anyhow::Result<DataPipeline> {
    let options = config.transform.to_options()?;
    Ok(DataPipeline::new(options).with_measurement_table(config.data.measurement_table.clone()))
}

fn format_cell(value: &Value, precision: Option<usize>) -> String {
    match (value, precision) {
        (Value::Null, _) => "-".to_string(),
        (Value::Real(v), Some(p)) => format!("{:.*}", p, v),
        (Value::Integer(v), Some(p)) => format!("{:.*}", p, *v as f64),
        (other, _) => other.to_string(),
    }
}

fn print_table<W: Write>(
    out: &mut W,
    table: &Table,
    precision: impl Fn(&str) -> Option<usize>,
) -> std::io::Result<()> {
    if table.is_empty() {
        return writeln!(out, "No data");
    }

    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .zip(&table.columns)
                .map(|(value, column)| format_cell(value, precision(column)))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            cells
                .iter()
                .map(|row| row[i].len())
                .chain(std::iter::once(column.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    // Header
    let header: Vec<String> = table
        .columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{:<width$}", c, width = *w))
        .collect();
    writeln!(out, "{}", header.join(" | "))?;

    // Separator
    let total = widths.iter().sum::<usize>() + 3 * widths.len().saturating_sub(1);
    writeln!(out, "{}", "-".repeat(total))?;

    // Data rows
    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect();
        writeln!(out, "{}", line.join(" | "))?;
    }

    Ok(())
}
