//! Data pipeline
//!
//! Loads the dashboard's sources once and produces the tables the charts and
//! data table are built from.
//!
//! ```text
//! load:      SQLite file ─┐
//!                          ├→ RawTables
//!            CSV file ────┘
//! transform: RawTables["measurement"] → TransformedTable
//! ```

use crate::data::error::{PipelineError, PipelineResult};
use crate::data::sample::sample_data;
use crate::data::source::{CsvReader, SqliteReader, TableReader};
use crate::data::table::Table;
use crate::data::transform::{self, TransformOptions, TransformedTable};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Where the pipeline reads from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    /// SQLite database file
    pub database: PathBuf,
    /// Directory holding the CSV dataset
    pub csv_dir: PathBuf,
    /// CSV file name inside `csv_dir`
    pub csv_file: String,
}

/// Every source table, materialized
#[derive(Debug, Clone, PartialEq)]
pub struct RawTables {
    /// SQLite tables keyed by name
    pub tables: BTreeMap<String, Table>,
    /// The CSV dataset
    pub csv: Table,
}

impl RawTables {
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Table names, sorted
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(|s| s.as_str()).collect()
    }
}

/// Everything the dashboard needs, built once at startup
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardData {
    pub raw: RawTables,
    pub transformed: TransformedTable,
    pub sample: Table,
}

/// Load → transform for the climate dashboard
#[derive(Debug, Clone)]
pub struct DataPipeline {
    options: TransformOptions,
    measurement_table: String,
}

impl Default for DataPipeline {
    fn default() -> Self {
        Self::new(TransformOptions::default())
    }
}

impl DataPipeline {
    /// Create a pipeline reading the `measurement` table
    pub fn new(options: TransformOptions) -> Self {
        Self {
            options,
            measurement_table: "measurement".to_string(),
        }
    }

    /// Set which SQLite table holds the measurements
    pub fn with_measurement_table(mut self, name: impl Into<String>) -> Self {
        self.measurement_table = name.into();
        self
    }

    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    /// Load every table from the database and the CSV dataset
    pub fn load(&self, paths: &SourcePaths) -> PipelineResult<RawTables> {
        let sqlite = SqliteReader::new(&paths.database);
        let csv = CsvReader::new(&paths.csv_dir, paths.csv_file.as_str());
        self.load_from(&sqlite, &csv)
    }

    /// Load from arbitrary readers; the second must yield exactly one table
    pub fn load_from(
        &self,
        database: &dyn TableReader,
        csv: &dyn TableReader,
    ) -> PipelineResult<RawTables> {
        let tables: BTreeMap<String, Table> = database
            .read_tables()?
            .into_iter()
            .map(|t| (t.name.clone(), t))
            .collect();

        if tables.is_empty() {
            return Err(PipelineError::StorageFormat(
                "database source returned no tables".to_string(),
            ));
        }

        let csv = csv.read_tables()?.into_iter().next().ok_or_else(|| {
            PipelineError::StorageFormat("CSV source returned no table".to_string())
        })?;

        tracing::info!(
            "Loaded {} tables ({}) and CSV `{}` with {} rows",
            tables.len(),
            tables.keys().cloned().collect::<Vec<_>>().join(", "),
            csv.name,
            csv.height()
        );

        Ok(RawTables { tables, csv })
    }

    /// Reshape a raw measurement table
    pub fn transform(&self, raw: &Table) -> PipelineResult<TransformedTable> {
        transform::transform(raw, &self.options)
    }

    /// Load, then transform the measurement table
    pub fn run(&self, paths: &SourcePaths) -> PipelineResult<DashboardData> {
        let raw = self.load(paths)?;
        let measurement = raw.table(&self.measurement_table).ok_or_else(|| {
            PipelineError::Schema(format!(
                "database has no `{}` table (tables: {})",
                self.measurement_table,
                raw.table_names().join(", ")
            ))
        })?;

        let transformed = self.transform(measurement)?;
        tracing::info!(
            "Prepared {} rows for months {}",
            transformed.len(),
            transformed.months.join("/")
        );

        Ok(DashboardData {
            raw,
            transformed,
            sample: sample_data(),
        })
    }
}
