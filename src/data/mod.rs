//! Dashboard data
//!
//! This module provides the dashboard's tabular data:
//!
//! - **table**: In-memory `Table`/`Value` structure
//! - **source**: `TableReader` capability with SQLite and CSV readers
//! - **transform**: Measurement reshaping (month/day means)
//! - **series**: Per-month chart series
//! - **sample**: Static bar chart dataset
//! - **pipeline**: `DataPipeline` orchestrating load and transform
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use climate_dash::data::{DataPipeline, SourcePaths, TransformOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let paths = SourcePaths {
//!         database: "./data/hawaii.sqlite".into(),
//!         csv_dir: "./data".into(),
//!         csv_file: "playoff_teams_df.csv".to_string(),
//!     };
//!
//!     let data = DataPipeline::new(TransformOptions::default()).run(&paths)?;
//!     for record in data.transformed.to_records() {
//!         println!("{:?}", record);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod pipeline;
pub mod sample;
pub mod series;
pub mod source;
pub mod table;
pub mod transform;

// Re-export commonly used types
pub use error::{PipelineError, PipelineResult};
pub use pipeline::{DashboardData, DataPipeline, RawTables, SourcePaths};
pub use sample::sample_data;
pub use series::{Metric, Series};
pub use source::{CsvReader, SqliteReader, TableReader};
pub use table::{Table, Value};
pub use transform::{
    parse_date, transform, transform_measurements, DisplayNames, MeasurementColumns, MonthLabel,
    RawMeasurement, TransformOptions, TransformedMeasurement, TransformedTable,
};
