//! # Climate Dash
//!
//! Data and styling core for a small multi-page weather dashboard. The host UI
//! framework owns rendering, routing and event dispatch; this crate supplies
//! the shaped data and the styling/state transitions it asks for.
//!
//! ## Modules
//!
//! - [`data`]: Load SQLite/CSV sources and reshape measurements for charts
//! - [`classes`]: Utility-class string editing
//! - [`ui`]: Navbar toggle and active-link highlighting as pure state transitions
//! - [`banner`]: Console banner formatting
//! - [`config`]: TOML configuration with environment overrides
//! - [`logging`]: `tracing` subscriber setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use climate_dash::{Config, DataPipeline, Metric};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let pipeline = DataPipeline::new(config.transform.to_options()?)
//!         .with_measurement_table(config.data.measurement_table.clone());
//!
//!     let data = pipeline.run(&config.data.source_paths())?;
//!     for series in data.transformed.series(Metric::Temperature) {
//!         println!("{}: {} days", series.name, series.x.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod banner;
pub mod classes;
pub mod config;
pub mod data;
pub mod logging;
pub mod ui;

// Re-export top-level types for convenience
pub use data::{
    DashboardData, DataPipeline, Metric, PipelineError, PipelineResult, RawTables, Series,
    SourcePaths, Table, TransformOptions, TransformedMeasurement, TransformedTable, Value,
};

pub use classes::{update_utility_classes, ClassError, ClassList, ClassResult, PrefixCollision};

pub use ui::{NavLinkState, NavLinkStyle, NavbarEvent, NavbarState, PageEntry};

pub use config::{Config, ConfigError, DataConfig, LoggingConfig, TransformConfig};
