//! Chart series
//!
//! Splits a transformed table into one line per month, the shape the
//! dashboard's line charts consume (x = day of month, colour = month).

use crate::data::transform::TransformedTable;
use serde::Serialize;

/// Which statistic to plot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Precipitation,
    Temperature,
}

impl Metric {
    /// Chart title for this statistic
    pub fn title(&self) -> &'static str {
        match self {
            Metric::Precipitation => "Average Daily Precipitation in Hawaii",
            Metric::Temperature => "Average Daily Temperature in Hawaii",
        }
    }
}

/// One plotted line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    /// Month label
    pub name: String,
    /// Days of month
    pub x: Vec<u32>,
    /// Values; `None` marks a gap
    pub y: Vec<Option<f64>>,
}

impl TransformedTable {
    /// One series per month with data, in output month order
    pub fn series(&self, metric: Metric) -> Vec<Series> {
        self.months
            .iter()
            .filter_map(|month| {
                let (x, y): (Vec<u32>, Vec<Option<f64>>) = self
                    .rows
                    .iter()
                    .filter(|row| &row.month == month)
                    .map(|row| {
                        let value = match metric {
                            Metric::Precipitation => row.precipitation,
                            Metric::Temperature => row.temperature,
                        };
                        (row.day, value)
                    })
                    .unzip();

                if x.is_empty() {
                    None
                } else {
                    Some(Series {
                        name: month.clone(),
                        x,
                        y,
                    })
                }
            })
            .collect()
    }
}
