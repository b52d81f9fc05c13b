//! Measurement reshaping
//!
//! Turns the raw weather `measurement` table into one row per
//! (month, day-of-month) for two configured months, averaging precipitation
//! and temperature across all years.
//!
//! # Pipeline
//!
//! ```text
//! Table → RawMeasurement → month/day → filter months → group → mean → order → rename
//! ```

use crate::data::error::{PipelineError, PipelineResult};
use crate::data::table::{Table, Value};
use chrono::{Datelike, Month, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How month values are labelled in the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthLabel {
    /// "Jun", "Dec"
    #[default]
    Abbreviated,
    /// "June", "December"
    Full,
}

impl MonthLabel {
    pub fn label(&self, month: Month) -> String {
        let name = month.name();
        match self {
            MonthLabel::Abbreviated => name[..3].to_string(),
            MonthLabel::Full => name.to_string(),
        }
    }
}

/// Source column names of the measurement table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementColumns {
    #[serde(default = "default_date_column")]
    pub date: String,
    #[serde(default = "default_station_column")]
    pub station: String,
    #[serde(default = "default_precipitation_column")]
    pub precipitation: String,
    #[serde(default = "default_temperature_column")]
    pub temperature: String,
}

fn default_date_column() -> String {
    "date".to_string()
}

fn default_station_column() -> String {
    "station".to_string()
}

fn default_precipitation_column() -> String {
    "prcp".to_string()
}

fn default_temperature_column() -> String {
    "tobs".to_string()
}

impl Default for MeasurementColumns {
    fn default() -> Self {
        Self {
            date: default_date_column(),
            station: default_station_column(),
            precipitation: default_precipitation_column(),
            temperature: default_temperature_column(),
        }
    }
}

/// Output column titles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayNames {
    #[serde(default = "default_month_title")]
    pub month: String,
    #[serde(default = "default_day_title")]
    pub day: String,
    #[serde(default = "default_precipitation_title")]
    pub precipitation: String,
    #[serde(default = "default_temperature_title")]
    pub temperature: String,
}

fn default_month_title() -> String {
    "Month".to_string()
}

fn default_day_title() -> String {
    "Day".to_string()
}

fn default_precipitation_title() -> String {
    "Precipitation".to_string()
}

fn default_temperature_title() -> String {
    "Temperature".to_string()
}

impl Default for DisplayNames {
    fn default() -> Self {
        Self {
            month: default_month_title(),
            day: default_day_title(),
            precipitation: default_precipitation_title(),
            temperature: default_temperature_title(),
        }
    }
}

impl DisplayNames {
    /// Column titles in output order
    pub fn columns(&self) -> Vec<String> {
        vec![
            self.month.clone(),
            self.day.clone(),
            self.precipitation.clone(),
            self.temperature.clone(),
        ]
    }
}

/// Everything `transform` needs besides the data
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOptions {
    /// The two target months, in output order
    pub months: [Month; 2],
    pub month_label: MonthLabel,
    pub columns: MeasurementColumns,
    pub display: DisplayNames,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            months: [Month::June, Month::December],
            month_label: MonthLabel::default(),
            columns: MeasurementColumns::default(),
            display: DisplayNames::default(),
        }
    }
}

impl TransformOptions {
    /// Output labels of the configured months, in order
    pub fn month_labels(&self) -> Vec<String> {
        self.months
            .iter()
            .map(|m| self.month_label.label(*m))
            .collect()
    }
}

/// One weather observation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawMeasurement {
    pub date: NaiveDate,
    pub station: String,
    pub precipitation: Option<f64>,
    pub temperature: Option<f64>,
}

impl RawMeasurement {
    pub fn new(
        date: NaiveDate,
        station: impl Into<String>,
        precipitation: Option<f64>,
        temperature: Option<f64>,
    ) -> Self {
        Self {
            date,
            station: station.into(),
            precipitation,
            temperature,
        }
    }

    /// Extract typed measurements from a raw table
    pub fn from_table(table: &Table, columns: &MeasurementColumns) -> PipelineResult<Vec<Self>> {
        let date_idx = table.require_column(&columns.date)?;
        let station_idx = table.require_column(&columns.station)?;
        let prcp_idx = table.require_column(&columns.precipitation)?;
        let tobs_idx = table.require_column(&columns.temperature)?;

        let mut measurements = Vec::with_capacity(table.height());

        for (i, row) in table.rows.iter().enumerate() {
            // A row without a date has no month and can never be selected
            let missing_date = match &row[date_idx] {
                Value::Null => true,
                Value::Text(s) => s.trim().is_empty(),
                _ => false,
            };
            if missing_date {
                continue;
            }

            let date = row[date_idx]
                .as_str()
                .and_then(parse_date)
                .ok_or_else(|| {
                    PipelineError::Schema(format!(
                        "unparseable date: {}",
                        table.describe_cell(i, date_idx)
                    ))
                })?;

            let station = match &row[station_idx] {
                Value::Null => String::new(),
                other => other.to_string(),
            };

            measurements.push(Self {
                date,
                station,
                precipitation: numeric_cell(table, i, prcp_idx)?,
                temperature: numeric_cell(table, i, tobs_idx)?,
            });
        }

        Ok(measurements)
    }
}

/// Numeric cell: null/NaN → None, numeric text is accepted
fn numeric_cell(table: &Table, row: usize, col: usize) -> PipelineResult<Option<f64>> {
    match &table.rows[row][col] {
        Value::Null => Ok(None),
        Value::Integer(_) | Value::Real(_) => Ok(table.rows[row][col].as_f64()),
        Value::Text(s) if s.trim().is_empty() => Ok(None),
        Value::Text(s) => s
            .trim()
            .parse::<f64>()
            .map(|v| if v.is_nan() { None } else { Some(v) })
            .map_err(|_| {
                PipelineError::Schema(format!(
                    "expected a number: {}",
                    table.describe_cell(row, col)
                ))
            }),
        Value::Blob(_) => Err(PipelineError::Schema(format!(
            "expected a number: {}",
            table.describe_cell(row, col)
        ))),
    }
}

/// Parse a date string in the formats the source data uses
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    let date_formats = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];
    for fmt in date_formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    None
}

/// One averaged (month, day) row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformedMeasurement {
    /// Month label ("Jun" or "June", depending on `MonthLabel`)
    pub month: String,
    /// Day of month, 1-31
    pub day: u32,
    /// Mean precipitation across years; `None` when no year had a value
    pub precipitation: Option<f64>,
    /// Mean temperature across years; `None` when no year had a value
    pub temperature: Option<f64>,
}

/// Transformed rows with their display column names
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformedTable {
    pub display: DisplayNames,
    /// Month labels in output order
    pub months: Vec<String>,
    pub rows: Vec<TransformedMeasurement>,
}

impl TransformedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows as display-name → value mappings
    pub fn to_records(&self) -> Vec<serde_json::Map<String, serde_json::Value>> {
        self.to_table().to_records()
    }

    /// Convert to a generic `Table` named `transformed_measurement`
    pub fn to_table(&self) -> Table {
        let mut table = Table::new("transformed_measurement", self.display.columns());
        table.rows = self
            .rows
            .iter()
            .map(|row| {
                vec![
                    Value::from(row.month.as_str()),
                    Value::Integer(i64::from(row.day)),
                    Value::from(row.precipitation),
                    Value::from(row.temperature),
                ]
            })
            .collect();
        table
    }
}

#[derive(Debug, Default)]
struct Accumulator {
    prcp_sum: f64,
    prcp_count: usize,
    tobs_sum: f64,
    tobs_count: usize,
}

impl Accumulator {
    fn add(&mut self, m: &RawMeasurement) {
        if let Some(p) = m.precipitation.filter(|v| !v.is_nan()) {
            self.prcp_sum += p;
            self.prcp_count += 1;
        }
        if let Some(t) = m.temperature.filter(|v| !v.is_nan()) {
            self.tobs_sum += t;
            self.tobs_count += 1;
        }
    }

    fn mean(sum: f64, count: usize) -> Option<f64> {
        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }
}

/// Average measurements per (month, day) for the two configured months
pub fn transform_measurements(
    raw: &[RawMeasurement],
    options: &TransformOptions,
) -> TransformedTable {
    // Key: (position in options.months, day). BTreeMap order is the output order.
    let mut groups: BTreeMap<(usize, u32), Accumulator> = BTreeMap::new();

    for m in raw {
        let Some(slot) = options
            .months
            .iter()
            .position(|month| month.number_from_month() == m.date.month())
        else {
            continue;
        };
        groups.entry((slot, m.date.day())).or_default().add(m);
    }

    let labels = options.month_labels();
    let rows: Vec<TransformedMeasurement> = groups
        .into_iter()
        .filter_map(|((slot, day), acc)| {
            let precipitation = Accumulator::mean(acc.prcp_sum, acc.prcp_count);
            let temperature = Accumulator::mean(acc.tobs_sum, acc.tobs_count);
            if precipitation.is_none() && temperature.is_none() {
                return None;
            }
            Some(TransformedMeasurement {
                month: labels[slot].clone(),
                day,
                precipitation,
                temperature,
            })
        })
        .collect();

    tracing::debug!(
        "Transformed {} measurements into {} rows",
        raw.len(),
        rows.len()
    );

    TransformedTable {
        display: options.display.clone(),
        months: labels,
        rows,
    }
}

/// Extract and transform a raw measurement table
pub fn transform(table: &Table, options: &TransformOptions) -> PipelineResult<TransformedTable> {
    let raw = RawMeasurement::from_table(table, &options.columns)?;
    Ok(transform_measurements(&raw, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn obs(y: i32, m: u32, d: u32, prcp: Option<f64>, tobs: Option<f64>) -> RawMeasurement {
        RawMeasurement::new(date(y, m, d), "USC00519397", prcp, tobs)
    }

    fn measurement_table(rows: &[(&str, Value, Value)]) -> Table {
        let mut table = Table::new(
            "measurement",
            vec![
                "id".to_string(),
                "station".to_string(),
                "date".to_string(),
                "prcp".to_string(),
                "tobs".to_string(),
            ],
        );
        for (i, (d, prcp, tobs)) in rows.iter().enumerate() {
            table
                .push_row(vec![
                    Value::Integer(i as i64 + 1),
                    Value::from("USC00519397"),
                    Value::from(*d),
                    prcp.clone(),
                    tobs.clone(),
                ])
                .unwrap();
        }
        table
    }

    #[test]
    fn test_mean_across_years() {
        let raw = vec![
            obs(2016, 6, 1, Some(0.1), Some(70.0)),
            obs(2017, 6, 1, Some(0.3), Some(72.0)),
        ];

        let result = transform_measurements(&raw, &TransformOptions::default());

        assert_eq!(result.len(), 1);
        let row = &result.rows[0];
        assert_eq!(row.month, "Jun");
        assert_eq!(row.day, 1);
        assert_eq!(row.temperature, Some(71.0));
        assert!((row.precipitation.unwrap() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_only_configured_months() {
        let raw = vec![
            obs(2016, 1, 5, Some(0.0), Some(65.0)),
            obs(2016, 6, 5, Some(0.0), Some(75.0)),
            obs(2016, 7, 5, Some(0.0), Some(78.0)),
            obs(2016, 12, 5, Some(0.5), Some(69.0)),
        ];

        let result = transform_measurements(&raw, &TransformOptions::default());

        assert_eq!(result.len(), 2);
        assert!(result.rows.iter().all(|r| r.month == "Jun" || r.month == "Dec"));
    }

    #[test]
    fn test_ordering_and_uniqueness() {
        let raw = vec![
            obs(2015, 12, 3, None, Some(70.0)),
            obs(2016, 6, 20, None, Some(76.0)),
            obs(2014, 12, 1, None, Some(68.0)),
            obs(2016, 6, 2, None, Some(74.0)),
            obs(2017, 6, 2, None, Some(75.0)),
            obs(2016, 12, 3, None, Some(71.0)),
        ];

        let result = transform_measurements(&raw, &TransformOptions::default());
        let keys: Vec<(&str, u32)> = result
            .rows
            .iter()
            .map(|r| (r.month.as_str(), r.day))
            .collect();

        assert_eq!(
            keys,
            vec![("Jun", 2), ("Jun", 20), ("Dec", 1), ("Dec", 3)]
        );
    }

    #[test]
    fn test_configured_month_order_wins() {
        let options = TransformOptions {
            months: [Month::December, Month::June],
            month_label: MonthLabel::Full,
            ..Default::default()
        };
        let raw = vec![
            obs(2016, 6, 1, Some(0.0), Some(74.0)),
            obs(2016, 12, 1, Some(0.0), Some(70.0)),
        ];

        let result = transform_measurements(&raw, &options);

        assert_eq!(result.months, vec!["December", "June"]);
        assert_eq!(result.rows[0].month, "December");
        assert_eq!(result.rows[1].month, "June");
    }

    #[test]
    fn test_missing_values_are_skipped() {
        let raw = vec![
            obs(2015, 6, 9, None, Some(70.0)),
            obs(2016, 6, 9, Some(0.4), None),
            obs(2017, 6, 9, None, Some(74.0)),
        ];

        let result = transform_measurements(&raw, &TransformOptions::default());

        assert_eq!(result.rows[0].precipitation, Some(0.4));
        assert_eq!(result.rows[0].temperature, Some(72.0));
    }

    #[test]
    fn test_statistic_absent_for_whole_group() {
        let raw = vec![
            obs(2015, 6, 9, None, Some(70.0)),
            obs(2016, 6, 9, None, Some(72.0)),
            obs(2016, 6, 10, None, None),
        ];

        let result = transform_measurements(&raw, &TransformOptions::default());

        // June 10 has no values at all and is dropped
        assert_eq!(result.len(), 1);
        assert_eq!(result.rows[0].precipitation, None);
        assert_eq!(result.rows[0].temperature, Some(71.0));

        let records = result.to_records();
        assert!(records[0]["Precipitation"].is_null());
    }

    #[test]
    fn test_transform_is_repeatable() {
        let table = measurement_table(&[
            ("2016-06-01", Value::Real(0.1), Value::Real(70.0)),
            ("2016-12-24", Value::Null, Value::Integer(68)),
            ("2017-06-01", Value::Real(0.0), Value::Real(72.0)),
        ]);
        let options = TransformOptions::default();

        let first = transform(&table, &options).unwrap();
        let second = transform(&table, &options).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_renamed_records() {
        let table = measurement_table(&[("2016-06-01", Value::Real(0.5), Value::Real(70.0))]);

        let result = transform(&table, &TransformOptions::default()).unwrap();
        let records = result.to_records();

        assert_eq!(records.len(), 1);
        let keys: Vec<&String> = records[0].keys().collect();
        assert_eq!(keys.len(), 4);
        assert_eq!(records[0]["Month"], serde_json::json!("Jun"));
        assert_eq!(records[0]["Day"], serde_json::json!(1));
        assert_eq!(records[0]["Precipitation"], serde_json::json!(0.5));
        assert_eq!(records[0]["Temperature"], serde_json::json!(70.0));
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let mut table = Table::new(
            "measurement",
            vec!["station".to_string(), "date".to_string(), "prcp".to_string()],
        );
        table
            .push_row(vec![
                Value::from("USC00519397"),
                Value::from("2016-06-01"),
                Value::Real(0.0),
            ])
            .unwrap();

        let result = transform(&table, &TransformOptions::default());
        assert!(matches!(result, Err(PipelineError::Schema(_))));
    }

    #[test]
    fn test_bad_cells_are_schema_errors() {
        let table = measurement_table(&[("not a date", Value::Real(0.0), Value::Real(70.0))]);
        assert!(matches!(
            transform(&table, &TransformOptions::default()),
            Err(PipelineError::Schema(_))
        ));

        let table = measurement_table(&[("2016-06-01", Value::from("wet"), Value::Real(70.0))]);
        assert!(matches!(
            transform(&table, &TransformOptions::default()),
            Err(PipelineError::Schema(_))
        ));
    }

    #[test]
    fn test_rows_without_date_are_skipped() {
        let mut table = measurement_table(&[
            ("2016-06-01", Value::Real(0.1), Value::Real(70.0)),
            ("", Value::Real(0.5), Value::Real(60.0)),
        ]);
        table
            .push_row(vec![
                Value::Integer(3),
                Value::from("USC00519397"),
                Value::Null,
                Value::Real(0.9),
                Value::Real(50.0),
            ])
            .unwrap();

        let result = transform(&table, &TransformOptions::default()).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.rows[0].month, "Jun");
        assert_eq!(result.rows[0].day, 1);
        assert_eq!(result.rows[0].precipitation, Some(0.1));
        assert_eq!(result.rows[0].temperature, Some(70.0));
    }

    #[test]
    fn test_numeric_text_is_accepted() {
        let table = measurement_table(&[("2016-06-01", Value::from("0.25"), Value::from(" 70 "))]);

        let result = transform(&table, &TransformOptions::default()).unwrap();
        assert_eq!(result.rows[0].precipitation, Some(0.25));
        assert_eq!(result.rows[0].temperature, Some(70.0));
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2010-01-01"), Some(date(2010, 1, 1)));
        assert_eq!(parse_date("06/15/2012"), Some(date(2012, 6, 15)));
        assert_eq!(parse_date("2012/06/15"), Some(date(2012, 6, 15)));
        assert_eq!(parse_date("2012-06-15 10:30:00"), Some(date(2012, 6, 15)));
        assert_eq!(parse_date("2012-06-15T10:30:00"), Some(date(2012, 6, 15)));
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn test_month_label() {
        assert_eq!(MonthLabel::Abbreviated.label(Month::September), "Sep");
        assert_eq!(MonthLabel::Full.label(Month::September), "September");
    }

    #[test]
    fn test_to_table_columns() {
        let raw = vec![obs(2016, 12, 31, Some(1.0), Some(66.0))];
        let table = transform_measurements(&raw, &TransformOptions::default()).to_table();

        assert_eq!(table.columns, vec!["Month", "Day", "Precipitation", "Temperature"]);
        assert_eq!(table.rows[0][1], Value::Integer(31));
    }
}
