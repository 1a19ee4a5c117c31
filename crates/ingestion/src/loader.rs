//! CSV price history loading.
//!
//! Reads `Date`/`Close` columns by header name; any other columns are
//! ignored. Header checks happen before a single row is parsed so a file
//! without the required fields is rejected up front.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::io::Read;
use std::path::Path;
use tracing::debug;
use volscope_core::{AssetSeries, Error, PricePoint, Result};

use crate::discovery::asset_name;

/// Required date column header.
pub const DATE_COLUMN: &str = "Date";
/// Required closing price column header.
pub const CLOSE_COLUMN: &str = "Close";

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Load one asset's price history from a CSV file.
///
/// The asset is named after the file stem (`data/Bitcoin.csv` -> `Bitcoin`).
pub fn load_csv(path: impl AsRef<Path>) -> Result<AssetSeries> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let series = read_series(asset_name(path), file)?;
    debug!("Loaded {} rows from {}", series.len(), path.display());
    Ok(series)
}

/// Read a price series from any CSV source.
pub fn read_series<R: Read>(name: impl Into<String>, reader: R) -> Result<AssetSeries> {
    let name = name.into();
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let date_idx = column_index(&headers, DATE_COLUMN, &name)?;
    let close_idx = column_index(&headers, CLOSE_COLUMN, &name)?;

    let mut points = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        // Header is row 1.
        let row = idx + 2;

        let date_str = record.get(date_idx).unwrap_or("");
        let close_str = record.get(close_idx).unwrap_or("");

        let date = parse_date(date_str)
            .ok_or_else(|| Error::invalid_field(row, DATE_COLUMN, date_str))?;
        let close = parse_close(close_str)
            .ok_or_else(|| Error::invalid_field(row, CLOSE_COLUMN, close_str))?;

        points.push(PricePoint::new(date, close));
    }

    Ok(AssetSeries::new(name, points))
}

fn column_index(headers: &csv::StringRecord, column: &str, source_name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}') == column)
        .ok_or_else(|| Error::missing_column(column, source_name))
}

/// Parse a date cell. Time-of-day components are discarded.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Parse a closing price cell. Thousands separators are accepted.
pub fn parse_close(value: &str) -> Option<f64> {
    let cleaned: String = value.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
