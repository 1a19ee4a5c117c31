//! Data ingestion for the volscope system.
//!
//! This crate handles:
//! - Locating per-asset CSV files in a data directory
//! - Header validation (required `Date` and `Close` columns)
//! - Parsing dates and closing prices into an `AssetSeries`

pub mod discovery;
pub mod loader;

pub use discovery::{asset_name, discover_inputs};
pub use loader::{load_csv, parse_close, parse_date, read_series, CLOSE_COLUMN, DATE_COLUMN};
