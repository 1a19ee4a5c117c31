//! Per-asset pipeline, batch execution and reporting for volscope.
//!
//! Wires the engine crates together:
//! - Ingestion of `Date`/`Close` CSV files
//! - Calculator and regime classifier
//! - Trade simulator and scenario projector
//! - Console summaries and chart-data export

pub mod commands;
pub mod pipeline;
pub mod report;

pub use pipeline::{AssetOutcome, AssetPipeline, AssetReport};
pub use report::{export_report, render_summary};
