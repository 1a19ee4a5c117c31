//! Text summaries and on-disk export of per-asset results.
//!
//! Export layout, one directory per asset:
//!
//! ```text
//! <output_dir>/<asset>/analysis.csv
//! <output_dir>/<asset>/trades.csv
//! <output_dir>/<asset>/scenarios.csv
//! <output_dir>/<asset>/summary.json
//! ```

use chrono::NaiveDate;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use volscope_backtest::{SimulationResult, TradeMetrics};
use volscope_core::{Result, ScenarioPoint, ScenarioSet, VolatilitySpan};

use crate::pipeline::{AssetOutcome, AssetReport};

/// Row of `scenarios.csv`.
#[derive(Debug, Serialize)]
struct ScenarioRow {
    day: usize,
    date: NaiveDate,
    optimistic: f64,
    neutral: f64,
    pessimistic: f64,
}

/// Contents of `summary.json`.
#[derive(Debug, Serialize)]
struct Summary<'a> {
    asset: &'a str,
    input_points: usize,
    records: usize,
    first_date: Option<NaiveDate>,
    last_date: Option<NaiveDate>,
    threshold: Option<f64>,
    high_volatility_count: usize,
    high_volatility_spans: Vec<VolatilitySpan>,
    starting_capital: f64,
    final_capital: f64,
    net_gain: f64,
    metrics: &'a TradeMetrics,
    scenarios: Option<&'a ScenarioSet>,
}

/// Render a human-readable summary of one outcome.
pub fn render_summary(outcome: &AssetOutcome) -> String {
    match outcome {
        AssetOutcome::Analyzed(report) => render_report(report),
        AssetOutcome::InsufficientData { name, points, required } => format!(
            "=== {} ===\n  Insufficient data: {} points, need at least {}\n",
            name, points, required
        ),
        AssetOutcome::Skipped { name, reason } => {
            format!("=== {} ===\n  Skipped: {}\n", name, reason)
        }
    }
}

fn render_report(report: &AssetReport) -> String {
    let analyzed = &report.analyzed;
    let sim: &SimulationResult = &report.simulation;

    let mut lines = vec![format!("=== {} ===", report.name)];
    if let (Some(first), Some(last)) = (analyzed.first_date(), analyzed.last_date()) {
        lines.push(format!(
            "  Period:           {} to {} ({} records)",
            first,
            last,
            analyzed.len()
        ));
    }
    lines.push(format!("  Threshold:        {:.6}", report.threshold()));
    lines.push(format!(
        "  High volatility:  {} records in {} spans",
        analyzed.high_volatility_count(),
        analyzed.high_volatility_spans().len()
    ));
    lines.push(format!(
        "  Trades:           {} ({} wins, {} losses, {} forced)",
        sim.metrics.total_trades,
        sim.metrics.winning_trades,
        sim.metrics.losing_trades,
        sim.metrics.forced_exits
    ));
    lines.push(format!(
        "  Capital:          {:.2} -> {:.2} (net {:+.2})",
        sim.starting_capital, sim.final_capital, sim.net_gain
    ));
    match &report.scenarios {
        Some(set) => {
            let end = |path: &[ScenarioPoint]| {
                path.last().map(|p| p.price).unwrap_or(set.last_price)
            };
            lines.push(format!(
                "  Scenarios (+{}d): optimistic {:.2}, neutral {:.2}, pessimistic {:.2}",
                set.horizon(),
                end(&set.optimistic),
                end(&set.neutral),
                end(&set.pessimistic)
            ));
        }
        None => lines.push("  Scenarios:        not enough history".to_string()),
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Write all result files for one asset and return its directory.
pub fn export_report(report: &AssetReport, output_dir: &Path) -> Result<PathBuf> {
    let dir = output_dir.join(&report.name);
    fs::create_dir_all(&dir)?;

    let mut writer = csv::Writer::from_path(dir.join("analysis.csv"))?;
    for record in &report.analyzed.records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    let mut writer = csv::Writer::from_path(dir.join("trades.csv"))?;
    for event in &report.simulation.events {
        writer.serialize(event)?;
    }
    writer.flush()?;

    let mut writer = csv::Writer::from_path(dir.join("scenarios.csv"))?;
    if let Some(set) = &report.scenarios {
        for row in scenario_rows(set) {
            writer.serialize(row)?;
        }
    }
    writer.flush()?;

    let summary = Summary {
        asset: &report.name,
        input_points: report.input_points,
        records: report.analyzed.len(),
        first_date: report.analyzed.first_date(),
        last_date: report.analyzed.last_date(),
        threshold: report.analyzed.threshold,
        high_volatility_count: report.analyzed.high_volatility_count(),
        high_volatility_spans: report.analyzed.high_volatility_spans(),
        starting_capital: report.simulation.starting_capital,
        final_capital: report.simulation.final_capital,
        net_gain: report.simulation.net_gain,
        metrics: &report.simulation.metrics,
        scenarios: report.scenarios.as_ref(),
    };
    fs::write(dir.join("summary.json"), serde_json::to_string_pretty(&summary)?)?;

    debug!("Exported {} to {}", report.name, dir.display());
    Ok(dir)
}

fn scenario_rows(set: &ScenarioSet) -> impl Iterator<Item = ScenarioRow> + '_ {
    set.neutral
        .iter()
        .zip(&set.optimistic)
        .zip(&set.pessimistic)
        .map(|((neu, opt), pes)| ScenarioRow {
            day: neu.day,
            date: neu.date,
            optimistic: opt.price,
            neutral: neu.price,
            pessimistic: pes.price,
        })
}
