//! Feature computation for the volscope system.
//!
//! This crate handles:
//! - Simple returns and rolling volatility (sample std over a trailing window)
//! - Exponential moving averages of closing prices
//! - Series-wide high/low volatility regime classification

pub mod volatility;
pub mod ema;
pub mod calculator;
pub mod regime;

pub use volatility::{sample_std, simple_returns, RollingVolatility};
pub use ema::Ema;
pub use calculator::VolatilityCalculator;
pub use regime::RegimeClassifier;

use volscope_core::{AnalysisConfig, AnalyzedSeries, AssetSeries, ComputedSeries, Result};

/// Run the calculator and the classifier on one asset.
///
/// Returns the full computed series (needed by the projector) alongside the
/// cleaned, labeled series.
pub fn analyze(
    series: &AssetSeries,
    config: &AnalysisConfig,
) -> Result<(ComputedSeries, AnalyzedSeries)> {
    let computed = VolatilityCalculator::new(config).compute(series)?;
    let analyzed = RegimeClassifier::classify(&computed);
    Ok((computed, analyzed))
}
