//! Configuration structures for the volscope system.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Main configuration for the analysis engine.
///
/// Passed explicitly into each pipeline; nothing in the engine reads global
/// state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Volatility and smoothing configuration.
    pub analysis: AnalysisConfig,
    /// Trade simulation configuration.
    pub simulation: SimulationConfig,
    /// Scenario projection configuration.
    pub projection: ProjectionConfig,
}

impl Config {
    /// Load configuration from a JSON file.
    ///
    /// Missing sections and fields fall back to their defaults; unknown keys
    /// are rejected.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if self.analysis.window < 2 {
            return Err(Error::config(format!(
                "analysis.window must be >= 2, got {}",
                self.analysis.window
            )));
        }
        if self.analysis.ema_short == 0 || self.analysis.ema_long == 0 {
            return Err(Error::config("EMA spans must be >= 1"));
        }
        let capital = self.simulation.starting_capital;
        if !capital.is_finite() || capital <= 0.0 {
            return Err(Error::config(format!(
                "simulation.starting_capital must be positive, got {}",
                capital
            )));
        }
        if self.projection.horizon == 0 {
            return Err(Error::config("projection.horizon must be >= 1"));
        }
        if self.projection.window_slope == 0 {
            return Err(Error::config("projection.window_slope must be >= 1"));
        }
        Ok(())
    }
}

/// Rolling volatility and EMA configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Rolling volatility window (number of returns).
    pub window: usize,
    /// Short EMA span.
    pub ema_short: usize,
    /// Long EMA span.
    pub ema_long: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window: 30,
            ema_short: 10,
            ema_long: 30,
        }
    }
}

/// Trade simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Starting capital, in the same currency as the price data.
    pub starting_capital: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            starting_capital: 1000.0,
        }
    }
}

/// Scenario projection configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectionConfig {
    /// Number of projected days.
    pub horizon: usize,
    /// Trailing window used for trend and average volatility.
    pub window_slope: usize,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            horizon: 10,
            window_slope: 30,
        }
    }
}
