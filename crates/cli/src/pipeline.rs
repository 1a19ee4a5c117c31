//! Per-asset analysis pipeline and parallel batch runner.
//!
//! Each asset runs Calculator -> Classifier -> {Simulator, Projector} on its
//! own data. Assets share nothing, so a batch fans them out over a rayon pool
//! and a failure in one asset never stops the others.

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use volscope_backtest::{ScenarioProjector, SimulationResult, TradeSimulator};
use volscope_core::{
    AnalyzedSeries, AssetSeries, ComputedSeries, Config, Error, Result, ScenarioSet,
};
use volscope_features::{RegimeClassifier, VolatilityCalculator};
use volscope_ingestion::{asset_name, load_csv};

/// Everything produced for one analyzable asset.
#[derive(Debug, Clone)]
pub struct AssetReport {
    pub name: String,
    /// Number of raw input points.
    pub input_points: usize,
    /// Full calculator output (all points).
    pub computed: ComputedSeries,
    /// Cleaned, labeled series.
    pub analyzed: AnalyzedSeries,
    pub simulation: SimulationResult,
    /// None when the series is too short for the trend window.
    pub scenarios: Option<ScenarioSet>,
}

impl AssetReport {
    /// Regime threshold. Always present for a report.
    pub fn threshold(&self) -> f64 {
        self.analyzed.threshold.unwrap_or_default()
    }
}

/// Result of processing one asset.
#[derive(Debug, Clone)]
pub enum AssetOutcome {
    /// Full analysis available.
    Analyzed(Box<AssetReport>),
    /// Too few points for a full volatility window.
    InsufficientData {
        name: String,
        points: usize,
        required: usize,
    },
    /// A fatal error aborted this asset.
    Skipped { name: String, reason: String },
}

impl AssetOutcome {
    /// Asset name.
    pub fn name(&self) -> &str {
        match self {
            AssetOutcome::Analyzed(report) => &report.name,
            AssetOutcome::InsufficientData { name, .. } => name,
            AssetOutcome::Skipped { name, .. } => name,
        }
    }

    /// The report, if the asset was analyzed.
    pub fn report(&self) -> Option<&AssetReport> {
        match self {
            AssetOutcome::Analyzed(report) => Some(report),
            _ => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, AssetOutcome::Skipped { .. })
    }
}

/// Analysis pipeline bound to one configuration.
pub struct AssetPipeline {
    calculator: VolatilityCalculator,
    simulator: TradeSimulator,
    projector: ScenarioProjector,
}

impl AssetPipeline {
    /// Create a pipeline. The configuration is validated up front.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            calculator: VolatilityCalculator::new(&config.analysis),
            simulator: TradeSimulator::new(&config.simulation),
            projector: ScenarioProjector::new(&config.projection),
        })
    }

    /// Analyze one asset.
    ///
    /// Precondition and arithmetic failures are errors; a short series is a
    /// normal `InsufficientData` outcome.
    pub fn run(&self, series: &AssetSeries) -> Result<AssetOutcome> {
        let computed = self.calculator.compute(series)?;
        let analyzed = RegimeClassifier::classify(&computed);

        if analyzed.is_empty() {
            info!(
                "{}: insufficient data ({} points, need {})",
                series.name,
                series.len(),
                self.calculator.min_points()
            );
            return Ok(AssetOutcome::InsufficientData {
                name: series.name.clone(),
                points: series.len(),
                required: self.calculator.min_points(),
            });
        }

        let simulation = self.simulator.run(&analyzed)?;
        let scenarios = self.projector.project(&computed)?;

        info!(
            "{}: {} records, net gain {:.2} on {:.2}",
            series.name,
            analyzed.len(),
            simulation.net_gain,
            simulation.starting_capital
        );

        Ok(AssetOutcome::Analyzed(Box::new(AssetReport {
            name: series.name.clone(),
            input_points: series.len(),
            computed,
            analyzed,
            simulation,
            scenarios,
        })))
    }

    /// Analyze one asset, turning a fatal error into a skipped outcome.
    pub fn run_isolated(&self, series: &AssetSeries) -> AssetOutcome {
        self.run(series).unwrap_or_else(|err| skipped(&series.name, err))
    }

    /// Load and analyze one CSV file.
    pub fn run_file(&self, path: &Path) -> AssetOutcome {
        let name = asset_name(path);
        info!("Analyzing {}", path.display());
        load_csv(path)
            .and_then(|series| self.run(&series))
            .unwrap_or_else(|err| skipped(&name, err))
    }

    /// Analyze in-memory series in parallel. Results keep input order.
    ///
    /// `workers == 0` uses rayon's default thread count.
    pub fn run_batch(&self, inputs: &[AssetSeries], workers: usize) -> Result<Vec<AssetOutcome>> {
        with_pool(workers, || {
            inputs
                .par_iter()
                .map(|series| self.run_isolated(series))
                .collect()
        })
    }

    /// Load and analyze CSV files in parallel. Results keep input order.
    pub fn run_files(&self, paths: &[PathBuf], workers: usize) -> Result<Vec<AssetOutcome>> {
        with_pool(workers, || paths.par_iter().map(|path| self.run_file(path)).collect())
    }
}

fn skipped(name: &str, err: Error) -> AssetOutcome {
    let kind = if err.is_precondition() {
        "invalid input"
    } else {
        "processing failed"
    };
    warn!("{}: skipped ({}): {}", name, kind, err);
    AssetOutcome::Skipped {
        name: name.to_string(),
        reason: format!("{}: {}", kind, err),
    }
}

fn with_pool<T, F>(workers: usize, f: F) -> Result<T>
where
    T: Send,
    F: FnOnce() -> T + Send,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| Error::config(format!("failed to start worker pool: {}", e)))?;
    Ok(pool.install(f))
}
