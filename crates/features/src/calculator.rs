//! Return and volatility calculator.
//!
//! Turns a raw, possibly unordered price series into date-sorted returns,
//! rolling volatility and two EMA tracks.

use tracing::debug;
use volscope_core::{
    AnalysisConfig, AssetSeries, ComputedPoint, ComputedSeries, Error, PricePoint, Result,
};

use crate::{ema::Ema, volatility::{simple_returns, RollingVolatility}};

/// Calculator for returns, rolling volatility and EMAs.
pub struct VolatilityCalculator {
    window: usize,
    ema_short: usize,
    ema_long: usize,
}

impl VolatilityCalculator {
    /// Create a calculator from the analysis configuration.
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            window: config.window,
            ema_short: config.ema_short,
            ema_long: config.ema_long,
        }
    }

    /// Compute every column for every point.
    ///
    /// Non-finite closes are rejected before anything is computed. The sort
    /// is stable; duplicate dates keep their input order.
    pub fn compute(&self, series: &AssetSeries) -> Result<ComputedSeries> {
        if let Some(bad) = series.points.iter().find(|p| !p.close.is_finite()) {
            return Err(Error::InvalidPrice {
                date: bad.date,
                close: bad.close,
            });
        }

        let mut points: Vec<PricePoint> = series.points.clone();
        points.sort_by_key(|p| p.date);

        let closes: Vec<f64> = points.iter().map(|p| p.close).collect();
        let returns = simple_returns(&closes)?;

        let mut rolling = RollingVolatility::new(self.window);
        let mut ema_short = Ema::new(self.ema_short);
        let mut ema_long = Ema::new(self.ema_long);

        let computed: Vec<ComputedPoint> = points
            .iter()
            .zip(returns)
            .map(|(point, ret)| ComputedPoint {
                date: point.date,
                close: point.close,
                ret,
                volatility: ret.and_then(|r| rolling.add_return(r)),
                ema_short: ema_short.update(point.close),
                ema_long: ema_long.update(point.close),
            })
            .collect();

        debug!(
            "{}: computed {} points, {} with full {}-return window",
            series.name,
            computed.len(),
            computed.iter().filter(|p| p.volatility.is_some()).count(),
            self.window
        );

        Ok(ComputedSeries { points: computed })
    }

    /// Minimum number of input points for a non-empty analyzable range.
    pub fn min_points(&self) -> usize {
        self.window + 1
    }
}
