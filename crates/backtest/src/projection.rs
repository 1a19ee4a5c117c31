//! Forward scenario projection.
//!
//! Extrapolates three price paths from the trailing trend and volatility.
//! Each day compounds additively on the previous projected price.

use statrs::statistics::Statistics;
use tracing::debug;
use volscope_core::{
    ComputedPoint, ComputedSeries, Error, ProjectionConfig, Result, ScenarioPoint, ScenarioSet,
};
use volscope_features::sample_std;

const OPTIMISTIC_SLOPE: f64 = 1.2;
const PESSIMISTIC_SLOPE: f64 = 0.8;
const VOL_TILT: f64 = 0.1;

/// Scenario projector.
pub struct ScenarioProjector {
    horizon: usize,
    window_slope: usize,
}

impl ScenarioProjector {
    /// Create a projector from the projection configuration.
    pub fn new(config: &ProjectionConfig) -> Self {
        Self {
            horizon: config.horizon,
            window_slope: config.window_slope,
        }
    }

    /// Minimum number of points: the trend window plus its starting point.
    pub fn min_points(&self) -> usize {
        self.window_slope + 1
    }

    /// Project the three scenarios.
    ///
    /// Returns Ok(None) when the series is too short for the trend window.
    pub fn project(&self, series: &ComputedSeries) -> Result<Option<ScenarioSet>> {
        let points = &series.points;
        let n = points.len();
        if n < self.min_points() {
            debug!("Projection skipped: {} points, need {}", n, self.min_points());
            return Ok(None);
        }

        let last = &points[n - 1];
        let start = &points[n - 1 - self.window_slope];
        let slope = (last.close - start.close) / self.window_slope as f64;
        let avg_vol = self.average_volatility(&points[n - self.window_slope..])?;

        if !slope.is_finite() || !avg_vol.is_finite() {
            return Err(Error::degenerate(format!(
                "non-finite projection inputs: slope {}, avg_vol {}",
                slope, avg_vol
            )));
        }

        let mut optimistic = Vec::with_capacity(self.horizon);
        let mut neutral = Vec::with_capacity(self.horizon);
        let mut pessimistic = Vec::with_capacity(self.horizon);

        let (mut opt, mut neu, mut pes) = (last.close, last.close, last.close);
        for day in 1..=self.horizon {
            opt += slope * OPTIMISTIC_SLOPE + VOL_TILT * avg_vol;
            neu += slope;
            pes += slope * PESSIMISTIC_SLOPE - VOL_TILT * avg_vol;

            let date = ScenarioSet::date_for(last.date, day);
            optimistic.push(ScenarioPoint {
                day,
                date,
                price: opt,
            });
            neutral.push(ScenarioPoint {
                day,
                date,
                price: neu,
            });
            pessimistic.push(ScenarioPoint {
                day,
                date,
                price: pes,
            });
        }

        debug!(
            "Projected {} days from {:.2}: slope {:.4}, avg_vol {:.6}",
            self.horizon, last.close, slope, avg_vol
        );

        Ok(Some(ScenarioSet {
            last_date: last.date,
            last_price: last.close,
            slope,
            avg_vol,
            optimistic,
            neutral,
            pessimistic,
        }))
    }

    /// Mean rolling volatility over the tail, or the sample std of the tail's
    /// returns when any rolling value is missing.
    fn average_volatility(&self, tail: &[ComputedPoint]) -> Result<f64> {
        let rolling: Option<Vec<f64>> = tail.iter().map(|p| p.volatility).collect();
        if let Some(values) = rolling {
            return Ok(values.iter().mean());
        }

        let returns: Vec<f64> = tail.iter().filter_map(|p| p.ret).collect();
        sample_std(&returns).ok_or_else(|| {
            Error::degenerate(format!(
                "cannot estimate volatility from {} returns",
                returns.len()
            ))
        })
    }
}
