//! Volatility regime classification.
//!
//! One threshold per series: `mean + sample std` of every defined volatility
//! value. The threshold sees the whole series, later rows included, so the
//! labels are a retrospective classification, not an online signal.

use statrs::statistics::Statistics;
use tracing::debug;
use volscope_core::{AnalyzedRecord, AnalyzedSeries, ComputedSeries};

use crate::volatility::sample_std;

/// Series-wide high/low volatility classifier.
pub struct RegimeClassifier;

impl RegimeClassifier {
    /// Compute the threshold over a volatility column.
    ///
    /// Returns None for an empty column. A single value has no sample std;
    /// its threshold is the value itself.
    pub fn threshold(volatility: &[f64]) -> Option<f64> {
        if volatility.is_empty() {
            return None;
        }
        let mean = volatility.iter().mean();
        let std = sample_std(volatility).unwrap_or(0.0);
        Some(mean + std)
    }

    /// Drop rows without a full window and label the rest.
    pub fn classify(computed: &ComputedSeries) -> AnalyzedSeries {
        let volatility = computed.defined_volatility();
        let threshold = match Self::threshold(&volatility) {
            Some(t) => t,
            None => return AnalyzedSeries::default(),
        };

        let records: Vec<AnalyzedRecord> = computed
            .points
            .iter()
            .filter_map(|p| {
                let volatility = p.volatility?;
                let ret = p.ret?;
                Some(AnalyzedRecord {
                    date: p.date,
                    close: p.close,
                    ret,
                    volatility,
                    ema_short: p.ema_short,
                    ema_long: p.ema_long,
                    high_volatility: volatility > threshold,
                })
            })
            .collect();

        debug!(
            "Classified {} records, threshold {:.6}, {} high-volatility",
            records.len(),
            threshold,
            records.iter().filter(|r| r.high_volatility).count()
        );

        AnalyzedSeries {
            threshold: Some(threshold),
            records,
        }
    }

    /// Recompute the threshold from an analyzed series.
    pub fn threshold_of(series: &AnalyzedSeries) -> Option<f64> {
        let volatility: Vec<f64> = series.records.iter().map(|r| r.volatility).collect();
        Self::threshold(&volatility)
    }
}
