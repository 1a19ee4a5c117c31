//! Core data types for the volscope system.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single (date, closing price) observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Observation date.
    pub date: NaiveDate,
    /// Closing price.
    pub close: f64,
}

impl PricePoint {
    /// Create a new price point.
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Raw price history for one asset, in the order it was supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetSeries {
    /// Asset name (e.g., "Bitcoin").
    pub name: String,
    /// Price points, possibly unordered.
    pub points: Vec<PricePoint>,
}

impl AssetSeries {
    /// Create a new asset series.
    pub fn new(name: impl Into<String>, points: Vec<PricePoint>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no observations.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// One row of the full calculator output, before cleaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedPoint {
    pub date: NaiveDate,
    pub close: f64,
    /// Fractional change vs. previous close (None for the first point).
    pub ret: Option<f64>,
    /// Rolling sample std of returns (None until the window is full).
    pub volatility: Option<f64>,
    pub ema_short: f64,
    pub ema_long: f64,
}

/// Date-sorted calculator output covering every input point.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComputedSeries {
    pub points: Vec<ComputedPoint>,
}

impl ComputedSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Closing prices in date order.
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// Volatility values of the rows where it is defined.
    pub fn defined_volatility(&self) -> Vec<f64> {
        self.points.iter().filter_map(|p| p.volatility).collect()
    }
}

/// A fully defined analysis row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedRecord {
    pub date: NaiveDate,
    pub close: f64,
    pub ret: f64,
    pub volatility: f64,
    pub ema_short: f64,
    pub ema_long: f64,
    /// True iff `volatility` exceeds the series-wide threshold.
    pub high_volatility: bool,
}

/// Cleaned and labeled series, one record per point with a full window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzedSeries {
    /// Threshold used to label the records (None when empty).
    pub threshold: Option<f64>,
    pub records: Vec<AnalyzedRecord>,
}

impl AnalyzedSeries {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Empty means insufficient data.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }

    /// Number of records flagged as high volatility.
    pub fn high_volatility_count(&self) -> usize {
        self.records.iter().filter(|r| r.high_volatility).count()
    }

    /// Maximal runs of high-volatility records as date spans.
    ///
    /// A flagged record at index `i >= 1` covers `[date[i-1], date[i]]`, so a
    /// run starting at `i` opens at the previous record's date. A flagged
    /// first record has no predecessor and contributes nothing on its own.
    pub fn high_volatility_spans(&self) -> Vec<VolatilitySpan> {
        let mut spans: Vec<VolatilitySpan> = Vec::new();
        let mut open: Option<VolatilitySpan> = None;

        for i in 1..self.records.len() {
            let record = &self.records[i];
            if record.high_volatility {
                match open.as_mut() {
                    Some(span) => span.end = record.date,
                    None => {
                        open = Some(VolatilitySpan {
                            start: self.records[i - 1].date,
                            end: record.date,
                        })
                    }
                }
            } else if let Some(span) = open.take() {
                spans.push(span);
            }
        }
        spans.extend(open);
        spans
    }
}

/// A period of consecutive high-volatility observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolatilitySpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Trade action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    Buy,
    Sell,
}

impl std::fmt::Display for TradeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeAction::Buy => write!(f, "buy"),
            TradeAction::Sell => write!(f, "sell"),
        }
    }
}

/// Why a trade event fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeTrigger {
    /// Entry in a calm regime.
    CalmRegime,
    /// Profitable exit in a turbulent regime.
    TurbulentProfit,
    /// Forced exit at the last observation.
    EndOfSeries,
}

impl std::fmt::Display for TradeTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeTrigger::CalmRegime => write!(f, "calm_regime"),
            TradeTrigger::TurbulentProfit => write!(f, "turbulent_profit"),
            TradeTrigger::EndOfSeries => write!(f, "end_of_series"),
        }
    }
}

/// One entry in the simulation log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeEvent {
    pub date: NaiveDate,
    pub action: TradeAction,
    pub price: f64,
    /// Capital after the event is applied.
    pub capital: f64,
    pub trigger: TradeTrigger,
}

/// One projected price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioPoint {
    /// Day offset from the last observed date (1-based).
    pub day: usize,
    pub date: NaiveDate,
    pub price: f64,
}

/// Three deterministic forward price paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSet {
    pub last_date: NaiveDate,
    pub last_price: f64,
    /// Average daily price change over the trend window.
    pub slope: f64,
    /// Average volatility over the trend window.
    pub avg_vol: f64,
    pub optimistic: Vec<ScenarioPoint>,
    pub neutral: Vec<ScenarioPoint>,
    pub pessimistic: Vec<ScenarioPoint>,
}

impl ScenarioSet {
    /// Projection horizon in days.
    pub fn horizon(&self) -> usize {
        self.neutral.len()
    }

    /// Calendar date for a day offset.
    pub fn date_for(last_date: NaiveDate, day: usize) -> NaiveDate {
        last_date + Duration::days(day as i64)
    }
}
