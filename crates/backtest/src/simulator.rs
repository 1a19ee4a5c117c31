//! Trade simulator.
//!
//! Walks an analyzed series in date order with a two-state machine:
//! buy into calm regimes, sell into turbulent ones only at a profit, and
//! force a final sell if still holding when the series ends.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use volscope_core::{
    AnalyzedRecord, AnalyzedSeries, Result, SimulationConfig, TradeAction, TradeEvent,
    TradeTrigger,
};

use crate::metrics::{MetricsCalculator, TradeMetrics};
use crate::position::{ClosedTrade, PositionTracker};

/// Outcome of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub starting_capital: f64,
    /// Buy and sell events in date order.
    pub events: Vec<TradeEvent>,
    /// Round trips, one per sell.
    pub trades: Vec<ClosedTrade>,
    pub final_capital: f64,
    /// `final_capital - starting_capital`.
    pub net_gain: f64,
    pub metrics: TradeMetrics,
}

/// Volatility-contrarian trade simulator.
pub struct TradeSimulator {
    starting_capital: f64,
}

impl TradeSimulator {
    /// Create a simulator from the simulation configuration.
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            starting_capital: config.starting_capital,
        }
    }

    /// Run the simulation over an analyzed series.
    ///
    /// The first record only seeds the state; decisions start at the second.
    /// An empty or single-record series produces no events.
    pub fn run(&self, series: &AnalyzedSeries) -> Result<SimulationResult> {
        let mut tracker = PositionTracker::new(self.starting_capital);
        let mut events = Vec::new();

        for record in series.records.iter().skip(1) {
            if !record.high_volatility {
                if tracker.open_position(record.date, record.close) {
                    debug!("Buy at {:.2} on {} (calm)", record.close, record.date);
                    events.push(event(
                        record,
                        TradeAction::Buy,
                        tracker.capital(),
                        TradeTrigger::CalmRegime,
                    ));
                }
            } else if let Some(entry_price) = tracker.entry_price() {
                if record.close > entry_price {
                    self.sell(&mut tracker, &mut events, record, TradeTrigger::TurbulentProfit)?;
                }
            }
        }

        if tracker.has_position() {
            if let Some(last) = series.records.last() {
                self.sell(&mut tracker, &mut events, last, TradeTrigger::EndOfSeries)?;
            }
        }

        let final_capital = tracker.capital();
        let metrics = MetricsCalculator::new(self.starting_capital).calculate(&tracker.trades);

        info!(
            "Simulation finished: {} events, capital {:.2} -> {:.2}",
            events.len(),
            self.starting_capital,
            final_capital
        );

        Ok(SimulationResult {
            starting_capital: self.starting_capital,
            events,
            trades: tracker.trades,
            final_capital,
            net_gain: final_capital - self.starting_capital,
            metrics,
        })
    }

    fn sell(
        &self,
        tracker: &mut PositionTracker,
        events: &mut Vec<TradeEvent>,
        record: &AnalyzedRecord,
        trigger: TradeTrigger,
    ) -> Result<()> {
        if let Some(trade) = tracker.close_position(record.date, record.close, trigger)? {
            debug!(
                "Sell at {:.2} on {} ({}), capital {:.2}",
                record.close, record.date, trigger, trade.capital_after
            );
            events.push(event(record, TradeAction::Sell, trade.capital_after, trigger));
        }
        Ok(())
    }
}

fn event(
    record: &AnalyzedRecord,
    action: TradeAction,
    capital: f64,
    trigger: TradeTrigger,
) -> TradeEvent {
    TradeEvent {
        date: record.date,
        action,
        price: record.close,
        capital,
        trigger,
    }
}
