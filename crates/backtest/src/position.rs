//! Position tracking for the trade simulator.
//!
//! Holds at most one long position at a time and compounds realized gains on
//! the current capital.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use volscope_core::{Error, Result, TradeTrigger};

/// An open position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpenPosition {
    /// Entry date.
    pub entry_date: NaiveDate,
    /// Entry price.
    pub entry_price: f64,
}

/// Simulator state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PositionState {
    /// No open position.
    Out,
    /// Holding since the given entry.
    In(OpenPosition),
}

/// Closed trade record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedTrade {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub entry_price: f64,
    pub exit_price: f64,
    /// Gain fraction `(exit - entry) / entry`.
    pub return_frac: f64,
    /// Capital before the exit was applied.
    pub capital_before: f64,
    /// Capital after compounding the gain.
    pub capital_after: f64,
    /// Exit trigger.
    pub trigger: TradeTrigger,
}

impl ClosedTrade {
    /// Whether the trade made money.
    pub fn is_win(&self) -> bool {
        self.return_frac > 0.0
    }
}

/// Position tracker for the simulator.
pub struct PositionTracker {
    /// Current state.
    state: PositionState,
    /// Current capital.
    capital: f64,
    /// Closed trades.
    pub trades: Vec<ClosedTrade>,
}

impl PositionTracker {
    /// Create a new position tracker.
    pub fn new(starting_capital: f64) -> Self {
        Self {
            state: PositionState::Out,
            capital: starting_capital,
            trades: Vec::new(),
        }
    }

    /// Current state.
    pub fn state(&self) -> PositionState {
        self.state
    }

    /// Check if there's an open position.
    pub fn has_position(&self) -> bool {
        matches!(self.state, PositionState::In(_))
    }

    /// Entry price of the open position.
    pub fn entry_price(&self) -> Option<f64> {
        match self.state {
            PositionState::In(pos) => Some(pos.entry_price),
            PositionState::Out => None,
        }
    }

    /// Current capital.
    pub fn capital(&self) -> f64 {
        self.capital
    }

    /// Open a position. Ignored if one is already open.
    pub fn open_position(&mut self, entry_date: NaiveDate, entry_price: f64) -> bool {
        if self.has_position() {
            return false;
        }
        self.state = PositionState::In(OpenPosition {
            entry_date,
            entry_price,
        });
        true
    }

    /// Close the open position and compound the gain on current capital.
    ///
    /// Returns Ok(None) when there is nothing to close. A zero entry price
    /// makes the gain fraction undefined and is reported as an error.
    pub fn close_position(
        &mut self,
        exit_date: NaiveDate,
        exit_price: f64,
        trigger: TradeTrigger,
    ) -> Result<Option<ClosedTrade>> {
        let position = match self.state {
            PositionState::In(pos) => pos,
            PositionState::Out => return Ok(None),
        };

        if position.entry_price == 0.0 {
            return Err(Error::degenerate(format!(
                "zero entry price for position opened on {}",
                position.entry_date
            )));
        }

        let return_frac = (exit_price - position.entry_price) / position.entry_price;
        let capital_before = self.capital;
        let capital_after = capital_before + return_frac * capital_before;
        if !capital_after.is_finite() {
            return Err(Error::degenerate(format!(
                "non-finite capital after exit on {}",
                exit_date
            )));
        }

        let trade = ClosedTrade {
            entry_date: position.entry_date,
            exit_date,
            entry_price: position.entry_price,
            exit_price,
            return_frac,
            capital_before,
            capital_after,
            trigger,
        };

        self.capital = capital_after;
        self.state = PositionState::Out;
        self.trades.push(trade.clone());

        Ok(Some(trade))
    }
}
