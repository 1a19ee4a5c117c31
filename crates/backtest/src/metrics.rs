//! Backtest performance metrics.
//!
//! Summarizes closed trades and the realized capital trajectory.

use chrono::NaiveDate;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use volscope_core::TradeTrigger;

use crate::position::ClosedTrade;

/// Backtest performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeMetrics {
    /// Total number of closed trades.
    pub total_trades: u32,
    /// Number of winning trades.
    pub winning_trades: u32,
    /// Number of losing or flat trades.
    pub losing_trades: u32,
    /// Win rate (0-1).
    pub win_rate: f64,
    /// Total return percentage on starting capital.
    pub total_return_pct: f64,
    /// Average per-trade return percentage.
    pub avg_trade_return_pct: f64,
    /// Best per-trade return percentage.
    pub best_trade_pct: f64,
    /// Worst per-trade return percentage.
    pub worst_trade_pct: f64,
    /// Maximum drawdown of realized capital (absolute).
    pub max_drawdown: f64,
    /// Maximum drawdown percentage.
    pub max_drawdown_pct: f64,
    /// Average holding period in days.
    pub avg_holding_days: f64,
    /// Exits forced at the end of the series.
    pub forced_exits: u32,
    /// Consecutive wins (max).
    pub max_consecutive_wins: u32,
    /// Consecutive losses (max).
    pub max_consecutive_losses: u32,
}

/// Realized capital after each closed trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalPoint {
    /// None for the starting point.
    pub date: Option<NaiveDate>,
    pub capital: f64,
    pub drawdown: f64,
    pub drawdown_pct: f64,
}

/// Metrics calculator.
pub struct MetricsCalculator {
    starting_capital: f64,
}

impl MetricsCalculator {
    /// Create a new metrics calculator.
    pub fn new(starting_capital: f64) -> Self {
        Self { starting_capital }
    }

    /// Calculate metrics from closed trades.
    pub fn calculate(&self, trades: &[ClosedTrade]) -> TradeMetrics {
        if trades.is_empty() {
            return TradeMetrics::default();
        }

        let mut metrics = TradeMetrics {
            total_trades: trades.len() as u32,
            ..Default::default()
        };

        let mut current_wins = 0u32;
        let mut current_losses = 0u32;
        let mut total_days = 0i64;

        for trade in trades {
            total_days += (trade.exit_date - trade.entry_date).num_days();
            if trade.trigger == TradeTrigger::EndOfSeries {
                metrics.forced_exits += 1;
            }

            if trade.is_win() {
                metrics.winning_trades += 1;
                current_wins += 1;
                current_losses = 0;
                metrics.max_consecutive_wins = metrics.max_consecutive_wins.max(current_wins);
            } else {
                metrics.losing_trades += 1;
                current_losses += 1;
                current_wins = 0;
                metrics.max_consecutive_losses = metrics.max_consecutive_losses.max(current_losses);
            }
        }

        let n = trades.len() as f64;
        metrics.win_rate = metrics.winning_trades as f64 / n;
        metrics.avg_trade_return_pct =
            trades.iter().map(|t| t.return_frac).sum::<f64>() / n * 100.0;
        metrics.avg_holding_days = total_days as f64 / n;

        metrics.best_trade_pct = trades
            .iter()
            .map(|t| OrderedFloat(t.return_frac))
            .max()
            .map(|r| r.into_inner() * 100.0)
            .unwrap_or(0.0);
        metrics.worst_trade_pct = trades
            .iter()
            .map(|t| OrderedFloat(t.return_frac))
            .min()
            .map(|r| r.into_inner() * 100.0)
            .unwrap_or(0.0);

        let curve = self.build_capital_curve(trades);
        if let Some(last) = curve.last() {
            metrics.total_return_pct =
                (last.capital - self.starting_capital) / self.starting_capital * 100.0;
        }
        for point in &curve {
            if point.drawdown > metrics.max_drawdown {
                metrics.max_drawdown = point.drawdown;
                metrics.max_drawdown_pct = point.drawdown_pct;
            }
        }

        metrics
    }

    /// Build the realized capital curve from trades.
    pub fn build_capital_curve(&self, trades: &[ClosedTrade]) -> Vec<CapitalPoint> {
        let mut curve = Vec::with_capacity(trades.len() + 1);

        curve.push(CapitalPoint {
            date: None,
            capital: self.starting_capital,
            drawdown: 0.0,
            drawdown_pct: 0.0,
        });

        let mut peak = self.starting_capital;
        for trade in trades {
            let capital = trade.capital_after;
            peak = peak.max(capital);

            let drawdown = peak - capital;
            let drawdown_pct = if peak > 0.0 {
                (drawdown / peak) * 100.0
            } else {
                0.0
            };

            curve.push(CapitalPoint {
                date: Some(trade.exit_date),
                capital,
                drawdown,
                drawdown_pct,
            });
        }

        curve
    }
}
