//! Backtesting and projection for the volscope system.
//!
//! This crate provides:
//! - The volatility-contrarian trade simulator (calm entry, turbulent exit)
//! - Position state tracking and compounding capital
//! - Trade metrics over the realized capital trajectory
//! - Forward scenario projection from trend and volatility

pub mod position;
pub mod simulator;
pub mod metrics;
pub mod projection;

pub use position::{ClosedTrade, PositionState, PositionTracker};
pub use simulator::{SimulationResult, TradeSimulator};
pub use metrics::{CapitalPoint, MetricsCalculator, TradeMetrics};
pub use projection::ScenarioProjector;
