//! Core types and configuration for the volscope system.
//!
//! This crate provides shared types used across all other crates:
//! - Price series types (raw, computed, analyzed)
//! - Simulation and scenario outputs
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::{AnalysisConfig, Config, ProjectionConfig, SimulationConfig};
pub use error::{Error, Result};
pub use types::*;
