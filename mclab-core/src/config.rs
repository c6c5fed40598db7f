//! Simulation configuration and validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How much per-run data the engine retains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Retention {
    /// Keep only the three scalar summaries per run. O(K) memory
    /// regardless of trades per simulation.
    Summaries,

    /// Additionally keep full equity curves for the first `max_curves`
    /// run indices, for visualization consumers. O(max_curves * N) extra.
    Sample { max_curves: usize },
}

/// Configuration for a Monte Carlo bootstrap simulation.
///
/// Defaults match the historical analysis script this engine replaces:
/// 5000 simulations, one resample per historical trade count, drawdown
/// thresholds at -3/-5/-10 R, VaR at 5% and 1%.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of bootstrap runs (K).
    pub num_simulations: usize,
    /// Trades drawn per run (N). `None` means the size of the outcome set.
    pub trades_per_sim: Option<usize>,
    /// Base RNG seed. Per-run sub-seeds are derived from it.
    pub seed: u64,
    /// Drawdown breach thresholds, each strictly negative, in the same
    /// unit as the outcomes.
    pub drawdown_thresholds: Vec<f64>,
    /// Tail probability levels for VaR/CVaR, each in (0, 1).
    pub var_levels: Vec<f64>,
    /// Per-run data retention mode.
    pub retention: Retention,
    /// Run the batch on the rayon thread pool. Results are bit-identical
    /// either way; sequential mode exists for constrained environments.
    pub parallel: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_simulations: 5000,
            trades_per_sim: None,
            seed: 42,
            drawdown_thresholds: vec![-3.0, -5.0, -10.0],
            var_levels: vec![0.05, 0.01],
            retention: Retention::Summaries,
            parallel: true,
        }
    }
}

/// Errors raised by [`SimulationConfig::validate`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("num_simulations must be positive")]
    ZeroSimulations,
    #[error("trades_per_sim must be positive")]
    ZeroTradesPerSim,
    #[error("VaR level {0} is outside (0, 1)")]
    VarLevelOutOfRange(f64),
    #[error("drawdown threshold {0} must be a finite negative number")]
    InvalidDrawdownThreshold(f64),
}

impl SimulationConfig {
    /// Check every recognized option against its contract.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_simulations == 0 {
            return Err(ConfigError::ZeroSimulations);
        }
        if self.trades_per_sim == Some(0) {
            return Err(ConfigError::ZeroTradesPerSim);
        }
        for &level in &self.var_levels {
            if !level.is_finite() || level <= 0.0 || level >= 1.0 {
                return Err(ConfigError::VarLevelOutOfRange(level));
            }
        }
        for &threshold in &self.drawdown_thresholds {
            if !threshold.is_finite() || threshold >= 0.0 {
                return Err(ConfigError::InvalidDrawdownThreshold(threshold));
            }
        }
        Ok(())
    }

    /// Resolve `trades_per_sim` against the outcome-set size M.
    pub fn resolved_trades_per_sim(&self, outcome_count: usize) -> usize {
        self.trades_per_sim.unwrap_or(outcome_count)
    }

    /// Number of full equity curves the engine should keep.
    pub fn retained_curves(&self) -> usize {
        match self.retention {
            Retention::Summaries => 0,
            Retention::Sample { max_curves } => max_curves,
        }
    }
}
