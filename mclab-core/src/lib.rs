//! mclab Core — Monte Carlo bootstrap engine for per-trade outcomes.
//!
//! Estimates the forward-looking risk/return distribution of a trading
//! approach from a finite sample of historical trade results, without
//! assuming any parametric return distribution:
//! - Validated, immutable outcome sets (R-multiples or percentage returns)
//! - With-replacement resampling with hash-derived per-run seeds
//! - Cumulative equity paths with running-peak drawdown tracking
//! - Batch reduction to percentiles, breach probabilities, VaR, and CVaR
//!
//! The engine is pure CPU-bound computation: no I/O, no logging, no
//! global state. Collaborators feed it an [`OutcomeSet`] plus a
//! [`SimulationConfig`] and consume the returned [`SimulationReport`].

pub mod batch;
pub mod config;
pub mod engine;
pub mod outcomes;
pub mod path;
pub mod rng;
pub mod sampler;
pub mod stats;

pub use batch::SimulationBatch;
pub use config::{ConfigError, Retention, SimulationConfig};
pub use engine::{
    run_simulation, run_simulation_with, NullProgress, RetainedRuns, SimProgress,
    SimulationReport, SimulationWarning,
};
pub use outcomes::{OutcomeError, OutcomeSet, SampleSummary};
pub use path::{
    drawdowns, equity_curve, max_drawdown, running_max, summarize_path, PathSummary,
    STABLE_MAGNITUDE_LIMIT,
};
pub use rng::RngHierarchy;
pub use sampler::resample;
pub use stats::{
    compute_statistics, equity_bands, percentile_sorted, DistributionSummary, EquityBand,
    RiskStatistics, TailRisk, ThresholdProbability, SUMMARY_PERCENTILES,
};
