//! Batch aggregation — per-run scalars collected into parallel arrays.

use serde::{Deserialize, Serialize};

use crate::path::PathSummary;

/// Scalar summaries of every completed run, as three parallel sequences
/// in run-index order. Built once by the engine, read-only afterward.
///
/// `completed_runs` equals `requested_runs` except when the batch was
/// cancelled mid-flight; statistics are always computed over the actual
/// completed count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationBatch {
    terminal_returns: Vec<f64>,
    max_drawdowns: Vec<f64>,
    win_rates: Vec<f64>,
    requested_runs: usize,
}

impl SimulationBatch {
    pub fn with_capacity(requested_runs: usize) -> Self {
        Self {
            terminal_returns: Vec::with_capacity(requested_runs),
            max_drawdowns: Vec::with_capacity(requested_runs),
            win_rates: Vec::with_capacity(requested_runs),
            requested_runs,
        }
    }

    /// Append one run's summary. Summaries must arrive in run-index order;
    /// the engine guarantees this in both sequential and parallel mode.
    pub fn push(&mut self, summary: &PathSummary) {
        self.terminal_returns.push(summary.terminal_return);
        self.max_drawdowns.push(summary.max_drawdown);
        self.win_rates.push(summary.win_rate);
    }

    /// Collect an ordered sequence of summaries into a batch.
    pub fn from_summaries(requested_runs: usize, summaries: &[PathSummary]) -> Self {
        let mut batch = Self::with_capacity(requested_runs);
        for summary in summaries {
            batch.push(summary);
        }
        batch
    }

    /// Runs the caller asked for (K).
    pub fn requested_runs(&self) -> usize {
        self.requested_runs
    }

    /// Runs that actually completed.
    pub fn completed_runs(&self) -> usize {
        self.terminal_returns.len()
    }

    /// True when cancellation stopped the batch short of the requested K.
    pub fn is_partial(&self) -> bool {
        self.completed_runs() < self.requested_runs
    }

    pub fn terminal_returns(&self) -> &[f64] {
        &self.terminal_returns
    }

    pub fn max_drawdowns(&self) -> &[f64] {
        &self.max_drawdowns
    }

    pub fn win_rates(&self) -> &[f64] {
        &self.win_rates
    }
}
