//! Risk statistics — reductions over the finished batch.
//!
//! Percentiles use linear interpolation between order statistics
//! (rank = p/100 * (K-1) on the ascending sort), applied identically to
//! every metric. VaR at level p is the p-quantile of terminal returns;
//! CVaR is the mean of the tail at or below VaR.

use serde::{Deserialize, Serialize};

use crate::batch::SimulationBatch;
use crate::config::SimulationConfig;

/// Percentiles reported for every metric distribution.
pub const SUMMARY_PERCENTILES: [f64; 5] = [5.0, 25.0, 50.0, 75.0, 95.0];

/// Mean, spread, and the five summary percentiles of one metric across
/// the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSummary {
    pub mean: f64,
    pub std_dev: f64,
    pub p5: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
}

impl DistributionSummary {
    pub fn from_values(values: &[f64]) -> Self {
        let sorted = sorted_ascending(values);
        Self {
            mean: mean_f64(values),
            std_dev: std_dev(values),
            p5: percentile_sorted(&sorted, 5.0),
            p25: percentile_sorted(&sorted, 25.0),
            p50: percentile_sorted(&sorted, 50.0),
            p75: percentile_sorted(&sorted, 75.0),
            p95: percentile_sorted(&sorted, 95.0),
        }
    }
}

/// Probability of max drawdown breaching one configured threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdProbability {
    /// Threshold in outcome units, strictly negative.
    pub threshold: f64,
    /// Fraction of runs whose max drawdown fell strictly below it.
    pub probability: f64,
}

/// VaR and CVaR at one configured tail level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailRisk {
    /// Tail probability level in (0, 1), e.g. 0.05.
    pub level: f64,
    /// Terminal return not undershot with confidence 1 - level.
    pub var: f64,
    /// Mean terminal return over the tail at or below `var`.
    pub cvar: f64,
}

/// Read-only risk/return summary of a finished batch.
///
/// `completed_runs` is the K every probability and percentile was
/// computed over; it differs from `requested_runs` only for a cancelled
/// batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskStatistics {
    pub requested_runs: usize,
    pub completed_runs: usize,
    pub trades_per_sim: usize,
    pub terminal_return: DistributionSummary,
    pub max_drawdown: DistributionSummary,
    pub win_rate: DistributionSummary,
    /// Fraction of runs ending with a strictly positive terminal return.
    pub prob_positive_return: f64,
    /// One entry per configured drawdown threshold, in config order.
    pub drawdown_breach: Vec<ThresholdProbability>,
    /// One entry per configured VaR level, in config order.
    pub tail_risk: Vec<TailRisk>,
}

/// Reduce a finished batch to its risk statistics.
pub fn compute_statistics(
    batch: &SimulationBatch,
    config: &SimulationConfig,
    trades_per_sim: usize,
) -> RiskStatistics {
    let terminals = batch.terminal_returns();
    let drawdowns = batch.max_drawdowns();
    let completed = batch.completed_runs();

    let sorted_terminals = sorted_ascending(terminals);

    let prob_positive_return = if completed == 0 {
        0.0
    } else {
        terminals.iter().filter(|&&r| r > 0.0).count() as f64 / completed as f64
    };

    let drawdown_breach = config
        .drawdown_thresholds
        .iter()
        .map(|&threshold| ThresholdProbability {
            threshold,
            probability: if completed == 0 {
                0.0
            } else {
                drawdowns.iter().filter(|&&dd| dd < threshold).count() as f64 / completed as f64
            },
        })
        .collect();

    let tail_risk = config
        .var_levels
        .iter()
        .map(|&level| {
            let var = percentile_sorted(&sorted_terminals, level * 100.0);
            TailRisk {
                level,
                var,
                cvar: cvar_below(&sorted_terminals, var),
            }
        })
        .collect();

    RiskStatistics {
        requested_runs: batch.requested_runs(),
        completed_runs: completed,
        trades_per_sim,
        terminal_return: DistributionSummary::from_values(terminals),
        max_drawdown: DistributionSummary::from_values(drawdowns),
        win_rate: DistributionSummary::from_values(batch.win_rates()),
        prob_positive_return,
        drawdown_breach,
        tail_risk,
    }
}

/// Per-step percentile curve across a set of retained equity curves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityBand {
    pub percentile: f64,
    pub curve: Vec<f64>,
}

/// Percentile bands {5, 25, 50, 75, 95} across retained equity curves,
/// one value per step. Empty when no curves were retained.
pub fn equity_bands(curves: &[Vec<f64>]) -> Vec<EquityBand> {
    let Some(steps) = curves.first().map(Vec::len) else {
        return Vec::new();
    };

    SUMMARY_PERCENTILES
        .iter()
        .map(|&percentile| {
            let curve = (0..steps)
                .map(|step| {
                    let column = sorted_ascending(
                        &curves.iter().map(|c| c[step]).collect::<Vec<f64>>(),
                    );
                    percentile_sorted(&column, percentile)
                })
                .collect();
            EquityBand { percentile, curve }
        })
        .collect()
}

// ─── Reduction primitives ────────────────────────────────────────────

/// Percentile of a sorted slice using linear interpolation.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n == 1 {
        return sorted[0];
    }
    let rank = (p / 100.0) * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = rank - lo as f64;
    sorted[lo] * (1.0 - frac) + sorted[hi] * frac
}

/// Mean of the ascending-sorted prefix at or below `var`. Falls back to
/// `var` itself when no value qualifies (degenerate batch).
fn cvar_below(sorted: &[f64], var: f64) -> f64 {
    let tail_len = sorted.iter().take_while(|&&v| v <= var).count();
    if tail_len == 0 {
        return var;
    }
    mean_f64(&sorted[..tail_len])
}

pub(crate) fn sorted_ascending(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}

pub(crate) fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
