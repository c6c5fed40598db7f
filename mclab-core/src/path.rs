//! Equity paths and drawdown — pure functions over one run's draws.
//!
//! The curve convention: `curve[0] = 0`, `curve[i] = curve[i-1] +
//! sampled[i-1]`, length N+1. Drawdown at a point is the distance below
//! the running peak, so it is always <= 0 and the max drawdown of a
//! non-decreasing curve is exactly 0.

use serde::{Deserialize, Serialize};

/// Cumulative magnitude beyond which f64 addition loses sub-unit
/// precision (2^53). Runs that cross it are flagged, not failed.
pub const STABLE_MAGNITUDE_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Cumulative equity curve for one run. Length `sampled.len() + 1`,
/// starting at zero.
pub fn equity_curve(sampled: &[f64]) -> Vec<f64> {
    let mut curve = Vec::with_capacity(sampled.len() + 1);
    let mut equity = 0.0;
    curve.push(equity);
    for &outcome in sampled {
        equity += outcome;
        curve.push(equity);
    }
    curve
}

/// `running_max[i] = max(curve[0..=i])`. Non-decreasing by construction.
pub fn running_max(curve: &[f64]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;
    curve
        .iter()
        .map(|&equity| {
            if equity > peak {
                peak = equity;
            }
            peak
        })
        .collect()
}

/// `drawdown[i] = curve[i] - running_max[i]`. Always <= 0.
pub fn drawdowns(curve: &[f64]) -> Vec<f64> {
    let peaks = running_max(curve);
    curve
        .iter()
        .zip(peaks.iter())
        .map(|(&equity, &peak)| equity - peak)
        .collect()
}

/// Most negative drawdown over the curve; 0.0 for a non-decreasing curve.
pub fn max_drawdown(curve: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;
    for &equity in curve {
        if equity > peak {
            peak = equity;
        }
        let dd = equity - peak;
        if dd < max_dd {
            max_dd = dd;
        }
    }
    max_dd
}

/// Scalar summary of one simulated path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathSummary {
    /// Terminal equity, equal to the sum of the run's sampled outcomes.
    pub terminal_return: f64,
    /// Most negative distance below the running peak. <= 0.
    pub max_drawdown: f64,
    /// Fraction of sampled outcomes that are strictly positive.
    pub win_rate: f64,
    /// True if the cumulative sum left the exactly-representable range.
    pub unstable: bool,
}

/// One forward pass over the sampled outcomes: peak, minimum below peak,
/// win count. Never materializes the curve, so streaming mode stays O(1)
/// in N. Accumulation order matches [`equity_curve`], so the summary is
/// bit-identical to one derived from the full curve.
pub fn summarize_path(sampled: &[f64]) -> PathSummary {
    let mut equity = 0.0_f64;
    let mut peak = 0.0_f64;
    let mut max_dd = 0.0_f64;
    let mut wins = 0usize;
    let mut unstable = false;

    for &outcome in sampled {
        equity += outcome;
        if outcome > 0.0 {
            wins += 1;
        }
        if equity > peak {
            peak = equity;
        }
        let dd = equity - peak;
        if dd < max_dd {
            max_dd = dd;
        }
        if equity.abs() >= STABLE_MAGNITUDE_LIMIT {
            unstable = true;
        }
    }

    PathSummary {
        terminal_return: equity,
        max_drawdown: max_dd,
        win_rate: wins as f64 / sampled.len().max(1) as f64,
        unstable,
    }
}
