//! Bootstrap resampling — one with-replacement draw per run.

use rand::rngs::StdRng;
use rand::Rng;

use crate::outcomes::OutcomeSet;

/// Draw `n` outcomes uniformly at random, with replacement.
///
/// Consumes exactly `n` index draws from `rng`, so the output is
/// bit-identical for a fixed (seed, outcome set, n) on any machine.
pub fn resample(outcomes: &OutcomeSet, n: usize, rng: &mut StdRng) -> Vec<f64> {
    let values = outcomes.values();
    let m = values.len();
    debug_assert!(n > 0, "trades_per_sim validated before sampling");

    (0..n).map(|_| values[rng.gen_range(0..m)]).collect()
}
