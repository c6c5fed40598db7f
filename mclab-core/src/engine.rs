//! Simulation orchestration — K independent bootstrap runs.
//!
//! Each run draws its own resample with a generator seeded from
//! (base seed, run index), so the batch is bit-identical whether it
//! executes sequentially or on the rayon pool. The engine itself never
//! logs; progress goes through an injected observer.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::batch::SimulationBatch;
use crate::config::{ConfigError, Retention, SimulationConfig};
use crate::outcomes::{OutcomeSet, SampleSummary};
use crate::path::{equity_curve, summarize_path, PathSummary};
use crate::rng::RngHierarchy;
use crate::sampler::resample;
use crate::stats::{compute_statistics, equity_bands, EquityBand, RiskStatistics};

/// Progress observer invoked by the orchestrating loop.
///
/// Implementations decide their own throttling; the engine reports every
/// completed run. In parallel mode completion order is nondeterministic,
/// but the completed count is always accurate.
pub trait SimProgress: Send + Sync {
    /// Called after each run completes.
    fn on_run_complete(&self, completed: usize, total: usize);

    /// Called once after the whole batch is collected.
    fn on_batch_complete(&self, completed: usize, total: usize);
}

/// Observer that ignores all progress.
pub struct NullProgress;

impl SimProgress for NullProgress {
    fn on_run_complete(&self, _completed: usize, _total: usize) {}
    fn on_batch_complete(&self, _completed: usize, _total: usize) {}
}

/// Non-fatal conditions detected during the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SimulationWarning {
    /// Cumulative sums left the exactly-representable f64 range on some
    /// runs. Their statistics are still reported but carry rounding error.
    NumericInstability {
        affected_runs: usize,
        first_run: usize,
    },
}

/// Raw per-run data kept only in full-retention mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetainedRuns {
    /// The three parallel per-run arrays.
    pub batch: SimulationBatch,
    /// Full equity curves for the lowest run indices, up to the
    /// configured cap.
    pub equity_curves: Vec<Vec<f64>>,
    /// Per-step percentile bands across the retained curves.
    pub bands: Vec<EquityBand>,
}

/// Everything a collaborator gets back from one simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub statistics: RiskStatistics,
    /// Descriptive statistics of the historical sample the resamples
    /// were drawn from.
    pub sample: SampleSummary,
    /// Present only in full-retention mode.
    pub retained: Option<RetainedRuns>,
    pub warnings: Vec<SimulationWarning>,
}

struct RunOutput {
    summary: PathSummary,
    curve: Option<Vec<f64>>,
}

fn simulate_run(
    outcomes: &OutcomeSet,
    trades_per_sim: usize,
    hierarchy: &RngHierarchy,
    run_index: usize,
    keep_curve: bool,
) -> RunOutput {
    let mut rng = hierarchy.rng_for_run(run_index as u64);
    let sampled = resample(outcomes, trades_per_sim, &mut rng);
    let summary = summarize_path(&sampled);
    let curve = keep_curve.then(|| equity_curve(&sampled));
    RunOutput { summary, curve }
}

/// Run the full batch with no progress reporting or cancellation.
pub fn run_simulation(
    outcomes: &OutcomeSet,
    config: &SimulationConfig,
) -> Result<SimulationReport, ConfigError> {
    run_simulation_with(outcomes, config, &NullProgress, None)
}

/// Run the full batch with an injected progress observer and an optional
/// cancellation flag.
///
/// Cancellation is checked before each run starts; runs already finished
/// are kept, and the resulting statistics are labeled with the actual
/// completed count.
pub fn run_simulation_with(
    outcomes: &OutcomeSet,
    config: &SimulationConfig,
    progress: &dyn SimProgress,
    cancel: Option<&AtomicBool>,
) -> Result<SimulationReport, ConfigError> {
    config.validate()?;

    let total = config.num_simulations;
    let trades_per_sim = config.resolved_trades_per_sim(outcomes.len());
    let curve_cap = config.retained_curves();
    let hierarchy = RngHierarchy::new(config.seed);

    let cancelled = || cancel.is_some_and(|flag| flag.load(Ordering::Relaxed));

    // `collect` on an indexed parallel iterator preserves run order, so
    // both branches produce outputs in run-index order.
    let outputs: Vec<Option<RunOutput>> = if config.parallel {
        let completed = AtomicUsize::new(0);
        (0..total)
            .into_par_iter()
            .map(|run_index| {
                if cancelled() {
                    return None;
                }
                let output = simulate_run(
                    outcomes,
                    trades_per_sim,
                    &hierarchy,
                    run_index,
                    run_index < curve_cap,
                );
                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                progress.on_run_complete(done, total);
                Some(output)
            })
            .collect()
    } else {
        let mut outputs = Vec::with_capacity(total);
        for run_index in 0..total {
            if cancelled() {
                break;
            }
            outputs.push(Some(simulate_run(
                outcomes,
                trades_per_sim,
                &hierarchy,
                run_index,
                run_index < curve_cap,
            )));
            progress.on_run_complete(outputs.len(), total);
        }
        outputs
    };

    let mut batch = SimulationBatch::with_capacity(total);
    let mut curves: Vec<Vec<f64>> = Vec::new();
    let mut unstable_runs = 0usize;
    let mut first_unstable = 0usize;

    for (run_index, output) in outputs.into_iter().enumerate() {
        let Some(output) = output else { continue };
        if output.summary.unstable {
            if unstable_runs == 0 {
                first_unstable = run_index;
            }
            unstable_runs += 1;
        }
        batch.push(&output.summary);
        if let Some(curve) = output.curve {
            curves.push(curve);
        }
    }

    progress.on_batch_complete(batch.completed_runs(), total);

    let statistics = compute_statistics(&batch, config, trades_per_sim);

    let mut warnings = Vec::new();
    if unstable_runs > 0 {
        warnings.push(SimulationWarning::NumericInstability {
            affected_runs: unstable_runs,
            first_run: first_unstable,
        });
    }

    let retained = match config.retention {
        Retention::Summaries => None,
        Retention::Sample { .. } => Some(RetainedRuns {
            bands: equity_bands(&curves),
            equity_curves: curves,
            batch,
        }),
    };

    Ok(SimulationReport {
        statistics,
        sample: outcomes.summary(),
        retained,
        warnings,
    })
}
