//! End-to-end scenarios for the bootstrap engine.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use mclab_core::{
    resample, run_simulation, run_simulation_with, OutcomeSet, Retention, RngHierarchy,
    SimProgress, SimulationConfig,
};

fn mixed_outcomes() -> OutcomeSet {
    OutcomeSet::new(vec![1.0, -1.0, 2.0, -1.0, 3.0]).unwrap()
}

// ── Single hand-checked run ──────────────────────────────────────────

/// One run with a pinned seed: reproduce the sampler's draw, then verify
/// the engine's curve and drawdown against explicit cumulative-sum /
/// running-peak arithmetic done here, independent of the path module.
#[test]
fn single_run_matches_hand_arithmetic() {
    let set = mixed_outcomes();
    let config = SimulationConfig {
        num_simulations: 1,
        trades_per_sim: Some(5),
        seed: 7,
        retention: Retention::Sample { max_curves: 1 },
        parallel: false,
        ..SimulationConfig::default()
    };
    let report = run_simulation(&set, &config).unwrap();

    // The exact draw this seed produces for run 0.
    let mut rng = RngHierarchy::new(7).rng_for_run(0);
    let draw = resample(&set, 5, &mut rng);

    // Manual arithmetic over that draw.
    let mut expected_curve = vec![0.0_f64];
    let mut equity = 0.0_f64;
    let mut peak = 0.0_f64;
    let mut expected_dd = 0.0_f64;
    for &outcome in &draw {
        equity += outcome;
        expected_curve.push(equity);
        if equity > peak {
            peak = equity;
        }
        if equity - peak < expected_dd {
            expected_dd = equity - peak;
        }
    }

    let retained = report.retained.expect("full retention requested");
    assert_eq!(retained.equity_curves.len(), 1);
    assert_eq!(retained.equity_curves[0], expected_curve);
    assert_eq!(retained.batch.terminal_returns(), &[equity]);
    assert_eq!(retained.batch.max_drawdowns(), &[expected_dd]);

    // K = 1: every percentile collapses onto the single observation.
    assert_eq!(report.statistics.terminal_return.p5, equity);
    assert_eq!(report.statistics.terminal_return.p95, equity);
    assert_eq!(report.statistics.max_drawdown.p50, expected_dd);
    assert_eq!(report.statistics.trades_per_sim, 5);
}

// ── Degenerate outcome sets ──────────────────────────────────────────

/// A single always-winning outcome: every curve climbs by exactly that
/// outcome per step and nothing ever draws down.
#[test]
fn always_winning_outcome_never_draws_down() {
    let set = OutcomeSet::new(vec![2.0]).unwrap();
    let config = SimulationConfig {
        num_simulations: 100,
        trades_per_sim: Some(37),
        seed: 11,
        retention: Retention::Sample { max_curves: 10 },
        ..SimulationConfig::default()
    };
    let report = run_simulation(&set, &config).unwrap();
    let stats = &report.statistics;

    assert_eq!(stats.prob_positive_return, 1.0);
    assert_eq!(stats.win_rate.mean, 1.0);
    assert_eq!(stats.max_drawdown.p5, 0.0);
    assert_eq!(stats.max_drawdown.p95, 0.0);
    assert_eq!(stats.terminal_return.p50, 74.0);

    let retained = report.retained.unwrap();
    for curve in &retained.equity_curves {
        for step in curve.windows(2) {
            assert_eq!(step[1] - step[0], 2.0);
        }
    }
}

/// All-losing outcomes: a straight-line decline to exactly -N.
#[test]
fn always_losing_outcomes_decline_to_minus_n() {
    let set = OutcomeSet::new(vec![-1.0, -1.0, -1.0]).unwrap();
    let config = SimulationConfig {
        num_simulations: 50,
        trades_per_sim: Some(20),
        seed: 3,
        ..SimulationConfig::default()
    };
    let report = run_simulation(&set, &config).unwrap();
    let stats = &report.statistics;

    assert_eq!(stats.prob_positive_return, 0.0);
    assert_eq!(stats.win_rate.mean, 0.0);
    assert_eq!(stats.terminal_return.mean, -20.0);
    assert_eq!(stats.terminal_return.std_dev, 0.0);
    assert_eq!(stats.max_drawdown.p5, -20.0);
    assert_eq!(stats.max_drawdown.p95, -20.0);

    // Every configured threshold shallower than -20 is always breached.
    for breach in &stats.drawdown_breach {
        assert_eq!(breach.probability, 1.0, "threshold {}", breach.threshold);
    }
}

// ── Large mixed batch ────────────────────────────────────────────────

#[test]
fn large_mixed_batch_tail_consistency() {
    let set = OutcomeSet::new(vec![2.0, -1.0, 0.5, -0.5, 1.5, -2.0]).unwrap();
    let config = SimulationConfig {
        num_simulations: 10_000,
        seed: 42,
        ..SimulationConfig::default()
    };
    let report = run_simulation(&set, &config).unwrap();
    let stats = &report.statistics;

    assert_eq!(stats.completed_runs, 10_000);

    for tail in &stats.tail_risk {
        assert!(
            tail.cvar <= tail.var,
            "CVaR {} must not exceed VaR {} at level {}",
            tail.cvar,
            tail.var,
            tail.level
        );
    }

    for metric in [&stats.terminal_return, &stats.max_drawdown] {
        assert!(metric.p5 <= metric.p25);
        assert!(metric.p25 <= metric.p50);
        assert!(metric.p50 <= metric.p75);
        assert!(metric.p75 <= metric.p95);
    }

    for pair in stats.drawdown_breach.windows(2) {
        assert!(pair[0].probability >= pair[1].probability);
    }

    // Mixed-sign outcomes with positive expectancy: both tails populated.
    assert!(stats.prob_positive_return > 0.0);
    assert!(stats.prob_positive_return < 1.0);
}

// ── Determinism ──────────────────────────────────────────────────────

#[test]
fn full_report_identical_across_modes_and_invocations() {
    let set = mixed_outcomes();
    let base = SimulationConfig {
        num_simulations: 500,
        seed: 99,
        retention: Retention::Sample { max_curves: 20 },
        ..SimulationConfig::default()
    };
    let sequential = SimulationConfig {
        parallel: false,
        ..base.clone()
    };

    let a = run_simulation(&set, &base).unwrap();
    let b = run_simulation(&set, &base).unwrap();
    let c = run_simulation(&set, &sequential).unwrap();

    assert_eq!(a, b);
    assert_eq!(a, c);
}

// ── Progress and cancellation ────────────────────────────────────────

struct CountingProgress {
    runs: AtomicUsize,
    batches: AtomicUsize,
}

impl SimProgress for CountingProgress {
    fn on_run_complete(&self, _completed: usize, _total: usize) {
        self.runs.fetch_add(1, Ordering::Relaxed);
    }

    fn on_batch_complete(&self, _completed: usize, _total: usize) {
        self.batches.fetch_add(1, Ordering::Relaxed);
    }
}

#[test]
fn progress_observer_sees_every_run() {
    let observer = CountingProgress {
        runs: AtomicUsize::new(0),
        batches: AtomicUsize::new(0),
    };
    let config = SimulationConfig {
        num_simulations: 64,
        ..SimulationConfig::default()
    };
    run_simulation_with(&mixed_outcomes(), &config, &observer, None).unwrap();

    assert_eq!(observer.runs.load(Ordering::Relaxed), 64);
    assert_eq!(observer.batches.load(Ordering::Relaxed), 1);
}

struct CancelAfter {
    after: usize,
    flag: AtomicBool,
}

impl SimProgress for CancelAfter {
    fn on_run_complete(&self, completed: usize, _total: usize) {
        if completed >= self.after {
            self.flag.store(true, Ordering::Relaxed);
        }
    }

    fn on_batch_complete(&self, _completed: usize, _total: usize) {}
}

/// Cancelling mid-batch keeps the completed prefix and labels the
/// statistics with the actual run count.
#[test]
fn cancellation_keeps_partial_batch() {
    let observer = CancelAfter {
        after: 10,
        flag: AtomicBool::new(false),
    };
    let config = SimulationConfig {
        num_simulations: 100,
        parallel: false,
        retention: Retention::Sample { max_curves: 100 },
        ..SimulationConfig::default()
    };
    let report =
        run_simulation_with(&mixed_outcomes(), &config, &observer, Some(&observer.flag)).unwrap();

    assert_eq!(report.statistics.completed_runs, 10);
    assert_eq!(report.statistics.requested_runs, 100);

    let retained = report.retained.unwrap();
    assert!(retained.batch.is_partial());
    assert_eq!(retained.batch.completed_runs(), 10);
    assert_eq!(retained.equity_curves.len(), 10);

    // The kept prefix is exactly what an uncancelled batch would have
    // produced for those run indices.
    let full = run_simulation(&mixed_outcomes(), &config).unwrap();
    let full_retained = full.retained.unwrap();
    assert_eq!(
        &full_retained.batch.terminal_returns()[..10],
        retained.batch.terminal_returns()
    );
    assert_eq!(
        &full_retained.equity_curves[..10],
        &retained.equity_curves[..]
    );
}
