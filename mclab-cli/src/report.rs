//! Report printing and artifact writing.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mclab_core::{RetainedRuns, SimProgress, SimulationReport, SimulationWarning};

/// Prints a line every `every` completed runs, like the analysis script
/// this replaces logged every 1000 iterations.
pub struct StdoutProgress {
    every: usize,
}

impl Default for StdoutProgress {
    fn default() -> Self {
        Self { every: 1000 }
    }
}

impl SimProgress for StdoutProgress {
    fn on_run_complete(&self, completed: usize, _total: usize) {
        if completed % self.every == 0 {
            println!("Completed {completed} simulations");
        }
    }

    fn on_batch_complete(&self, completed: usize, total: usize) {
        if completed < total {
            println!("Cancelled after {completed}/{total} simulations");
        }
    }
}

/// Print the full report to stdout, section by section.
pub fn print_report(report: &SimulationReport) {
    let stats = &report.statistics;
    let sample = &report.sample;

    println!();
    println!("{}", "=".repeat(60));
    println!("MONTE CARLO SIMULATION RESULTS");
    println!("{}", "=".repeat(60));
    println!();
    if stats.completed_runs < stats.requested_runs {
        println!(
            "Simulations run: {} (PARTIAL — {} requested)",
            stats.completed_runs, stats.requested_runs
        );
    } else {
        println!("Simulations run: {}", stats.completed_runs);
    }
    println!("Trades per simulation: {}", stats.trades_per_sim);
    println!();

    println!("HISTORICAL SAMPLE:");
    println!("  Trades: {}", sample.count);
    println!("  Mean: {:.3}", sample.mean);
    println!("  Std: {:.3}", sample.std_dev);
    println!("  Min: {:.3}", sample.min);
    println!("  Max: {:.3}", sample.max);
    println!("  Win rate: {:.1}%", sample.win_rate * 100.0);
    println!();

    println!("FINAL RETURN STATISTICS:");
    println!("  Mean: {:.3}", stats.terminal_return.mean);
    println!("  Median: {:.3}", stats.terminal_return.p50);
    println!("  Standard Deviation: {:.3}", stats.terminal_return.std_dev);
    println!("  5th Percentile: {:.3}", stats.terminal_return.p5);
    println!("  95th Percentile: {:.3}", stats.terminal_return.p95);
    println!(
        "  Probability of Positive Return: {:.1}%",
        stats.prob_positive_return * 100.0
    );
    println!();

    println!("DRAWDOWN STATISTICS:");
    println!("  Mean Max Drawdown: {:.3}", stats.max_drawdown.mean);
    println!("  Median Max Drawdown: {:.3}", stats.max_drawdown.p50);
    println!("  5th Percentile (Worst): {:.3}", stats.max_drawdown.p5);
    for breach in &stats.drawdown_breach {
        println!(
            "  Probability of Drawdown < {}: {:.1}%",
            breach.threshold,
            breach.probability * 100.0
        );
    }
    println!();

    println!("RISK METRICS:");
    for tail in &stats.tail_risk {
        let pct = tail.level * 100.0;
        println!("  VaR ({pct}%): {:.3}", tail.var);
        println!("  Expected Shortfall ({pct}%): {:.3}", tail.cvar);
    }

    for warning in &report.warnings {
        match warning {
            SimulationWarning::NumericInstability {
                affected_runs,
                first_run,
            } => println!(
                "\nWARNING: cumulative sums exceeded the stable f64 range in \
                 {affected_runs} run(s), first at run {first_run}"
            ),
        }
    }
}

/// Write the full report as pretty JSON. Returns the artifact path.
pub fn write_results_json(report: &SimulationReport, output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join("monte_carlo_results.json");
    let artifact = serde_json::json!({
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "report": report,
    });
    let json = serde_json::to_string_pretty(&artifact)?;
    std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// Write the retained-curve artifacts for external plotting:
/// `equity_percentiles.csv` (one column per band) and
/// `sample_curves.csv` (long format: run, step, equity).
pub fn write_curve_artifacts(retained: &RetainedRuns, output_dir: &Path) -> Result<()> {
    let bands_path = output_dir.join("equity_percentiles.csv");
    let mut writer = csv::Writer::from_path(&bands_path)
        .with_context(|| format!("writing {}", bands_path.display()))?;

    let mut header = vec!["step".to_string()];
    header.extend(retained.bands.iter().map(|b| format!("p{}", b.percentile)));
    writer.write_record(&header)?;

    let steps = retained.bands.first().map_or(0, |b| b.curve.len());
    for step in 0..steps {
        let mut row = vec![step.to_string()];
        row.extend(retained.bands.iter().map(|b| b.curve[step].to_string()));
        writer.write_record(&row)?;
    }
    writer.flush()?;

    let curves_path = output_dir.join("sample_curves.csv");
    let mut writer = csv::Writer::from_path(&curves_path)
        .with_context(|| format!("writing {}", curves_path.display()))?;
    writer.write_record(["run", "step", "equity"])?;
    for (run, curve) in retained.equity_curves.iter().enumerate() {
        for (step, equity) in curve.iter().enumerate() {
            writer.write_record([run.to_string(), step.to_string(), equity.to_string()])?;
        }
    }
    writer.flush()?;

    Ok(())
}
