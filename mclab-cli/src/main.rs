//! mclab CLI — Monte Carlo bootstrap analysis of exported trades.
//!
//! Commands:
//! - `analyze` — resample a trade export CSV, print the risk report, and
//!   write JSON/CSV artifacts for external plotting

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use mclab_core::{
    run_simulation_with, NullProgress, OutcomeSet, Retention, SimProgress, SimulationConfig,
};

mod report;
mod trades;

#[derive(Parser)]
#[command(
    name = "mclab",
    about = "mclab CLI — bootstrap risk analysis for trade exports"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the Monte Carlo bootstrap over an exported trade history.
    Analyze {
        /// Path to the trades CSV (r_multiple or close_profit column).
        #[arg(long, default_value = "reports/trades_export.csv")]
        trades: PathBuf,

        /// Number of simulation runs.
        #[arg(long, default_value_t = 5000)]
        simulations: usize,

        /// Trades per run. Defaults to the historical trade count.
        #[arg(long)]
        trades_per_sim: Option<usize>,

        /// Base RNG seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Equity curves to retain for the curve artifacts. 0 disables
        /// curve retention entirely (summaries only).
        #[arg(long, default_value_t = 100)]
        curves: usize,

        /// Output directory for result artifacts.
        #[arg(long, default_value = "reports")]
        output_dir: PathBuf,

        /// Run on a single thread.
        #[arg(long, default_value_t = false)]
        sequential: bool,

        /// Suppress progress output.
        #[arg(long, default_value_t = false)]
        quiet: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            trades,
            simulations,
            trades_per_sim,
            seed,
            curves,
            output_dir,
            sequential,
            quiet,
        } => run_analyze(
            trades,
            simulations,
            trades_per_sim,
            seed,
            curves,
            output_dir,
            sequential,
            quiet,
        ),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_analyze(
    trades: PathBuf,
    simulations: usize,
    trades_per_sim: Option<usize>,
    seed: u64,
    curves: usize,
    output_dir: PathBuf,
    sequential: bool,
    quiet: bool,
) -> Result<()> {
    let loaded = trades::load_outcomes(&trades)?;
    if !quiet {
        println!(
            "Loaded {} outcomes from {} (column: {}, skipped: {} open, {} empty)",
            loaded.outcomes.len(),
            trades.display(),
            loaded.column,
            loaded.skipped_open,
            loaded.skipped_empty,
        );
    }

    let outcomes = OutcomeSet::new(loaded.outcomes)?;
    let config = SimulationConfig {
        num_simulations: simulations,
        trades_per_sim,
        seed,
        retention: if curves > 0 {
            Retention::Sample { max_curves: curves }
        } else {
            Retention::Summaries
        },
        parallel: !sequential,
        ..SimulationConfig::default()
    };

    let progress: Box<dyn SimProgress> = if quiet {
        Box::new(NullProgress)
    } else {
        Box::new(report::StdoutProgress::default())
    };
    let sim_report = run_simulation_with(&outcomes, &config, progress.as_ref(), None)?;

    report::print_report(&sim_report);

    std::fs::create_dir_all(&output_dir)?;
    let json_path = report::write_results_json(&sim_report, &output_dir)?;
    println!("\nResults saved to: {}", json_path.display());

    if let Some(retained) = &sim_report.retained {
        report::write_curve_artifacts(retained, &output_dir)?;
        println!(
            "Curve artifacts saved to: {}",
            output_dir.join("equity_percentiles.csv").display()
        );
    }

    Ok(())
}
