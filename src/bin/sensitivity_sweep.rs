//! Sensitivity sweep over the Monte Carlo noise and event parameters
//!
//! Re-runs the demo (or a supplied input) at reduced scenario counts per
//! candidate value and prints one success-rate table per parameter.

use anyhow::Context;
use clap::Parser;
use firesim::{EngineInput, MonteCarloSimulator, SimulationSettings};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "sensitivity_sweep", about = "FIRE sensitivity sweeps")]
struct Args {
    /// JSON file holding an EngineInput (profile + projection rows)
    #[arg(long)]
    input: PathBuf,

    /// Scenario count for the base simulation (each candidate runs N/4)
    #[arg(long, default_value_t = 2000)]
    simulations: usize,

    /// Seed for reproducible sweeps
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let input: EngineInput = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", args.input.display()))?;

    let settings = SimulationSettings {
        num_simulations: args.simulations,
        ..Default::default()
    };
    let simulator = MonteCarloSimulator::new(input, settings)?.with_seed(args.seed);

    let start = Instant::now();
    let baseline = simulator.run_simulation();
    println!(
        "Baseline: {:.1}% success over {} scenarios ({:?})\n",
        baseline.success_rate * 100.0,
        baseline.num_simulations,
        start.elapsed()
    );

    let sweeps: [(&str, Vec<f64>); 3] = [
        ("income_volatility", vec![0.05, 0.10, 0.15, 0.20, 0.30]),
        ("expense_volatility", vec![0.02, 0.05, 0.10, 0.15, 0.20]),
        ("black_swan_probability", vec![0.0, 1.0]),
    ];

    for (parameter, variations) in sweeps {
        let sweep_start = Instant::now();
        let rates = simulator.analyze_sensitivity(parameter, &variations)?;

        println!("{parameter}:");
        println!("{:>12} {:>14}", "value", "success rate");
        for (value, rate) in variations.iter().zip(&rates) {
            println!("{:>12.2} {:>13.1}%", value, rate * 100.0);
        }
        println!("  ({:?})\n", sweep_start.elapsed());
    }

    Ok(())
}
