//! FIRE Simulation CLI
//!
//! Runs a deterministic full-horizon projection plus a Monte Carlo risk
//! analysis for a profile, either loaded from a JSON file or a built-in
//! demo case.

use anyhow::Context;
use clap::Parser;
use firesim::{
    AssetClass, EngineInput, FireEngine, LiquidityLevel, MonteCarloSimulator,
    PortfolioConfiguration, ProjectionRow, SimulationSettings, UserProfile,
};
use rust_decimal::{Decimal, MathematicalOps};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "firesim", about = "FIRE sustainability simulation")]
struct Args {
    /// JSON file holding an EngineInput (profile + projection rows);
    /// a demo case runs when omitted
    #[arg(long)]
    input: Option<PathBuf>,

    /// Number of Monte Carlo scenarios
    #[arg(long, default_value_t = 1000)]
    simulations: usize,

    /// Seed for bit-reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Disable black swan events
    #[arg(long)]
    no_events: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let input = match &args.input {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str::<EngineInput>(&text)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => demo_input()?,
    };

    println!("FIRE Simulation v0.1.0");
    println!("======================\n");
    println!(
        "Profile: age {} -> FIRE {} -> life {}",
        input.profile.current_age(),
        input.profile.expected_fire_age(),
        input.profile.life_expectancy()
    );
    println!("  Net worth: ${}", input.profile.current_net_worth());
    println!("  Assets: {}", input.profile.portfolio().assets().len());
    println!("  Projection rows: {}\n", input.projection.len());

    // Deterministic run
    let mut engine = FireEngine::new(input.clone());
    let result = engine.calculate();

    println!(
        "{:>4} {:>6} {:>12} {:>12} {:>14} {:>14} {:>12} {:>6}",
        "Age", "Year", "Income", "Expense", "Portfolio", "Net Worth", "Return", "OK"
    );
    println!("{}", "-".repeat(88));
    for state in result.yearly_states.iter().take(30) {
        println!(
            "{:>4} {:>6} {:>12.0} {:>12.0} {:>14.0} {:>14.0} {:>12.0} {:>6}",
            state.age,
            state.year,
            state.income,
            state.expense,
            state.portfolio_value,
            state.net_worth,
            state.investment_return,
            if state.is_sustainable { "yes" } else { "NO" },
        );
    }
    if result.yearly_states.len() > 30 {
        println!("... ({} more years)", result.yearly_states.len() - 30);
    }

    println!("\nDeterministic summary:");
    println!("  FIRE achievable:        {}", result.is_fire_achievable);
    println!("  Net worth at FIRE age:  ${:.0}", result.fire_net_worth);
    println!("  Min net worth after:    ${:.0}", result.min_net_worth_after_fire);
    println!("  Final net worth:        ${:.0}", result.final_net_worth);
    println!("  Min buffer ratio:       {:.2}", result.min_safety_buffer_ratio);
    println!(
        "  Traditional FIRE:       ${:.0} ({})",
        result.traditional_fire_number,
        if result.traditional_fire_achieved {
            "reached"
        } else {
            "not reached"
        }
    );

    // Monte Carlo run
    let settings = SimulationSettings {
        num_simulations: args.simulations,
        include_black_swan_events: !args.no_events,
        ..Default::default()
    };
    let mut simulator = MonteCarloSimulator::new(input, settings)?;
    if let Some(seed) = args.seed {
        simulator = simulator.with_seed(seed);
    }
    let mc = simulator.run_simulation();

    println!("\nMonte Carlo ({} scenarios):", mc.num_simulations);
    println!("  Success rate:           {:.1}%", mc.success_rate * 100.0);
    println!("  Final net worth:        mean ${:.0}, median ${:.0}", mc.final_net_worth.mean, mc.final_net_worth.median);
    println!(
        "  Final net worth p5/p95: ${:.0} / ${:.0}",
        mc.final_net_worth.percentile_5, mc.final_net_worth.percentile_95
    );
    println!(
        "  Minimum net worth:      mean ${:.0}, worst ${:.0}",
        mc.minimum_net_worth.mean, mc.minimum_net_worth.min
    );
    println!(
        "  At confidence:          ${:.0}",
        mc.final_net_worth_at_confidence
    );

    if let Some(analysis) = &mc.black_swan {
        println!("\nBlack swan analysis:");
        println!(
            "  Resilience score:       {:.1}",
            analysis.resilience_score
        );
        println!(
            "  Worst decile:           avg ${:.0}, success {:.1}%",
            analysis.worst_decile_avg_net_worth,
            analysis.worst_decile_success_rate * 100.0
        );
        println!(
            "  Emergency fund:         ${:.0}",
            analysis.recommended_emergency_fund
        );
        if !analysis.event_frequency.is_empty() {
            println!("  Event frequency:");
            for (id, count) in &analysis.event_frequency {
                println!("    {:<24} {}", id.to_string(), count);
            }
        }
    }

    Ok(())
}

/// Built-in demo: mid-30s saver, three-asset portfolio, FIRE at 50
fn demo_input() -> anyhow::Result<EngineInput> {
    let dec = Decimal::from;
    let portfolio = PortfolioConfiguration::new(
        vec![
            AssetClass::new("Cash", dec(10), dec(1), Decimal::ZERO, LiquidityLevel::High)?,
            AssetClass::new("Stocks", dec(60), dec(7), dec(15), LiquidityLevel::Low)?,
            AssetClass::new("Bonds", dec(30), dec(3), dec(5), LiquidityLevel::Medium)?,
        ],
        true,
    )?;
    let profile = UserProfile::new(
        1990,
        2026,
        50,
        Some(65),
        85,
        dec(250_000),
        Decimal::new(3, 2),
        12,
        Decimal::new(2, 2),
        portfolio,
    )?;

    let projection = (profile.current_age()..=profile.life_expectancy())
        .enumerate()
        .map(|(i, age)| {
            let year = profile.as_of_year() + i as i32;
            // Salary until FIRE, small side income after; expenses grow
            // with 3% inflation
            let income = if age < profile.expected_fire_age() {
                dec(100_000) + dec(2_000) * dec(i as i64)
            } else {
                dec(12_000)
            };
            let expense = dec(55_000)
                * Decimal::new(103, 2).powi(i as i64);
            ProjectionRow {
                age,
                year,
                total_income: income,
                total_expense: expense.round_dp(2),
            }
        })
        .collect();

    Ok(EngineInput {
        profile,
        projection,
    })
}
