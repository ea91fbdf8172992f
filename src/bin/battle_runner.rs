//! Headless Battle Runner
//!
//! Runs a full field battle without a renderer and prints a summary.
//! Stdout carries only the summary; logs and `--verbose` events go to stderr.

use std::path::PathBuf;

use clap::Parser;
use kotf::battle::{BattleOutcome, BattleState, Team};
use kotf::core::config::BattleConfig;
use kotf::core::error::Result;
use serde::Serialize;

/// Headless Battle Runner - two knight formations fight it out
#[derive(Parser, Debug)]
#[command(name = "battle_runner")]
#[command(about = "Run a knight battle to completion and print the result")]
struct Args {
    /// TOML battle config (defaults apply to missing keys)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed, overrides the config
    #[arg(long)]
    seed: Option<u64>,

    /// Knights per side, overrides the config
    #[arg(long)]
    knights: Option<usize>,

    /// Maximum ticks before the battle is called undecided
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Print battle events as they happen
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct BattleResult {
    outcome: BattleOutcome,
    ticks: u64,
    sim_seconds: f32,
    team_a_survivors: usize,
    team_b_survivors: usize,
    team_a_casualties: usize,
    team_b_casualties: usize,
    seed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => BattleConfig::load(path)?,
        None => BattleConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(knights) = args.knights {
        config.knights_per_side = knights;
    }
    if let Some(max_ticks) = args.max_ticks {
        config.max_ticks = max_ticks;
    }

    let mut state = BattleState::from_config(&config)?;

    let mut printed = 0;
    while !state.is_finished() && state.tick < config.max_ticks {
        state.run_tick();

        if args.verbose {
            for event in &state.battle_log[printed..] {
                eprintln!(
                    "  [{} @ {}ms] {:?}: {}",
                    event.tick, event.time_ms, event.event_type, event.description
                );
            }
            printed = state.battle_log.len();
        }
    }

    if !state.is_finished() {
        tracing::warn!(ticks = state.tick, "battle undecided at tick limit");
    }

    let result = BattleResult {
        outcome: state.outcome,
        ticks: state.tick,
        sim_seconds: state.now as f32 / 1000.0,
        team_a_survivors: state.team_a.living_count(),
        team_b_survivors: state.team_b.living_count(),
        team_a_casualties: state.casualties(Team::A),
        team_b_casualties: state.casualties(Team::B),
        seed: state.seed,
    };

    match args.format.as_str() {
        "text" => {
            println!("Battle Result");
            println!("=============");
            println!("Outcome: {:?}", result.outcome);
            println!("Ticks: {} ({:.1}s simulated)", result.ticks, result.sim_seconds);
            println!(
                "Team A: {} standing, {} fallen",
                result.team_a_survivors, result.team_a_casualties
            );
            println!(
                "Team B: {} standing, {} fallen",
                result.team_b_survivors, result.team_b_casualties
            );
            println!("Seed: {}", result.seed);
        }
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        other => {
            eprintln!("Unknown format '{}', defaulting to json", other);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
