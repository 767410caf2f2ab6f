//! scratch-trial: run one constrained scratch card trial
//!
//! Usage:
//!   scratch-trial --criteria 0 --sim-id 12
//!   scratch-trial --config game.yaml --mode base --seed 7 --compact

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use rf_scratch::{GameConfig, ScratchEngine};

#[derive(Parser)]
#[command(name = "scratch-trial", about = "Run one scratch card trial and print its book")]
struct Cli {
    /// Game config (JSON or YAML); the built-in scratch card when absent
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bet mode
    #[arg(short, long, default_value = "base")]
    mode: String,

    /// Distribution criteria; picked by quota when absent
    #[arg(long)]
    criteria: Option<String>,

    /// Simulation id
    #[arg(long, default_value_t = 0)]
    sim_id: u64,

    /// RNG seed (defaults to the simulation id)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Single-line JSON
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => GameConfig::scratch_card(),
    };
    let engine = ScratchEngine::new(config).context("invalid game config")?;

    let seed = cli.seed.unwrap_or(cli.sim_id);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    log::info!(
        "Running sim {} on '{}' (mode {}, seed {})",
        cli.sim_id,
        engine.config().game_id,
        cli.mode,
        seed
    );

    let book = match &cli.criteria {
        Some(criteria) => engine.run_trial(cli.sim_id, &cli.mode, criteria, &mut rng)?,
        None => engine.run_quota(cli.sim_id, &cli.mode, &mut rng)?,
    };
    if book.budget_exhausted {
        log::warn!(
            "Sim {} kept a forced outcome after {} attempts",
            book.id,
            book.attempts
        );
    }

    println!("{}", book.to_json(!cli.compact)?);
    Ok(())
}
