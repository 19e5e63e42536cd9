use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use race_core::config::{Difficulty, SimConfig};
use race_core::maze::Maze;
use race_core::race::{RaceCoordinator, RaceOutcome};
use race_core::types::AgentKind;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

/// Headless race runner: generates a maze, races the full roster to the
/// finish, and prints the standings.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Maze difficulty preset (ignored when --config is given)
    #[arg(long, default_value = "medium", value_parser = parse_difficulty)]
    difficulty: Difficulty,

    /// Agent kind raced as the player
    #[arg(long, default_value = "racer", value_parser = parse_kind)]
    player: AgentKind,

    /// Seed for maze generation and agent behavior; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Simulated milliseconds per tick
    #[arg(long, default_value_t = 16.0)]
    tick_ms: f64,

    /// TOML file overriding the whole simulation configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the standings as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn parse_difficulty(value: &str) -> Result<Difficulty, String> {
    match value {
        "easy" => Ok(Difficulty::Easy),
        "medium" => Ok(Difficulty::Medium),
        "hard" => Ok(Difficulty::Hard),
        other => Err(format!("unknown difficulty `{other}` (easy, medium, hard)")),
    }
}

fn parse_kind(value: &str) -> Result<AgentKind, String> {
    match value {
        "racer" => Ok(AgentKind::Racer),
        "explorer" => Ok(AgentKind::Explorer),
        "snake" => Ok(AgentKind::Snake),
        "stubborn" => Ok(AgentKind::Stubborn),
        "deadender" => Ok(AgentKind::Deadender),
        other => Err(format!(
            "unknown agent kind `{other}` (racer, explorer, snake, stubborn, deadender)"
        )),
    }
}

fn load_config(path: &Path) -> Result<SimConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&text)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

fn run_race(config: SimConfig, player: AgentKind, seed: u64, tick_ms: f64) -> Result<RaceOutcome> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let maze = Maze::generate(&config.maze, &mut rng).context("maze generation failed")?;
    let duration_ms = config.race.duration_ms;

    let mut coordinator = RaceCoordinator::new(maze, config, seed);
    coordinator.create_agents(player);
    coordinator.start_race();

    loop {
        if let Some(outcome) = coordinator.update(tick_ms) {
            return Ok(outcome);
        }
        if coordinator.elapsed_ms() >= duration_ms {
            return Ok(coordinator.force_end_race());
        }
    }
}

fn print_standings(outcome: &RaceOutcome, json: bool) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(&outcome.standings)
            .context("failed to serialize standings")?;
        println!("{text}");
        return Ok(());
    }

    println!("{:<6} {:<12} {:>12} {:>8}", "rank", "kind", "elapsed", "player");
    for record in &outcome.standings {
        println!(
            "{:<6} {:<12} {:>10.0}ms {:>8}",
            record.rank,
            record.kind.name(),
            record.elapsed_ms,
            if record.is_player { "yes" } else { "" },
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => SimConfig::for_difficulty(args.difficulty),
    };
    let seed = args.seed.unwrap_or_else(rand::random);

    println!("seed: {seed}");
    let outcome = run_race(config, args.player, seed, args.tick_ms)?;
    print_standings(&outcome, args.json)
}
