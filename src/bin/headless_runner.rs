//! Headless Runner
//!
//! Runs a seeded session with a scripted player and prints a JSON (or text)
//! summary. Useful for balance checks and reproducing runs from a seed.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use tileblade::combat::AttackDirection;
use tileblade::core::config::SimulationConfig;
use tileblade::core::constants::{COIN_SIZE, HEALTH_PICKUP_SIZE};
use tileblade::core::types::Vec2;
use tileblade::entity::EntityKind;
use tileblade::simulation::{Simulation, SimulationEvent};

/// Headless Runner - scripted player sessions for balance checks
#[derive(Parser, Debug)]
#[command(name = "headless_runner")]
#[command(about = "Run a seeded session with a scripted player and print a summary")]
struct Args {
    /// TOML config file (defaults apply to missing keys)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Terrain file to load instead of generating a map
    #[arg(long)]
    map: Option<PathBuf>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Frames to simulate
    #[arg(long, default_value_t = 3600)]
    ticks: u64,

    #[arg(long, default_value_t = 10)]
    enemies: usize,

    #[arg(long, default_value_t = 20)]
    coins: usize,

    #[arg(long, default_value_t = 5)]
    hearts: usize,

    /// Frames between scripted player moves
    #[arg(long, default_value_t = 15)]
    move_every: u64,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Print every event to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize, Default)]
struct RunSummary {
    seed: u64,
    ticks: u64,
    kills: usize,
    swings: usize,
    hits_taken: usize,
    deaths: usize,
    coins: u32,
    level: u32,
    experience: u32,
    final_health: i32,
    enemies_left: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(summary) => print_summary(&summary, &args.format),
        Err(e) => {
            eprintln!("Run failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(args: &Args) -> tileblade::core::error::Result<RunSummary> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load_from_toml(path)?,
        None => SimulationConfig::default(),
    };
    // Determine seed
    let seed = args.seed.or(config.seed).unwrap_or_else(rand::random);
    config.seed = Some(seed);

    let mut sim = Simulation::new(config.clone())?;
    match &args.map {
        Some(path) => sim.load_map(path)?,
        None => sim.generate_map(Some(seed))?,
    }

    sim.populate(args.enemies, EntityKind::Enemy, config.enemy_size, config.enemy_health)?;
    sim.populate(args.coins, EntityKind::Item, COIN_SIZE, 1)?;
    sim.populate(args.hearts, EntityKind::Health, HEALTH_PICKUP_SIZE, 1)?;

    let mut summary = RunSummary {
        seed,
        ..RunSummary::default()
    };

    for _ in 0..args.ticks {
        drive_player(&mut sim, args.move_every)?;

        for event in sim.tick()? {
            if args.verbose {
                eprintln!("  [{}] {:?}", sim.current_tick(), event);
            }
            match event {
                SimulationEvent::SwingStarted { .. } => summary.swings += 1,
                SimulationEvent::EntityKilled {
                    kind: EntityKind::Enemy,
                    ..
                } => summary.kills += 1,
                SimulationEvent::PlayerHit { .. } => summary.hits_taken += 1,
                SimulationEvent::PlayerDied { .. } => summary.deaths += 1,
                _ => {}
            }
        }

        if sim.player_stats().map_or(false, |s| s.disposed) {
            sim.reset_player()?;
        }
    }

    if let Some(stats) = sim.player_stats() {
        summary.coins = stats.coins;
        summary.level = stats.level;
        summary.experience = stats.experience;
        summary.final_health = stats.health;
    }
    summary.ticks = sim.current_tick();
    summary.enemies_left = sim.registry().count_kind(EntityKind::Enemy);
    Ok(summary)
}

/// Scripted player: swing at an adjacent enemy, otherwise walk toward the
/// nearest one every `move_every` frames
fn drive_player(sim: &mut Simulation, move_every: u64) -> tileblade::core::error::Result<()> {
    let Some(stats) = sim.player_stats() else {
        return Ok(());
    };
    if stats.disposed {
        return Ok(());
    }
    let tile = sim.config().tile_size as f32;

    let nearest = sim
        .registry()
        .iter()
        .filter(|e| e.kind == EntityKind::Enemy && e.is_alive())
        .map(|e| e.position - stats.position)
        .min_by(|a, b| a.length().total_cmp(&b.length()));
    let Some(offset) = nearest else {
        return Ok(());
    };

    if offset.length() <= tile * 2.0 {
        sim.trigger_attack(facing_toward(offset));
    } else if sim.current_tick() % move_every.max(1) == 0 {
        let (dx, dy) = match facing_toward(offset) {
            AttackDirection::Up => (0, -1),
            AttackDirection::Down => (0, 1),
            AttackDirection::Left => (-1, 0),
            AttackDirection::Right => (1, 0),
            AttackDirection::None => (0, 0),
        };
        sim.move_player(dx, dy)?;
    }
    Ok(())
}

/// Dominant cardinal axis of an offset
fn facing_toward(offset: Vec2) -> AttackDirection {
    if offset.x.abs() >= offset.y.abs() {
        if offset.x >= 0.0 {
            AttackDirection::Right
        } else {
            AttackDirection::Left
        }
    } else if offset.y >= 0.0 {
        AttackDirection::Down
    } else {
        AttackDirection::Up
    }
}

fn print_summary(summary: &RunSummary, format: &str) {
    match format {
        "text" => {
            println!("Run Summary");
            println!("===========");
            println!("Seed: {}", summary.seed);
            println!("Ticks: {}", summary.ticks);
            println!("Kills: {} ({} swings)", summary.kills, summary.swings);
            println!("Hits taken: {} ({} deaths)", summary.hits_taken, summary.deaths);
            println!("Level: {} ({} xp)", summary.level, summary.experience);
            println!("Coins: {}", summary.coins);
            println!("Final health: {}", summary.final_health);
            println!("Enemies left: {}", summary.enemies_left);
        }
        other => {
            if other != "json" {
                eprintln!("Unknown format '{}', defaulting to json", other);
            }
            match serde_json::to_string_pretty(summary) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("Failed to serialize summary: {}", e),
            }
        }
    }
}
