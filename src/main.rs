//! Tileblade - Entry Point
//!
//! Interactive console around the frame simulation. Generates a map, spawns a
//! starting population, then reads commands from stdin. An optional first
//! argument names a TOML config file.

use std::io::{self, Write};
use std::path::Path;

use tileblade::core::config::SimulationConfig;
use tileblade::core::error::Result;
use tileblade::entity::EntityKind;
use tileblade::simulation::{Command, CommandOutcome, Simulation, SimulationEvent};
use tileblade::terrain::TileType;

fn main() -> Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter("tileblade=info")
        .init();

    tracing::info!("Tileblade starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::load_from_toml(Path::new(&path))?,
        None => SimulationConfig::default(),
    };

    let mut sim = Simulation::with_generated_map(config)?;
    spawn_initial_population(&mut sim)?;

    println!("\n=== TILEBLADE ===");
    println!("A tile-grid action RPG, one frame at a time");
    println!();
    println!("Commands:");
    println!("  tick / t               - Advance one frame");
    println!("  run <n>                - Advance n frames");
    println!("  w / a / s / d          - Move one tile");
    println!("  attack <dir>           - Swing toward up/down/left/right");
    println!("  equip <weapon>         - sword, hammer or pike");
    println!("  populate <n> <kind>    - Spawn enemy/coin/heart/npc on free tiles");
    println!("  tile <x> <y> <type>    - Set a tile (0 grass, 1 water, 2 mountain, 3 forest)");
    println!("  reset                  - Reset the player");
    println!("  map                    - Draw the map around the player");
    println!("  status                 - Show all entities");
    println!("  load <path> / save <path>");
    println!("  quit / q               - Exit");
    println!();

    loop {
        display_status(&sim);

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input == "quit" || input == "q" {
            break;
        }

        if input == "tick" || input == "t" {
            match sim.tick() {
                Ok(events) => print_events(&events),
                Err(e) => println!("Tick failed: {}", e),
            }
            continue;
        }

        if let Some(arg) = input.strip_prefix("run ") {
            match arg.trim().parse::<u64>() {
                Ok(n) => match sim.advance(n) {
                    Ok(events) => {
                        print_events(&events);
                        println!("Completed {} frames. Now at tick {}.", n, sim.current_tick());
                    }
                    Err(e) => println!("Run failed: {}", e),
                },
                Err(_) => println!("Usage: run <number>"),
            }
            continue;
        }

        if input == "status" {
            display_detailed_status(&sim);
            continue;
        }

        if input == "map" {
            draw_map(&sim);
            continue;
        }

        if let Some(path) = input.strip_prefix("load ") {
            match sim.load_map(Path::new(path.trim())) {
                Ok(()) => println!("Loaded {}", path.trim()),
                Err(e) => println!("Load failed: {}", e),
            }
            continue;
        }

        if let Some(path) = input.strip_prefix("save ") {
            match sim.save_map(Path::new(path.trim())) {
                Ok(()) => println!("Saved {}", path.trim()),
                Err(e) => println!("Save failed: {}", e),
            }
            continue;
        }

        let config = sim.config();
        let Some(command) = Command::parse(input, config.enemy_size, config.enemy_health) else {
            println!("Unknown command. Type one of the commands listed above.");
            continue;
        };

        match sim.execute(command) {
            Ok(CommandOutcome::Applied) => {}
            Ok(CommandOutcome::Blocked) => println!("Blocked."),
            Ok(CommandOutcome::Ignored) => println!("Nothing happens."),
            Ok(CommandOutcome::Spawned(ids)) => println!("Spawned {} entities", ids.len()),
            Err(e) => println!("Command failed: {}", e),
        }
    }

    if let Some(stats) = sim.player_stats() {
        println!(
            "\nGoodbye! Level {} with {} coins after {} ticks.",
            stats.level,
            stats.coins,
            sim.current_tick()
        );
    }
    Ok(())
}

/// Scatter a few of each kind so there is something to do
fn spawn_initial_population(sim: &mut Simulation) -> Result<()> {
    let config = sim.config().clone();
    sim.populate(8, EntityKind::Enemy, config.enemy_size, config.enemy_health)?;
    sim.populate(12, EntityKind::Item, tileblade::core::constants::COIN_SIZE, 1)?;
    sim.populate(4, EntityKind::Health, tileblade::core::constants::HEALTH_PICKUP_SIZE, 1)?;
    tracing::info!("Spawned initial population");
    Ok(())
}

fn print_events(events: &[SimulationEvent]) {
    for event in events {
        match event {
            SimulationEvent::CleanedUp { .. } => {}
            other => println!("  {:?}", other),
        }
    }
}

/// Display a brief status summary
fn display_status(sim: &Simulation) {
    println!();
    match sim.player_stats() {
        Some(stats) => {
            let state = if stats.disposed { " (dead - type reset)" } else { "" };
            println!(
                "--- Tick {} | HP {} | Lv {} ({} xp) | {} coins | {:?}{} ---",
                sim.current_tick(),
                stats.health,
                stats.level,
                stats.experience,
                stats.coins,
                stats.weapon,
                state
            );
        }
        None => println!("--- Tick {} | no player ---", sim.current_tick()),
    }
}

/// Display every entity
fn display_detailed_status(sim: &Simulation) {
    println!();
    println!("=== Entities (Tick {}) ===", sim.current_tick());
    for snap in sim.entity_snapshots() {
        println!(
            "  {:<12} {:>6} tile ({:>2}, {:>2}) hp {:>4} lv {}{}",
            snap.name,
            snap.kind.to_string(),
            snap.tile.x,
            snap.tile.y,
            snap.health,
            snap.level,
            if snap.disposed { " [disposed]" } else { "" }
        );
    }
}

/// ASCII view of the tiles around the player
fn draw_map(sim: &Simulation) {
    const RADIUS: i32 = 8;
    let Some(stats) = sim.player_stats() else {
        return;
    };
    let tile_size = sim.config().tile_size;
    let center = tileblade::core::types::TilePos::from_world(stats.position, tile_size);
    let snapshots = sim.entity_snapshots();

    for y in center.y - RADIUS..=center.y + RADIUS {
        let row: String = (center.x - RADIUS..=center.x + RADIUS)
            .map(|x| {
                let occupant = snapshots
                    .iter()
                    .find(|s| !s.disposed && s.tile.x == x && s.tile.y == y);
                match occupant.map(|s| s.kind) {
                    Some(EntityKind::Player) => '@',
                    Some(EntityKind::Enemy) => 'E',
                    Some(EntityKind::Item) => '$',
                    Some(EntityKind::Health) => '+',
                    Some(EntityKind::Npc) => 'N',
                    None => match sim.tile_at(x, y) {
                        Ok(TileType::Grass) => '.',
                        Ok(TileType::Water) => '~',
                        Ok(TileType::Mountain) => '^',
                        Ok(TileType::Forest) => '*',
                        Err(_) => ' ',
                    },
                }
            })
            .collect();
        println!("  {}", row);
    }
}
