//! Simulation integration tests
//!
//! Drive the whole frame loop through the public command surface: enemies
//! close in, swings land, kills pay out experience, and the player survives
//! cleanup.

use tileblade::combat::{AttackDirection, WeaponKind};
use tileblade::core::config::SimulationConfig;
use tileblade::core::types::{EntityId, Vec2};
use tileblade::entity::EntityKind;
use tileblade::simulation::{Command, CommandOutcome, Simulation, SimulationEvent};
use tileblade::terrain::{TileGrid, TileType};

/// 16x16 grass arena with the player on the center of tile (8, 8)
fn arena() -> Simulation {
    let config = SimulationConfig {
        player_start: Vec2::new(8.0 * 32.0 + 16.0, 8.0 * 32.0 + 16.0),
        ..SimulationConfig::seeded(11)
    };
    let mut sim = Simulation::new(config).unwrap();
    sim.install_map(TileGrid::new(16, 16, 32, TileType::Grass).unwrap())
        .unwrap();
    sim
}

fn spawn_at_tile(sim: &mut Simulation, kind: EntityKind, tx: i32, ty: i32, health: i32) -> EntityId {
    let position = Vec2::new(tx as f32 * 32.0 + 16.0, ty as f32 * 32.0 + 16.0);
    sim.registry_mut()
        .create(kind, position, 20, health, 1_000.0)
        .unwrap()
}

#[test]
fn test_enemy_walks_into_a_pike() {
    let mut sim = arena();
    assert_eq!(sim.execute(Command::Equip(WeaponKind::Pike)).unwrap(), CommandOutcome::Applied);
    // Four tiles to the right, inside aggro range
    let enemy = spawn_at_tile(&mut sim, EntityKind::Enemy, 12, 8, 15);

    let start = sim.registry().get(enemy).unwrap().position;
    sim.advance(10).unwrap();
    let closer = sim.registry().get(enemy).unwrap().position;
    assert!(closer.x < start.x);
    assert_eq!(closer.y, start.y);

    sim.execute(Command::Attack(AttackDirection::Right)).unwrap();
    let events = sim.tick().unwrap();

    assert!(events.iter().any(|e| matches!(
        e,
        SimulationEvent::EntityKilled { target, kind: EntityKind::Enemy, .. } if *target == enemy
    )));
    assert!(!sim.registry().contains(enemy));
    let stats = sim.player_stats().unwrap();
    assert_eq!(stats.experience, 25);
}

#[test]
fn test_swing_hits_each_enemy_once() {
    let mut sim = arena();
    sim.execute(Command::Equip(WeaponKind::Hammer)).unwrap();
    let targets: Vec<EntityId> = [(8, 9), (7, 10), (9, 11)]
        .iter()
        .map(|&(x, y)| spawn_at_tile(&mut sim, EntityKind::Npc, x, y, 1_000))
        .collect();

    sim.execute(Command::Attack(AttackDirection::Down)).unwrap();
    // Whole swing: 30 frames
    sim.advance(30).unwrap();

    for id in targets {
        assert_eq!(sim.registry().get(id).unwrap().health, 1_000 - 45);
    }
}

#[test]
fn test_level_up_raises_damage() {
    let mut sim = arena();
    // Four level-1 enemies at 25 xp each reach the 100 xp threshold
    for _ in 0..4 {
        let enemy = spawn_at_tile(&mut sim, EntityKind::Enemy, 8, 9, 1);
        sim.registry_mut().get_mut(enemy).unwrap().damage_cooldown = 100;
        sim.execute(Command::Attack(AttackDirection::Down)).unwrap();
        sim.advance(5).unwrap();
        assert!(!sim.registry().contains(enemy));
    }
    let stats = sim.player_stats().unwrap();
    assert_eq!(stats.level, 2);
    assert_eq!(stats.experience, 0);
    assert_eq!(stats.health, 100 + 20);

    let dummy = spawn_at_tile(&mut sim, EntityKind::Npc, 8, 10, 100);
    sim.execute(Command::Attack(AttackDirection::Down)).unwrap();
    sim.tick().unwrap();
    assert_eq!(sim.registry().get(dummy).unwrap().health, 100 - 20);
}

#[test]
fn test_player_death_and_reset() {
    let mut sim = arena();
    sim.registry_mut().player_mut().unwrap().health = 10;
    let enemy = spawn_at_tile(&mut sim, EntityKind::Enemy, 8, 8, 100);

    let events = sim.tick().unwrap();
    assert!(events
        .iter()
        .any(|e| matches!(e, SimulationEvent::PlayerDied { by } if *by == enemy)));

    // Dead player: commands are ignored, ticks keep going, player is kept
    assert_eq!(sim.execute(Command::Move { dx: 1, dy: 0 }).unwrap(), CommandOutcome::Ignored);
    sim.advance(5).unwrap();
    assert!(sim.player_stats().unwrap().disposed);

    sim.execute(Command::ResetPlayer).unwrap();
    let stats = sim.player_stats().unwrap();
    assert!(!stats.disposed);
    assert_eq!(stats.health, 100);
    assert_eq!(stats.coins, 0);
    assert_eq!(stats.inventory_count, 3);
}

#[test]
fn test_walls_of_water_stop_everyone() {
    let mut sim = arena();
    // Water column at x = 9
    for y in 0..16 {
        sim.execute(Command::ChangeTile { x: 9, y, tile: 1 }).unwrap();
    }
    let enemy = spawn_at_tile(&mut sim, EntityKind::Enemy, 10, 8, 100);
    let enemy_start = sim.registry().get(enemy).unwrap().position;

    assert_eq!(sim.execute(Command::Move { dx: 1, dy: 0 }).unwrap(), CommandOutcome::Blocked);
    sim.advance(60).unwrap();

    // Water covers x in [288, 320); the enemy stops on its own side
    let enemy_now = sim.registry().get(enemy).unwrap().position;
    assert!(enemy_now.x >= 10.0 * 32.0);
    assert!(enemy_now.x < enemy_start.x);
    assert_eq!(sim.player_stats().unwrap().health, 100);
}

#[test]
fn test_collecting_coins_across_the_map() {
    let mut sim = arena();
    for x in 9..12 {
        spawn_at_tile(&mut sim, EntityKind::Item, x, 8, 1);
    }
    for _ in 0..3 {
        sim.execute(Command::Move { dx: 1, dy: 0 }).unwrap();
        sim.tick().unwrap();
    }
    let stats = sim.player_stats().unwrap();
    assert_eq!(stats.coins, 3);
    assert_eq!(sim.registry().count_kind(EntityKind::Item), 0);
}

#[test]
fn test_populate_and_snapshot() {
    let mut sim = Simulation::with_generated_map(SimulationConfig::seeded(5)).unwrap();
    let outcome = sim
        .execute(Command::Populate {
            count: 20,
            kind: EntityKind::Enemy,
            size: 20,
            health: 100,
        })
        .unwrap();
    let CommandOutcome::Spawned(ids) = outcome else {
        panic!("expected spawned ids");
    };
    assert_eq!(ids.len(), 20);

    let snaps = sim.entity_snapshots();
    assert_eq!(snaps.len(), 21);
    for snap in snaps.iter().filter(|s| s.kind == EntityKind::Enemy) {
        assert!((1..=6).contains(&snap.level));
        assert_ne!(sim.tile_at(snap.tile.x, snap.tile.y).unwrap(), TileType::Water);
    }

    let json = serde_json::to_string(&snaps).unwrap();
    assert!(json.contains("\"kind\":\"Enemy\""));
}
