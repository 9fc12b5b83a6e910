//! Tick system - orchestrates one fixed-step frame
//!
//! Each tick runs these phases, always in this order:
//! weapon timers -> queued attack input -> enemy AI -> player invincibility ->
//! pickups -> swing damage -> cleanup.
//!
//! Phases only flag entities as disposed. Removal happens in the final cleanup,
//! so no phase ever sees the entity list shrink under it.

use std::path::Path;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::ai::{can_enter, AiController};
use crate::combat::{AttackDirection, CombatResolver, WeaponCatalog, WeaponKind, WeaponSlot};
use crate::core::config::SimulationConfig;
use crate::core::error::{GameError, Result};
use crate::core::types::{EntityId, Tick, TilePos, Vec2};
use crate::entity::{behavior_for, ContactEffect, Entity, EntityKind, EntityRegistry};
use crate::progression::ProgressionSystem;
use crate::simulation::command::{Command, CommandOutcome};
use crate::simulation::events::SimulationEvent;
use crate::simulation::player::PlayerState;
use crate::simulation::snapshot::{EntitySnapshot, PlayerStats};
use crate::terrain::{TerrainMap, TileGrid, TileType};

/// The frame simulation: terrain, entities, the player and the clock
pub struct Simulation {
    config: SimulationConfig,
    terrain: TerrainMap,
    registry: EntityRegistry,
    player: PlayerState,
    catalog: WeaponCatalog,
    combat: CombatResolver,
    progression: ProgressionSystem,
    /// Attack input waiting for the next tick
    pending_attack: Option<AttackDirection>,
    /// Drives entity placement; terrain has its own seed
    rng: ChaCha8Rng,
    current_tick: Tick,
}

impl Simulation {
    /// Validate the config and spawn the player; no terrain yet
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let mut registry = EntityRegistry::new(config.level_bands);
        registry.spawn_player(config.player_start, config.player_size, config.player_health)?;

        Ok(Self {
            terrain: TerrainMap::new(config.tile_size),
            registry,
            player: PlayerState::new(),
            catalog: WeaponCatalog::with_defaults(),
            combat: CombatResolver::new(config.experience_per_enemy_level),
            progression: ProgressionSystem::from_config(&config),
            pending_attack: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
            current_tick: 0,
            config,
        })
    }

    /// [`Simulation::new`] plus a map generated from the config's seed and size
    pub fn with_generated_map(config: SimulationConfig) -> Result<Self> {
        let mut sim = Self::new(config)?;
        sim.generate_map(sim.config.seed)?;
        Ok(sim)
    }

    // ---- terrain ----

    pub fn generate_map(&mut self, seed: Option<u64>) -> Result<()> {
        self.terrain
            .generate(seed, self.config.grid_width, self.config.grid_height)
    }

    /// Load a terrain file; the current map survives a failed load
    pub fn load_map(&mut self, path: &Path) -> Result<()> {
        self.terrain.load(path)
    }

    pub fn save_map(&self, path: &Path) -> Result<()> {
        self.terrain.save(path)
    }

    /// Install an already built grid
    pub fn install_map(&mut self, grid: TileGrid) -> Result<()> {
        self.terrain.install(grid)
    }

    pub fn tile_at(&self, x: i32, y: i32) -> Result<TileType> {
        self.terrain.tile_at(x, y)
    }

    pub fn change_tile(&mut self, x: i32, y: i32, value: i32) -> Result<()> {
        self.terrain.set_tile(x, y, value)?;
        tracing::debug!("Tile ({}, {}) set to {}", x, y, value);
        Ok(())
    }

    // ---- commands ----

    pub fn execute(&mut self, command: Command) -> Result<CommandOutcome> {
        match command {
            Command::Move { dx, dy } => self.move_player(dx, dy),
            Command::Attack(direction) => Ok(self.trigger_attack(direction)),
            Command::ChangeTile { x, y, tile } => {
                self.change_tile(x, y, tile)?;
                Ok(CommandOutcome::Applied)
            }
            Command::ResetPlayer => {
                self.reset_player()?;
                Ok(CommandOutcome::Applied)
            }
            Command::Populate {
                count,
                kind,
                size,
                health,
            } => Ok(CommandOutcome::Spawned(self.populate(count, kind, size, health)?)),
            Command::Equip(kind) => Ok(self.equip(kind)),
        }
    }

    /// Step the player one tile along a cardinal axis
    ///
    /// Only the sign of `dx`/`dy` matters. The step is refused as a whole when
    /// the destination is off the grid or on water.
    pub fn move_player(&mut self, dx: i32, dy: i32) -> Result<CommandOutcome> {
        let grid = self.terrain.grid()?;
        let speed = self.config.player_speed;

        let Some(player) = self.registry.player_mut() else {
            return Ok(CommandOutcome::Ignored);
        };
        if player.is_disposed() || (dx != 0) == (dy != 0) {
            return Ok(CommandOutcome::Ignored);
        }

        let step = Vec2::new(dx.signum() as f32, dy.signum() as f32) * speed;
        let destination = player.position + step;
        if !can_enter(grid, destination) {
            tracing::debug!(
                "Move to ({:.0}, {:.0}) blocked",
                destination.x,
                destination.y
            );
            return Ok(CommandOutcome::Blocked);
        }

        player.position = destination;
        Ok(CommandOutcome::Applied)
    }

    /// Queue a swing; it starts on the next tick if the weapon is ready
    pub fn trigger_attack(&mut self, direction: AttackDirection) -> CommandOutcome {
        if !self.player_alive() || !direction.is_cardinal() {
            return CommandOutcome::Ignored;
        }
        self.pending_attack = Some(direction);
        CommandOutcome::Applied
    }

    /// Put the player back to its starting state
    ///
    /// The player keeps its id. If the entity is somehow missing from the
    /// registry it is admitted again.
    pub fn reset_player(&mut self) -> Result<()> {
        let fresh = |id: EntityId, config: &SimulationConfig| {
            Entity::new(
                id,
                EntityKind::Player,
                config.player_start,
                config.player_size,
                config.player_health,
                1,
            )
        };

        match self.registry.player_id() {
            Some(id) => match self.registry.get_mut(id) {
                Some(player) => {
                    player.position = self.config.player_start;
                    player.health = self.config.player_health;
                    player.level = 1;
                    player.size = self.config.player_size;
                    player.damage_cooldown = 0;
                    player.revive();
                }
                None => self.registry.add([fresh(id, &self.config)]),
            },
            None => {
                self.registry.spawn_player(
                    self.config.player_start,
                    self.config.player_size,
                    self.config.player_health,
                )?;
            }
        }

        self.player = PlayerState::new();
        self.pending_attack = None;
        tracing::info!("Player reset");
        Ok(())
    }

    /// Spawn up to `count` entities on random passable, unoccupied tiles
    ///
    /// Each lands on the center of its own tile. When fewer free tiles exist
    /// than requested, only that many are spawned.
    pub fn populate(
        &mut self,
        count: usize,
        kind: EntityKind,
        size: u32,
        health: i32,
    ) -> Result<Vec<EntityId>> {
        if kind == EntityKind::Player {
            return Err(GameError::InvalidConfiguration(
                "the player cannot be populated".into(),
            ));
        }
        let grid = self.terrain.grid()?;
        let max_distance = grid.diagonal_pixels();

        let mut free: Vec<TilePos> = grid
            .passable_tiles()
            .into_iter()
            .filter(|tile| !grid.is_occupied(*tile, self.registry.iter()))
            .collect();
        free.shuffle(&mut self.rng);

        if free.len() < count {
            tracing::warn!(
                "Only {} free tiles for {} requested {}s",
                free.len(),
                count,
                kind
            );
        }

        let centers: Vec<Vec2> = free
            .into_iter()
            .take(count)
            .map(|tile| grid.tile_center(tile))
            .collect();

        let mut spawned = Vec::with_capacity(centers.len());
        for center in centers {
            spawned.push(self.registry.create(kind, center, size, health, max_distance)?);
        }
        tracing::debug!("Populated {} x {}", spawned.len(), kind);
        Ok(spawned)
    }

    /// Swap to a carried weapon; only while not swinging
    ///
    /// The remaining cooldown carries over to the new weapon.
    pub fn equip(&mut self, kind: WeaponKind) -> CommandOutcome {
        if !self.player_alive() || !self.player.carries(kind) || self.player.is_attacking() {
            return CommandOutcome::Ignored;
        }
        let Some(mut weapon) = self.catalog.instantiate(kind) else {
            return CommandOutcome::Ignored;
        };
        if let Some(current) = self.player.weapon.weapon() {
            weapon.cooldown_timer = current.cooldown_timer;
        }
        self.player.weapon = WeaponSlot::Armed(weapon);
        tracing::debug!("Equipped {}", kind);
        CommandOutcome::Applied
    }

    // ---- clock ----

    /// Advance one frame
    pub fn tick(&mut self) -> Result<Vec<SimulationEvent>> {
        if !self.terrain.is_loaded() {
            return Err(GameError::UninitializedState);
        }
        let mut events = Vec::new();
        let tile_size = self.config.tile_size;

        // 1. Weapon timers
        self.combat.tick_timers(&mut self.player.weapon);

        // 2. Queued attack input
        if let Some(direction) = self.pending_attack.take() {
            if self.player_alive() && self.combat.try_start_swing(&mut self.player.weapon, direction) {
                if let Some(weapon) = self.player.weapon.kind() {
                    events.push(SimulationEvent::SwingStarted { weapon, direction });
                }
            }
        }

        // 3. Enemy AI
        events.extend(AiController::run(
            &mut self.registry,
            self.terrain.grid()?,
            &mut self.player.invincibility,
            &self.config,
        ));

        // 4. Player status
        self.player.tick_invincibility();

        // 5. Pickups
        self.collect_pickups(&mut events);

        // 6. Swing damage
        if let (Some(player_id), Some(weapon)) = (self.registry.player_id(), self.player.weapon.weapon()) {
            events.extend(self.combat.resolve_swing(
                &mut self.registry,
                player_id,
                weapon,
                tile_size,
                &self.progression,
                &mut self.player.progress,
            ));
        }

        // 8. Cleanup, always last
        let removed = self.registry.cleanup();
        if removed > 0 {
            events.push(SimulationEvent::CleanedUp {
                tick: self.current_tick,
                removed,
            });
        }

        self.current_tick += 1;
        Ok(events)
    }

    /// Run `ticks` frames, collecting every event
    pub fn advance(&mut self, ticks: u64) -> Result<Vec<SimulationEvent>> {
        let mut events = Vec::new();
        for _ in 0..ticks {
            events.extend(self.tick()?);
        }
        Ok(events)
    }

    fn collect_pickups(&mut self, events: &mut Vec<SimulationEvent>) {
        let touched: Vec<(EntityId, ContactEffect)> = match self.registry.player() {
            Some(player) if player.is_alive() => self
                .registry
                .iter()
                .filter(|e| e.kind.is_pickup() && player.collides_with(e))
                .map(|e| (e.id, behavior_for(e.kind).on_contact(e, &self.config)))
                .collect(),
            _ => return,
        };

        for (pickup, effect) in touched {
            match effect {
                ContactEffect::Coins(amount) => {
                    self.player.coins += amount;
                    events.push(SimulationEvent::CoinsCollected {
                        pickup,
                        amount,
                        total: self.player.coins,
                    });
                }
                ContactEffect::Heal(amount) => {
                    if let Some(player) = self.registry.player_mut() {
                        player.health += amount;
                        events.push(SimulationEvent::Healed {
                            pickup,
                            amount,
                            health: player.health,
                        });
                    }
                }
                ContactEffect::None => continue,
            }
            self.registry.dispose(pickup);
        }
    }

    // ---- queries ----

    fn player_alive(&self) -> bool {
        self.registry.player().map_or(false, |p| p.is_alive())
    }

    /// Every stored entity, disposed ones flagged
    pub fn entity_snapshots(&self) -> Vec<EntitySnapshot> {
        self.registry
            .iter()
            .map(|e| EntitySnapshot::of(e, self.config.tile_size))
            .collect()
    }

    pub fn player_stats(&self) -> Option<PlayerStats> {
        let player = self.registry.player()?;
        Some(PlayerStats {
            position: player.position,
            health: player.health,
            level: player.level,
            experience: self.player.progress.experience,
            inventory_count: self.player.inventory.len(),
            coins: self.player.coins,
            disposed: player.is_disposed(),
            weapon: self.player.weapon.kind(),
        })
    }

    pub fn current_tick(&self) -> Tick {
        self.current_tick
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut EntityRegistry {
        &mut self.registry
    }

    pub fn terrain(&self) -> &TerrainMap {
        &self.terrain
    }

    pub fn player_state(&self) -> &PlayerState {
        &self.player
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 10x10 grass, player at the center of tile (5, 5)
    fn sim() -> Simulation {
        let config = SimulationConfig {
            player_start: Vec2::new(176.0, 176.0),
            ..SimulationConfig::seeded(7)
        };
        let mut sim = Simulation::new(config).unwrap();
        sim.install_map(TileGrid::new(10, 10, 32, TileType::Grass).unwrap())
            .unwrap();
        sim
    }

    fn spawn(sim: &mut Simulation, kind: EntityKind, x: f32, y: f32, health: i32) -> EntityId {
        sim.registry_mut()
            .create(kind, Vec2::new(x, y), 20, health, 10_000.0)
            .unwrap()
    }

    fn player(sim: &Simulation) -> &Entity {
        sim.registry().player().unwrap()
    }

    #[test]
    fn test_tick_without_terrain_fails() {
        let mut sim = Simulation::new(SimulationConfig::seeded(1)).unwrap();
        assert!(matches!(sim.tick(), Err(GameError::UninitializedState)));
        assert!(matches!(sim.tile_at(0, 0), Err(GameError::UninitializedState)));
        assert!(matches!(sim.move_player(1, 0), Err(GameError::UninitializedState)));
    }

    #[test]
    fn test_move_one_tile() {
        let mut sim = sim();
        assert_eq!(sim.move_player(1, 0).unwrap(), CommandOutcome::Applied);
        assert_eq!(player(&sim).position, Vec2::new(208.0, 176.0));
        // Magnitude is ignored, direction is kept
        assert_eq!(sim.move_player(0, -3).unwrap(), CommandOutcome::Applied);
        assert_eq!(player(&sim).position, Vec2::new(208.0, 144.0));
    }

    #[test]
    fn test_move_into_water_keeps_position() {
        let mut sim = sim();
        sim.change_tile(6, 5, 1).unwrap();
        let before = player(&sim).position;

        assert_eq!(sim.move_player(1, 0).unwrap(), CommandOutcome::Blocked);
        let after = player(&sim).position;
        assert_eq!(after.x.to_bits(), before.x.to_bits());
        assert_eq!(after.y.to_bits(), before.y.to_bits());
    }

    #[test]
    fn test_move_off_grid_blocked() {
        let mut sim = sim();
        sim.registry_mut().player_mut().unwrap().position = Vec2::new(16.0, 16.0);
        assert_eq!(sim.move_player(-1, 0).unwrap(), CommandOutcome::Blocked);
        assert_eq!(sim.move_player(0, -1).unwrap(), CommandOutcome::Blocked);
    }

    #[test]
    fn test_diagonal_and_zero_moves_ignored() {
        let mut sim = sim();
        assert_eq!(sim.move_player(1, 1).unwrap(), CommandOutcome::Ignored);
        assert_eq!(sim.move_player(0, 0).unwrap(), CommandOutcome::Ignored);
        assert_eq!(player(&sim).position, Vec2::new(176.0, 176.0));
    }

    #[test]
    fn test_disposed_player_commands_are_noops() {
        let mut sim = sim();
        let id = sim.registry().player_id().unwrap();
        sim.registry_mut().dispose(id);

        assert_eq!(sim.move_player(1, 0).unwrap(), CommandOutcome::Ignored);
        assert_eq!(sim.trigger_attack(AttackDirection::Up), CommandOutcome::Ignored);
        assert_eq!(sim.equip(WeaponKind::Pike), CommandOutcome::Ignored);
        // The simulation keeps running
        sim.tick().unwrap();
        assert!(sim.registry().contains(id));
    }

    #[test]
    fn test_swing_damages_on_first_tick() {
        let mut sim = sim();
        let enemy = spawn(&mut sim, EntityKind::Enemy, 176.0, 208.0, 100);
        // Keep the enemy from touching the player this tick
        sim.registry_mut().get_mut(enemy).unwrap().damage_cooldown = 10;

        sim.trigger_attack(AttackDirection::Down);
        let events = sim.tick().unwrap();

        assert!(matches!(events[0], SimulationEvent::SwingStarted { weapon: WeaponKind::Sword, .. }));
        assert_eq!(sim.registry().get(enemy).unwrap().health, 90);
    }

    #[test]
    fn test_kill_is_cleaned_up_same_tick() {
        let mut sim = sim();
        let enemy = spawn(&mut sim, EntityKind::Enemy, 176.0, 208.0, 5);
        sim.registry_mut().get_mut(enemy).unwrap().damage_cooldown = 10;

        sim.trigger_attack(AttackDirection::Down);
        let events = sim.tick().unwrap();

        assert!(!sim.registry().contains(enemy));
        assert_eq!(sim.player_stats().unwrap().experience, 25);
        let cleaned = events
            .iter()
            .position(|e| matches!(e, SimulationEvent::CleanedUp { .. }))
            .unwrap();
        let killed = events
            .iter()
            .position(|e| matches!(e, SimulationEvent::EntityKilled { .. }))
            .unwrap();
        assert!(killed < cleaned);
    }

    #[test]
    fn test_attack_input_consumed_once() {
        let mut sim = sim();
        sim.trigger_attack(AttackDirection::Left);
        sim.tick().unwrap();
        let events = sim.tick().unwrap();
        assert!(!events
            .iter()
            .any(|e| matches!(e, SimulationEvent::SwingStarted { .. })));
    }

    #[test]
    fn test_pickups_collected_and_disposed() {
        let mut sim = sim();
        let coin = spawn(&mut sim, EntityKind::Item, 180.0, 176.0, 1);
        let heart = spawn(&mut sim, EntityKind::Health, 172.0, 180.0, 1);
        let far_coin = spawn(&mut sim, EntityKind::Item, 16.0, 16.0, 1);

        let events = sim.tick().unwrap();

        let stats = sim.player_stats().unwrap();
        assert_eq!(stats.coins, 1);
        assert_eq!(stats.health, 100 + 25);
        assert!(!sim.registry().contains(coin));
        assert!(!sim.registry().contains(heart));
        assert!(sim.registry().contains(far_coin));
        assert!(events
            .iter()
            .any(|e| matches!(e, SimulationEvent::CoinsCollected { total: 1, .. })));
    }

    #[test]
    fn test_contact_grants_invincibility() {
        let mut sim = sim();
        spawn(&mut sim, EntityKind::Enemy, 186.0, 176.0, 100);

        sim.tick().unwrap();
        assert_eq!(player(&sim).health, 90);
        // Set to 20 by the hit, then counted down once in the same tick
        assert_eq!(sim.player_state().invincibility, 19);

        sim.tick().unwrap();
        assert_eq!(player(&sim).health, 90);
    }

    #[test]
    fn test_dead_player_survives_cleanup_and_resets() {
        let mut sim = sim();
        sim.registry_mut().player_mut().unwrap().health = 5;
        spawn(&mut sim, EntityKind::Enemy, 186.0, 176.0, 100);

        let events = sim.tick().unwrap();
        assert!(events
            .iter()
            .any(|e| matches!(e, SimulationEvent::PlayerDied { .. })));
        let stats = sim.player_stats().unwrap();
        assert!(stats.disposed);

        sim.reset_player().unwrap();
        let stats = sim.player_stats().unwrap();
        assert!(!stats.disposed);
        assert_eq!(stats.health, 100);
        assert_eq!(stats.level, 1);
        assert_eq!(stats.position, Vec2::new(176.0, 176.0));
        assert_eq!(stats.weapon, Some(WeaponKind::Sword));
    }

    #[test]
    fn test_populate_uses_free_passable_tiles() {
        let mut sim = sim();
        let mut grid = TileGrid::new(3, 3, 32, TileType::Water).unwrap();
        grid.set_tile(0, 0, 0).unwrap();
        grid.set_tile(2, 2, 3).unwrap();
        grid.set_tile(1, 1, 2).unwrap();
        sim.install_map(grid).unwrap();
        sim.registry_mut().player_mut().unwrap().position = Vec2::new(48.0, 48.0);

        // (1, 1) holds the player, leaving two free tiles
        let spawned = sim.populate(5, EntityKind::Enemy, 20, 50).unwrap();
        assert_eq!(spawned.len(), 2);

        let mut tiles: Vec<TilePos> = spawned
            .iter()
            .map(|id| sim.registry().get(*id).unwrap().tile(32))
            .collect();
        tiles.sort_by_key(|t| (t.x, t.y));
        assert_eq!(tiles, vec![TilePos::new(0, 0), TilePos::new(2, 2)]);

        let first = sim.registry().get(spawned[0]).unwrap();
        assert_eq!(first.position, first.tile(32).center(32));
    }

    #[test]
    fn test_populate_rejects_player_kind() {
        let mut sim = sim();
        assert!(sim.populate(1, EntityKind::Player, 20, 100).is_err());
    }

    #[test]
    fn test_populate_is_seeded() {
        let run = || {
            let mut sim = sim();
            let ids = sim.populate(4, EntityKind::Item, 10, 1).unwrap();
            ids.iter()
                .map(|id| sim.registry().get(*id).unwrap().position)
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_equip_rules() {
        let mut sim = sim();
        assert_eq!(sim.equip(WeaponKind::Hammer), CommandOutcome::Applied);
        assert_eq!(sim.player_stats().unwrap().weapon, Some(WeaponKind::Hammer));

        sim.trigger_attack(AttackDirection::Up);
        sim.tick().unwrap();
        // Mid-swing
        assert_eq!(sim.equip(WeaponKind::Pike), CommandOutcome::Ignored);

        // Swing over (30 frames), hammer cooldown (45) still running
        sim.advance(30).unwrap();
        assert_eq!(sim.equip(WeaponKind::Pike), CommandOutcome::Applied);
        assert!(sim.player_state().weapon.weapon().unwrap().cooldown_timer > 0);
    }

    #[test]
    fn test_execute_dispatch() {
        let mut sim = sim();
        assert_eq!(
            sim.execute(Command::ChangeTile { x: 0, y: 0, tile: 2 }).unwrap(),
            CommandOutcome::Applied
        );
        assert_eq!(sim.tile_at(0, 0).unwrap(), TileType::Mountain);

        let err = sim.execute(Command::ChangeTile { x: 10, y: 0, tile: 2 });
        assert!(matches!(err, Err(GameError::OutOfBounds { .. })));

        match sim
            .execute(Command::Populate {
                count: 3,
                kind: EntityKind::Npc,
                size: 20,
                health: 100,
            })
            .unwrap()
        {
            CommandOutcome::Spawned(ids) => assert_eq!(ids.len(), 3),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_snapshots_include_disposed_flag() {
        let mut sim = sim();
        let npc = spawn(&mut sim, EntityKind::Npc, 16.0, 16.0, 100);
        sim.registry_mut().dispose(npc);

        let snaps = sim.entity_snapshots();
        assert_eq!(snaps.len(), 2);
        assert!(snaps.iter().any(|s| s.id == npc && s.disposed));

        sim.tick().unwrap();
        assert_eq!(sim.entity_snapshots().len(), 1);
        assert_eq!(sim.current_tick(), 1);
    }
}
