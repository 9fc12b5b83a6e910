//! Enemy pursuit - steer toward the player, hurt on contact
//!
//! Enemies close in along the straight line to the player. A step that would
//! leave the grid or end on water is dropped entirely; there is no sliding
//! along the free axis.

use crate::core::config::SimulationConfig;
use crate::core::types::{EntityId, Vec2};
use crate::entity::{behavior_for, Behavior, ContactHit, Entity, EntityKind, EntityRegistry, TargetView};
use crate::simulation::events::SimulationEvent;
use crate::terrain::TileGrid;

/// Pursuit strategy used by enemies
pub struct Pursuit;

impl Behavior for Pursuit {
    fn update(
        &self,
        entity: &mut Entity,
        target: &TargetView,
        grid: &TileGrid,
        config: &SimulationConfig,
    ) -> Option<ContactHit> {
        entity.damage_cooldown = entity.damage_cooldown.saturating_sub(1);

        // Contact is judged on the distance before this tick's step
        let to_target = target.position - entity.position;
        let distance = to_target.length();

        if distance > 0.0 && distance < config.enemy_aggro_radius {
            let destination = entity.position + to_target.normalize() * config.enemy_speed;
            if can_enter(grid, destination) {
                entity.position = destination;
            }
        }

        if distance < entity.size as f32 && entity.damage_cooldown == 0 && target.vulnerable {
            entity.damage_cooldown = config.enemy_damage_cooldown;
            return Some(ContactHit {
                damage: config.enemy_damage * entity.level as i32,
            });
        }
        None
    }
}

/// Inside the grid's pixel area and not on water
pub fn can_enter(grid: &TileGrid, destination: Vec2) -> bool {
    grid.contains_pixel(destination) && grid.is_passable(grid.tile_of(destination))
}

/// Runs every enemy's behavior and applies contact damage to the player
pub struct AiController;

impl AiController {
    /// One AI pass over all enemies
    ///
    /// `invincibility` is the player's immunity countdown; a landed hit resets
    /// it. A player killed here is disposed and the remaining enemies stand
    /// down for the rest of the pass.
    pub fn run(
        registry: &mut EntityRegistry,
        grid: &TileGrid,
        invincibility: &mut u32,
        config: &SimulationConfig,
    ) -> Vec<SimulationEvent> {
        let mut events = Vec::new();
        let Some(player_id) = registry.player_id() else {
            return events;
        };

        for enemy_id in registry.ids_of_kind(EntityKind::Enemy) {
            let target = match registry.player() {
                Some(player) if player.is_alive() => TargetView {
                    position: player.position,
                    vulnerable: *invincibility == 0,
                },
                _ => break,
            };

            let Some(enemy) = registry.get_mut(enemy_id) else {
                continue;
            };
            if enemy.is_disposed() {
                continue;
            }

            let Some(hit) = behavior_for(enemy.kind).update(enemy, &target, grid, config) else {
                continue;
            };
            apply_contact_hit(registry, player_id, enemy_id, hit, invincibility, config, &mut events);
        }

        events
    }
}

fn apply_contact_hit(
    registry: &mut EntityRegistry,
    player_id: EntityId,
    enemy_id: EntityId,
    hit: ContactHit,
    invincibility: &mut u32,
    config: &SimulationConfig,
    events: &mut Vec<SimulationEvent>,
) {
    let Some(player) = registry.get_mut(player_id) else {
        return;
    };
    player.health -= hit.damage;
    *invincibility = config.invincibility_frames;

    let remaining = player.health;
    events.push(SimulationEvent::PlayerHit {
        by: enemy_id,
        damage: hit.damage,
        remaining,
    });
    tracing::debug!("Player hit by {} for {} ({} left)", enemy_id, hit.damage, remaining);

    if remaining <= 0 {
        registry.dispose(player_id);
        events.push(SimulationEvent::PlayerDied { by: enemy_id });
        tracing::info!("Player killed by {}", enemy_id);
    }
}
