//! Swing state machine and damage resolution
//!
//! A weapon is Idle while `attack_timer == 0` and Swinging otherwise. A
//! directional input on a ready weapon (cooldown elapsed) starts a swing; this
//! is also how a live swing is restarted. While the swing is live, every tick
//! resolves the rotated pattern against all entities. Each entity is hit at
//! most once per swing, however many pattern cells cover it.

use ahash::AHashSet;

use crate::combat::direction::AttackDirection;
use crate::combat::weapons::{Weapon, WeaponSlot};
use crate::core::types::{EntityId, Vec2};
use crate::entity::{EntityKind, EntityRegistry};
use crate::progression::{AwardOutcome, Progress, ProgressionSystem};
use crate::simulation::events::SimulationEvent;

pub struct CombatResolver {
    facing: AttackDirection,
    /// Entities already hit by the current swing
    hit: AHashSet<EntityId>,
    experience_per_enemy_level: u32,
}

impl CombatResolver {
    pub fn new(experience_per_enemy_level: u32) -> Self {
        Self {
            facing: AttackDirection::None,
            hit: AHashSet::new(),
            experience_per_enemy_level,
        }
    }

    pub fn facing(&self) -> AttackDirection {
        self.facing
    }

    pub fn already_hit(&self, id: EntityId) -> bool {
        self.hit.contains(&id)
    }

    /// Both weapon timers count down one frame
    pub fn tick_timers(&self, slot: &mut WeaponSlot) {
        if let Some(weapon) = slot.weapon_mut() {
            weapon.tick();
        }
    }

    /// Start a swing if the input is directional and the weapon is ready
    pub fn try_start_swing(&mut self, slot: &mut WeaponSlot, direction: AttackDirection) -> bool {
        if !direction.is_cardinal() {
            return false;
        }
        let Some(weapon) = slot.weapon_mut() else {
            return false;
        };
        if !weapon.ready() {
            tracing::debug!("{} still cooling down ({} frames)", weapon.name, weapon.cooldown_timer);
            return false;
        }

        weapon.begin_swing();
        self.hit.clear();
        self.facing = direction;
        tracing::debug!("{} swing started facing {:?}", weapon.name, direction);
        true
    }

    /// Resolve one tick of a live swing
    ///
    /// The strike area of each pattern cell is a tile-sized square centered on
    /// the wielder's tile center plus the rotated offset. A hit deals
    /// `weapon.damage * wielder.level`, with the level read at the moment of
    /// the hit. Kills of enemies award experience to the player at once.
    pub fn resolve_swing(
        &mut self,
        registry: &mut EntityRegistry,
        wielder: EntityId,
        weapon: &Weapon,
        tile_size: u32,
        progression: &ProgressionSystem,
        progress: &mut Progress,
    ) -> Vec<SimulationEvent> {
        let mut events = Vec::new();
        if !weapon.is_swinging() {
            return events;
        }
        let origin = match registry.get(wielder) {
            Some(w) if w.is_alive() => w.tile(tile_size).center(tile_size),
            _ => return events,
        };

        let side = tile_size as f32;
        for cell in weapon.attack_pattern.cells() {
            let offset = self.facing.rotate(*cell);
            let center = origin + Vec2::new(offset.dx as f32 * side, offset.dy as f32 * side);
            let left = center.x - side / 2.0;
            let top = center.y - side / 2.0;

            for slot in 0..registry.len() {
                let wielder_level = match registry.get(wielder) {
                    Some(w) => w.level,
                    None => return events,
                };

                let target = &mut registry.entities_mut()[slot];
                if target.is_disposed()
                    || target.id == wielder
                    || target.kind == EntityKind::Item
                    || self.hit.contains(&target.id)
                {
                    continue;
                }
                let p = target.position;
                let inside = p.x >= left && p.x < left + side && p.y >= top && p.y < top + side;
                if !inside {
                    continue;
                }

                self.hit.insert(target.id);
                let damage = (weapon.damage * wielder_level) as i32;
                target.health -= damage;
                let (target_id, kind, level, remaining) =
                    (target.id, target.kind, target.level, target.health);

                events.push(SimulationEvent::EntityDamaged {
                    target: target_id,
                    attacker: wielder,
                    damage,
                    remaining,
                });
                tracing::debug!("{} hit {} for {} ({} left)", weapon.name, target_id, damage, remaining);

                if remaining <= 0 {
                    if kind == EntityKind::Enemy {
                        let amount = self.experience_per_enemy_level * level;
                        self.award_kill(registry, amount, progression, progress, &mut events);
                    }
                    registry.dispose(target_id);
                    events.push(SimulationEvent::EntityKilled {
                        target: target_id,
                        kind,
                        attacker: wielder,
                    });
                }
            }
        }

        events
    }

    fn award_kill(
        &self,
        registry: &mut EntityRegistry,
        amount: u32,
        progression: &ProgressionSystem,
        progress: &mut Progress,
        events: &mut Vec<SimulationEvent>,
    ) {
        let Some(player) = registry.player_mut() else {
            return;
        };
        if player.is_disposed() {
            return;
        }
        let outcome = progression.award_experience(player, progress, amount);
        events.push(SimulationEvent::ExperienceGained {
            amount,
            total: progress.experience,
        });
        if let AwardOutcome::LeveledUp { level, .. } = outcome {
            events.push(SimulationEvent::LevelUp {
                level,
                health: player.health,
            });
        }
    }
}
