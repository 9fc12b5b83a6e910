//! Entity registry - arena of live and disposed entities
//!
//! Entities live in a dense vector with an id -> slot index. Phases may flip an
//! entity to disposed but never remove it; physical removal happens only in
//! [`EntityRegistry::cleanup`], which compacts the arena and rebuilds the index
//! once per tick.

use ahash::AHashMap;

use crate::core::error::{GameError, Result};
use crate::core::types::{EntityId, Vec2};
use crate::entity::kind::{Entity, EntityKind};

pub struct EntityRegistry {
    entities: Vec<Entity>,
    index: AHashMap<EntityId, usize>,
    next_id: u64,
    player: Option<EntityId>,
    level_bands: u32,
}

impl EntityRegistry {
    pub fn new(level_bands: u32) -> Self {
        Self {
            entities: Vec::new(),
            index: AHashMap::new(),
            next_id: 1,
            player: None,
            level_bands: level_bands.max(1),
        }
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    fn push(&mut self, entity: Entity) {
        self.index.insert(entity.id, self.entities.len());
        self.entities.push(entity);
    }

    /// Create and admit a new entity
    ///
    /// Enemies get a permanent level from their distance to the live player at
    /// spawn time; every other kind starts at level 1. `max_distance` is the
    /// distance that maps to the top band, normally the grid diagonal.
    pub fn create(
        &mut self,
        kind: EntityKind,
        position: Vec2,
        size: u32,
        health: i32,
        max_distance: f32,
    ) -> Result<EntityId> {
        if size == 0 {
            return Err(GameError::InvalidConfiguration(format!(
                "{} size must be positive",
                kind
            )));
        }
        if max_distance.is_nan() || max_distance <= 0.0 {
            return Err(GameError::InvalidConfiguration(format!(
                "max_distance must be positive (got {})",
                max_distance
            )));
        }
        if kind == EntityKind::Player && self.player.is_some() {
            return Err(GameError::InvalidConfiguration(
                "registry already has a player".into(),
            ));
        }

        let level = match kind {
            EntityKind::Enemy => self.enemy_level(position, max_distance),
            _ => 1,
        };

        let id = self.allocate_id();
        self.push(Entity::new(id, kind, position, size, health, level));
        if kind == EntityKind::Player {
            self.player = Some(id);
        }

        tracing::debug!(
            "Created {} {} at ({:.0}, {:.0}) level {}",
            kind,
            id,
            position.x,
            position.y,
            level
        );
        Ok(id)
    }

    /// Create the player and record its id
    pub fn spawn_player(&mut self, position: Vec2, size: u32, health: i32) -> Result<EntityId> {
        // Player level never depends on distance; any positive scale works
        self.create(EntityKind::Player, position, size, health, 1.0)
    }

    /// Level for an enemy spawned at `position`
    ///
    /// Without a live player there is nothing to measure from, so the enemy
    /// lands in the lowest band.
    fn enemy_level(&self, position: Vec2, max_distance: f32) -> u32 {
        match self.player() {
            Some(player) if player.is_alive() => level_for_distance(
                position.distance(&player.position),
                max_distance,
                self.level_bands,
            ),
            _ => 1,
        }
    }

    /// Bulk admission; an entity whose id is already present replaces it in place
    pub fn add(&mut self, entities: impl IntoIterator<Item = Entity>) {
        for entity in entities {
            self.next_id = self.next_id.max(entity.id.0 + 1);
            if entity.kind == EntityKind::Player && self.player.is_none() {
                self.player = Some(entity.id);
            }
            match self.index.get(&entity.id) {
                Some(&slot) => self.entities[slot] = entity,
                None => self.push(entity),
            }
        }
    }

    /// Soft delete; disposing twice (or an unknown id) changes nothing
    pub fn dispose(&mut self, id: EntityId) -> bool {
        match self.get_mut(id) {
            Some(entity) => entity.dispose(),
            None => false,
        }
    }

    /// Remove disposed entities and compact the arena
    ///
    /// The player is never removed, disposed or not. Returns the number of
    /// entities dropped.
    pub fn cleanup(&mut self) -> usize {
        let before = self.entities.len();
        let player = self.player;
        self.entities
            .retain(|e| e.is_alive() || Some(e.id) == player);

        let removed = before - self.entities.len();
        if removed > 0 {
            self.index = self
                .entities
                .iter()
                .enumerate()
                .map(|(slot, e)| (e.id, slot))
                .collect();
            tracing::debug!("Cleanup removed {} disposed entities", removed);
        }
        removed
    }

    /// AABB overlap test between two entities
    pub fn check_collision(a: &Entity, b: &Entity) -> bool {
        a.collides_with(b)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index.get(&id).map(|&slot| &self.entities[slot])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        match self.index.get(&id) {
            Some(&slot) => Some(&mut self.entities[slot]),
            None => None,
        }
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Mutable view of the arena; entities can change but not be removed
    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    /// Ids of live entities of one kind, in arena order
    pub fn ids_of_kind(&self, kind: EntityKind) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|e| e.kind == kind && e.is_alive())
            .map(|e| e.id)
            .collect()
    }

    pub fn live_count(&self) -> usize {
        self.entities.iter().filter(|e| e.is_alive()).count()
    }

    pub fn count_kind(&self, kind: EntityKind) -> usize {
        self.entities
            .iter()
            .filter(|e| e.kind == kind && e.is_alive())
            .count()
    }

    /// Stored entities, disposed ones included
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn player_id(&self) -> Option<EntityId> {
        self.player
    }

    pub fn player(&self) -> Option<&Entity> {
        self.player.and_then(|id| self.get(id))
    }

    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        match self.player {
            Some(id) => self.get_mut(id),
            None => None,
        }
    }
}

/// Map a spawn distance onto a level band in `1..=bands`
///
/// `floor(distance / max_distance * (bands - 1)) + 1`, clamped. Non-decreasing
/// in `distance`.
pub fn level_for_distance(distance: f32, max_distance: f32, bands: u32) -> u32 {
    let bands = bands.max(1);
    if max_distance.is_nan() || max_distance <= 0.0 || !distance.is_finite() {
        return 1;
    }
    let raw = (distance / max_distance * (bands - 1) as f32).floor();
    let level = if raw <= 0.0 { 1 } else { raw as u32 + 1 };
    level.clamp(1, bands)
}
