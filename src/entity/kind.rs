//! The single entity representation shared by every kind

use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, TilePos, Vec2};

/// What an entity is; selects its behavior strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Enemy,
    /// Collectible coin
    Item,
    Npc,
    /// Health pickup
    Health,
}

impl EntityKind {
    /// Disposed on contact with the player
    pub fn is_pickup(&self) -> bool {
        matches!(self, EntityKind::Item | EntityKind::Health)
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "player" => Some(EntityKind::Player),
            "enemy" => Some(EntityKind::Enemy),
            "item" | "coin" => Some(EntityKind::Item),
            "npc" => Some(EntityKind::Npc),
            "health" | "heart" => Some(EntityKind::Health),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntityKind::Player => "Player",
            EntityKind::Enemy => "Enemy",
            EntityKind::Item => "Coin",
            EntityKind::Npc => "NPC",
            EntityKind::Health => "Heart",
        };
        f.write_str(name)
    }
}

/// Liveness state; disposed entities wait for the end-of-tick cleanup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Liveness {
    #[default]
    Alive,
    Disposed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub kind: EntityKind,
    /// Center of the entity in world pixels
    pub position: Vec2,
    /// Edge length of the square bounding box, in pixels
    pub size: u32,
    pub health: i32,
    pub level: u32,
    /// Frames until this entity may deal contact damage again
    pub damage_cooldown: u32,
    state: Liveness,
}

impl Entity {
    pub fn new(
        id: EntityId,
        kind: EntityKind,
        position: Vec2,
        size: u32,
        health: i32,
        level: u32,
    ) -> Self {
        Self {
            id,
            name: format!("{} {}", kind, id),
            kind,
            position,
            size,
            health,
            level: level.max(1),
            damage_cooldown: 0,
            state: Liveness::Alive,
        }
    }

    pub fn state(&self) -> Liveness {
        self.state
    }

    pub fn is_alive(&self) -> bool {
        self.state == Liveness::Alive
    }

    pub fn is_disposed(&self) -> bool {
        self.state == Liveness::Disposed
    }

    /// Tile under the entity's center
    pub fn tile(&self, tile_size: u32) -> TilePos {
        TilePos::from_world(self.position, tile_size)
    }

    /// Soft delete; returns false if the entity was already disposed
    pub fn dispose(&mut self) -> bool {
        if self.is_disposed() {
            return false;
        }
        self.health = 0;
        self.position = Vec2::ZERO;
        self.damage_cooldown = 0;
        self.state = Liveness::Disposed;
        true
    }

    /// Bring a disposed entity back (player reset only)
    pub(crate) fn revive(&mut self) {
        self.state = Liveness::Alive;
    }

    /// Axis-aligned bounding boxes overlap; never true for disposed entities
    ///
    /// Boxes are centered on the position using integer half sizes, and edges
    /// that merely touch do not count.
    pub fn collides_with(&self, other: &Entity) -> bool {
        if self.is_disposed() || other.is_disposed() {
            return false;
        }
        let (a_left, a_top, a_right, a_bottom) = self.bounds();
        let (b_left, b_top, b_right, b_bottom) = other.bounds();

        a_left < b_right && a_right > b_left && a_top < b_bottom && a_bottom > b_top
    }

    fn bounds(&self) -> (f32, f32, f32, f32) {
        let half = (self.size / 2) as f32;
        let left = self.position.x - half;
        let top = self.position.y - half;
        (left, top, left + self.size as f32, top + self.size as f32)
    }
}
