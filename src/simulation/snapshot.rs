//! Read-only views handed to front ends

use serde::Serialize;

use crate::combat::WeaponKind;
use crate::core::types::{EntityId, TilePos, Vec2};
use crate::entity::{Entity, EntityKind};

/// One entity as a renderer or log sees it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub kind: EntityKind,
    pub name: String,
    pub position: Vec2,
    pub tile: TilePos,
    pub health: i32,
    pub level: u32,
    pub disposed: bool,
}

impl EntitySnapshot {
    pub fn of(entity: &Entity, tile_size: u32) -> Self {
        Self {
            id: entity.id,
            kind: entity.kind,
            name: entity.name.clone(),
            position: entity.position,
            tile: entity.tile(tile_size),
            health: entity.health,
            level: entity.level,
            disposed: entity.is_disposed(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStats {
    pub position: Vec2,
    pub health: i32,
    pub level: u32,
    pub experience: u32,
    pub inventory_count: usize,
    pub coins: u32,
    pub disposed: bool,
    pub weapon: Option<WeaponKind>,
}
