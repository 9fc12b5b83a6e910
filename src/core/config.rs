//! Simulation configuration with documented constants
//!
//! Every tunable value the core reads lives here. Defaults come from
//! [`crate::core::constants`]; a TOML file may override any subset of them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::constants::*;
use crate::core::error::{GameError, Result};
use crate::core::types::Vec2;

/// Configuration for the simulation systems
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === TERRAIN ===
    /// Edge length of one tile in world pixels
    ///
    /// Every position-to-tile mapping divides by this value, and attack
    /// pattern offsets are scaled by it.
    pub tile_size: u32,

    /// Grid width in tiles
    pub grid_width: u32,

    /// Grid height in tiles
    pub grid_height: u32,

    /// Seed for terrain generation and entity population
    ///
    /// `None` draws a fresh seed; the chosen seed is recorded on the grid so a
    /// run can be reproduced.
    pub seed: Option<u64>,

    // === PLAYER ===
    pub player_size: u32,
    /// Pixels moved per accepted move command
    pub player_speed: f32,
    pub player_start: Vec2,
    pub player_health: i32,
    /// Frames of immunity to contact damage after being hit
    pub invincibility_frames: u32,

    // === ENEMIES ===
    pub enemy_size: u32,
    /// Pixels per tick while pursuing
    pub enemy_speed: f32,
    /// Enemies farther than this (pixels) ignore the player
    pub enemy_aggro_radius: f32,
    /// Contact damage before the enemy level multiplier
    pub enemy_damage: i32,
    /// Frames between two contact hits from the same enemy
    pub enemy_damage_cooldown: u32,
    pub enemy_health: i32,
    /// Number of level bands enemies are sorted into by spawn distance
    pub level_bands: u32,

    // === PICKUPS ===
    pub coin_value: u32,
    pub health_pickup_amount: i32,

    // === PROGRESSION ===
    /// Health added on every level-up
    pub level_up_health_bonus: i32,
    /// Experience for a kill is this times the victim's level
    pub experience_per_enemy_level: u32,
    /// Experience needed to reach level `i + 2` (index 0 is level 2)
    ///
    /// The table ends at the level cap: once the player reaches
    /// `level_thresholds.len() + 1`, experience only accumulates.
    pub level_thresholds: Vec<u32>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            grid_width: DEFAULT_GRID_WIDTH,
            grid_height: DEFAULT_GRID_HEIGHT,
            seed: None,

            player_size: PLAYER_SIZE,
            player_speed: PLAYER_SPEED,
            player_start: Vec2::new(PLAYER_STARTING_POSITION.0, PLAYER_STARTING_POSITION.1),
            player_health: PLAYER_STARTING_HEALTH,
            invincibility_frames: INVINCIBILITY_FRAMES,

            enemy_size: ENEMY_SIZE,
            enemy_speed: ENEMY_SPEED,
            enemy_aggro_radius: ENEMY_AGGRO_RADIUS,
            enemy_damage: ENEMY_DAMAGE,
            enemy_damage_cooldown: ATTACK_DURATION_FRAMES,
            enemy_health: ENEMY_STARTING_HEALTH,
            level_bands: LEVEL_BANDS,

            coin_value: COIN_VALUE,
            health_pickup_amount: HEALTH_PICKUP_AMOUNT,

            level_up_health_bonus: LEVEL_UP_HEALTH_BONUS,
            experience_per_enemy_level: EXPERIENCE_PER_ENEMY_LEVEL,
            // 100, 200, ... 900 for levels 2..=10
            level_thresholds: (1..MAX_PLAYER_LEVEL).map(|n| n * EXPERIENCE_STEP).collect(),
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Parse a config from TOML; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file on disk
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => GameError::NotFound(path.to_path_buf()),
            _ => GameError::Io(e),
        })?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.tile_size == 0 {
            return Err(invalid("tile_size must be positive"));
        }
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(invalid(format!(
                "grid must be at least 1x1 (got {}x{})",
                self.grid_width, self.grid_height
            )));
        }
        if self.player_size == 0 || self.enemy_size == 0 {
            return Err(invalid("entity sizes must be positive"));
        }
        if self.level_bands == 0 {
            return Err(invalid("level_bands must be at least 1"));
        }
        let speeds_ok = self.enemy_speed.is_finite()
            && self.enemy_speed >= 0.0
            && self.player_speed.is_finite()
            && self.player_speed > 0.0;
        if !speeds_ok {
            return Err(invalid("speeds must be finite, player speed positive"));
        }
        if self.player_health <= 0 {
            return Err(invalid("player_health must be positive"));
        }
        if self.level_thresholds.iter().any(|t| *t == 0) {
            return Err(invalid("level thresholds must be positive"));
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> GameError {
    GameError::InvalidConfiguration(message.into())
}
