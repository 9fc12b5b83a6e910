//! Game constants - all tunable defaults in one place
//!
//! Distances are world pixels, durations are frames (ticks).

// Grid scale
pub const TILE_SIZE: u32 = 32;
pub const DEFAULT_GRID_WIDTH: u32 = 60; // 1920 px
pub const DEFAULT_GRID_HEIGHT: u32 = 34; // 1088 px

// Time
pub const FPS: u32 = 60;
pub const ATTACK_DURATION_FRAMES: u32 = 30;

// Player
pub const PLAYER_SIZE: u32 = 20;
pub const PLAYER_SPEED: f32 = TILE_SIZE as f32; // one tile per move command
pub const PLAYER_STARTING_POSITION: (f32, f32) = (200.0, 200.0);
pub const PLAYER_STARTING_HEALTH: i32 = 100;
pub const INVINCIBILITY_FRAMES: u32 = 20;

// Enemies
pub const ENEMY_SIZE: u32 = 20;
pub const ENEMY_SPEED: f32 = 0.75;
pub const ENEMY_AGGRO_RADIUS: f32 = (TILE_SIZE * 5) as f32;
pub const ENEMY_DAMAGE: i32 = 10;
pub const ENEMY_STARTING_HEALTH: i32 = 100;
/// Number of enemy level bands assigned by spawn distance
pub const LEVEL_BANDS: u32 = 6;

// Pickups
pub const COIN_SIZE: u32 = 10;
pub const COIN_VALUE: u32 = 1;
pub const HEALTH_PICKUP_SIZE: u32 = 16;
pub const HEALTH_PICKUP_AMOUNT: i32 = 25;

// Progression
pub const LEVEL_UP_HEALTH_BONUS: i32 = 20;
pub const EXPERIENCE_PER_ENEMY_LEVEL: u32 = 25;
pub const MAX_PLAYER_LEVEL: u32 = 10;
pub const EXPERIENCE_STEP: u32 = 100;
