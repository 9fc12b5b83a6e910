use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Terrain file not found: {0}")]
    NotFound(PathBuf),

    #[error("Parse error at line {line}, column {column}: {message}")]
    ParseError {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Tile ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },

    #[error("No terrain grid has been loaded or generated")]
    UninitializedState,

    #[error("Invalid tile type: {0}")]
    InvalidTileType(i32),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
