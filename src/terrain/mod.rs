//! Terrain - the tile grid the simulation runs on
//!
//! Tiles are queried by integer coordinate; entities map onto tiles by floor
//! division of their pixel position.

pub mod format;
pub mod generation;
pub mod grid;
pub mod map;
pub mod tile;

pub use generation::generate;
pub use grid::TileGrid;
pub use map::TerrainMap;
pub use tile::TileType;
