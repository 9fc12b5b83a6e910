//! Tile grid with bounds-checked queries and mutations

use serde::{Deserialize, Serialize};

use crate::core::error::{GameError, Result};
use crate::core::types::{TilePos, Vec2};
use crate::entity::Entity;
use crate::terrain::tile::TileType;

/// A rectangular grid of terrain tiles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    /// Row-major, `width * height` cells
    tiles: Vec<TileType>,
    width: u32,
    height: u32,
    tile_size: u32,
    seed: Option<u64>,
}

impl TileGrid {
    /// Create a grid filled with a single tile type
    pub fn new(width: u32, height: u32, tile_size: u32, fill: TileType) -> Result<Self> {
        Self::check_dimensions(width, height, tile_size)?;
        Ok(Self {
            tiles: vec![fill; width as usize * height as usize],
            width,
            height,
            tile_size,
            seed: None,
        })
    }

    /// Build a grid from rows of tiles; every row must have the same length
    pub fn from_rows(rows: Vec<Vec<TileType>>, tile_size: u32) -> Result<Self> {
        let height = rows.len() as u32;
        let width = rows.first().map(|r| r.len()).unwrap_or(0) as u32;
        Self::check_dimensions(width, height, tile_size)?;

        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width as usize) {
            return Err(GameError::InvalidConfiguration(format!(
                "row {} has {} tiles, expected {}",
                idx,
                row.len(),
                width
            )));
        }

        Ok(Self {
            tiles: rows.into_iter().flatten().collect(),
            width,
            height,
            tile_size,
            seed: None,
        })
    }

    fn check_dimensions(width: u32, height: u32, tile_size: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(GameError::InvalidConfiguration(format!(
                "grid must be at least 1x1 (got {}x{})",
                width, height
            )));
        }
        if tile_size == 0 {
            return Err(GameError::InvalidConfiguration("tile_size must be positive".into()));
        }
        Ok(())
    }

    pub(crate) fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Seed the grid was generated from, if it was generated
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    fn index(&self, x: i32, y: i32) -> Result<usize> {
        if !self.in_bounds(x, y) {
            return Err(GameError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y as usize * self.width as usize + x as usize)
    }

    /// Read the tile at a coordinate
    pub fn tile_at(&self, x: i32, y: i32) -> Result<TileType> {
        let idx = self.index(x, y)?;
        Ok(self.tiles[idx])
    }

    /// Write a raw tile value; the grid is untouched if either check fails
    pub fn set_tile(&mut self, x: i32, y: i32, value: i32) -> Result<()> {
        let idx = self.index(x, y)?;
        let tile = TileType::from_value(value)?;
        self.tiles[idx] = tile;
        Ok(())
    }

    pub fn set_tile_type(&mut self, x: i32, y: i32, tile: TileType) -> Result<()> {
        let idx = self.index(x, y)?;
        self.tiles[idx] = tile;
        Ok(())
    }

    /// Is the tile inside the grid and walkable?
    pub fn is_passable(&self, tile: TilePos) -> bool {
        self.tile_at(tile.x, tile.y)
            .map(|t| t.is_passable())
            .unwrap_or(false)
    }

    /// True if any live entity stands on the tile
    ///
    /// Occupancy only concerns entities. Terrain passability is a separate
    /// question answered by [`TileGrid::is_passable`].
    pub fn is_occupied<'a, I>(&self, tile: TilePos, entities: I) -> bool
    where
        I: IntoIterator<Item = &'a Entity>,
    {
        entities
            .into_iter()
            .any(|e| e.is_alive() && e.tile(self.tile_size) == tile)
    }

    pub fn tile_of(&self, position: Vec2) -> TilePos {
        TilePos::from_world(position, self.tile_size)
    }

    pub fn tile_center(&self, tile: TilePos) -> Vec2 {
        tile.center(self.tile_size)
    }

    pub fn pixel_width(&self) -> f32 {
        (self.width * self.tile_size) as f32
    }

    pub fn pixel_height(&self) -> f32 {
        (self.height * self.tile_size) as f32
    }

    /// Length of the grid diagonal in pixels
    pub fn diagonal_pixels(&self) -> f32 {
        Vec2::new(self.pixel_width(), self.pixel_height()).length()
    }

    /// Is a world-pixel position inside the grid's pixel area?
    pub fn contains_pixel(&self, position: Vec2) -> bool {
        position.x >= 0.0
            && position.y >= 0.0
            && position.x < self.pixel_width()
            && position.y < self.pixel_height()
    }

    /// Number of cells of a given type
    pub fn count(&self, tile: TileType) -> usize {
        self.tiles.iter().filter(|t| **t == tile).count()
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[TileType]> {
        self.tiles.chunks(self.width as usize)
    }

    /// All passable tiles, row-major
    pub fn passable_tiles(&self) -> Vec<TilePos> {
        (0..self.height as i32)
            .flat_map(|y| (0..self.width as i32).map(move |x| TilePos::new(x, y)))
            .filter(|t| self.is_passable(*t))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::EntityId;
    use crate::entity::EntityKind;

    fn grid() -> TileGrid {
        TileGrid::new(4, 3, 32, TileType::Grass).unwrap()
    }

    #[test]
    fn test_grid_creation() {
        let g = grid();
        assert_eq!(g.width(), 4);
        assert_eq!(g.height(), 3);
        assert_eq!(g.count(TileType::Grass), 12);
        assert_eq!(g.seed(), None);
    }

    #[test]
    fn test_zero_sized_grid_rejected() {
        assert!(TileGrid::new(0, 3, 32, TileType::Grass).is_err());
        assert!(TileGrid::new(3, 3, 0, TileType::Grass).is_err());
    }

    #[test]
    fn test_tile_at_out_of_bounds() {
        let g = grid();
        assert!(matches!(
            g.tile_at(4, 0),
            Err(GameError::OutOfBounds { x: 4, y: 0, width: 4, height: 3 })
        ));
        assert!(g.tile_at(-1, 0).is_err());
        assert!(g.tile_at(0, 3).is_err());
        assert_eq!(g.tile_at(3, 2).unwrap(), TileType::Grass);
    }

    #[test]
    fn test_set_tile_at_width_leaves_grid_unchanged() {
        let mut g = grid();
        let before = g.clone();
        assert!(matches!(g.set_tile(4, 0, 1), Err(GameError::OutOfBounds { .. })));
        assert_eq!(g, before);
    }

    #[test]
    fn test_set_tile_invalid_type_leaves_grid_unchanged() {
        let mut g = grid();
        let before = g.clone();
        assert!(matches!(g.set_tile(1, 1, 9), Err(GameError::InvalidTileType(9))));
        assert_eq!(g, before);
    }

    #[test]
    fn test_set_tile() {
        let mut g = grid();
        g.set_tile(2, 1, 1).unwrap();
        assert_eq!(g.tile_at(2, 1).unwrap(), TileType::Water);
        assert!(!g.is_passable(TilePos::new(2, 1)));
        assert!(g.is_passable(TilePos::new(1, 1)));
        assert!(!g.is_passable(TilePos::new(-1, 1)));
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let rows = vec![
            vec![TileType::Grass, TileType::Water],
            vec![TileType::Grass],
        ];
        assert!(TileGrid::from_rows(rows, 32).is_err());
    }

    #[test]
    fn test_occupancy_ignores_terrain_and_disposed() {
        let mut g = grid();
        g.set_tile(1, 1, 1).unwrap();
        let mut enemy = Entity::new(
            EntityId(1),
            EntityKind::Enemy,
            Vec2::new(48.0, 48.0),
            20,
            100,
            1,
        );
        // Water with nobody on it is not occupied
        assert!(!g.is_occupied(TilePos::new(1, 1), std::iter::empty()));
        assert!(g.is_occupied(TilePos::new(1, 1), [&enemy]));
        assert!(!g.is_occupied(TilePos::new(0, 1), [&enemy]));

        enemy.dispose();
        assert!(!g.is_occupied(TilePos::new(1, 1), [&enemy]));
    }

    #[test]
    fn test_pixel_extent() {
        let g = grid();
        assert_eq!(g.pixel_width(), 128.0);
        assert_eq!(g.pixel_height(), 96.0);
        assert!((g.diagonal_pixels() - 160.0).abs() < 0.001);
        assert!(g.contains_pixel(Vec2::new(127.9, 0.0)));
        assert!(!g.contains_pixel(Vec2::new(128.0, 0.0)));
        assert!(!g.contains_pixel(Vec2::new(-0.1, 5.0)));
    }
}
