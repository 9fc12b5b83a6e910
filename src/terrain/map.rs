//! The live terrain slot owned by the simulation
//!
//! Holds at most one grid. Loads build a complete new grid before swapping it
//! in, so a failed load never disturbs the grid that was already there.

use std::path::Path;

use crate::core::error::{GameError, Result};
use crate::terrain::{format, generation, TileGrid, TileType};

#[derive(Debug, Clone)]
pub struct TerrainMap {
    grid: Option<TileGrid>,
    tile_size: u32,
}

impl TerrainMap {
    /// An empty map; every tile query fails until a grid is installed
    pub fn new(tile_size: u32) -> Self {
        Self {
            grid: None,
            tile_size,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.grid.is_some()
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn grid(&self) -> Result<&TileGrid> {
        self.grid.as_ref().ok_or(GameError::UninitializedState)
    }

    pub fn grid_mut(&mut self) -> Result<&mut TileGrid> {
        self.grid.as_mut().ok_or(GameError::UninitializedState)
    }

    /// Install a grid, replacing any previous one
    pub fn install(&mut self, grid: TileGrid) -> Result<()> {
        if grid.tile_size() != self.tile_size {
            return Err(GameError::InvalidConfiguration(format!(
                "grid tile size {} does not match map tile size {}",
                grid.tile_size(),
                self.tile_size
            )));
        }
        self.grid = Some(grid);
        Ok(())
    }

    /// Generate and install a new grid
    pub fn generate(&mut self, seed: Option<u64>, width: u32, height: u32) -> Result<()> {
        let grid = generation::generate(seed, width, height, self.tile_size)?;
        tracing::info!(
            "Generated {}x{} map (seed {:?})",
            grid.width(),
            grid.height(),
            grid.seed()
        );
        self.grid = Some(grid);
        Ok(())
    }

    /// Load a terrain file; on any error the current grid stays in place
    pub fn load(&mut self, path: &Path) -> Result<()> {
        match format::read_file(path, self.tile_size) {
            Ok(grid) => {
                tracing::info!(
                    "Loaded {}x{} map from {}",
                    grid.width(),
                    grid.height(),
                    path.display()
                );
                self.grid = Some(grid);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to load map {}: {}", path.display(), e);
                Err(e)
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let grid = self.grid()?;
        format::write_file(grid, path)?;
        tracing::info!("Saved map to {}", path.display());
        Ok(())
    }

    pub fn tile_at(&self, x: i32, y: i32) -> Result<TileType> {
        self.grid()?.tile_at(x, y)
    }

    pub fn set_tile(&mut self, x: i32, y: i32, value: i32) -> Result<()> {
        self.grid_mut()?.set_tile(x, y, value)
    }
}
