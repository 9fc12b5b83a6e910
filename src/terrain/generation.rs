//! Seeded terrain synthesis
//!
//! Cells far from the grid center draw from an outer table that favors
//! mountain and water; cells near it draw from an inner table that favors
//! grass and forest. The result reads as a green heartland ringed by
//! highlands and lakes.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::error::Result;
use crate::terrain::grid::TileGrid;
use crate::terrain::tile::TileType;

/// Cells farther than this fraction of the width from the center are "outer"
pub const OUTER_RADIUS_FRACTION: f32 = 0.3;

/// Weighted table used beyond the outer radius
const OUTER_WEIGHTS: [(TileType, u32); 4] = [
    (TileType::Grass, 20),
    (TileType::Water, 30),
    (TileType::Mountain, 40),
    (TileType::Forest, 10),
];

/// Weighted table used inside the outer radius
const INNER_WEIGHTS: [(TileType, u32); 4] = [
    (TileType::Grass, 60),
    (TileType::Water, 5),
    (TileType::Mountain, 5),
    (TileType::Forest, 30),
];

/// Generate a grid; the same seed always yields the same grid
///
/// Without a seed a fresh one is drawn and recorded on the grid.
pub fn generate(seed: Option<u64>, width: u32, height: u32, tile_size: u32) -> Result<TileGrid> {
    let seed = seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut grid = TileGrid::new(width, height, tile_size, TileType::Grass)?;

    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;
    let outer_radius = OUTER_RADIUS_FRACTION * width as f32;

    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let dx = x as f32 - center_x;
            let dy = y as f32 - center_y;
            let distance = (dx * dx + dy * dy).sqrt();

            let table = if distance > outer_radius {
                &OUTER_WEIGHTS
            } else {
                &INNER_WEIGHTS
            };
            grid.set_tile_type(x, y, pick_weighted(table, &mut rng))?;
        }
    }

    tracing::debug!(
        "Generated {}x{} terrain from seed {} ({} water tiles)",
        width,
        height,
        seed,
        grid.count(TileType::Water)
    );

    Ok(grid.with_seed(seed))
}

fn pick_weighted(table: &[(TileType, u32)], rng: &mut ChaCha8Rng) -> TileType {
    let total: u32 = table.iter().map(|(_, w)| w).sum();
    let mut roll = rng.gen_range(0..total);
    for (tile, weight) in table {
        if roll < *weight {
            return *tile;
        }
        roll -= weight;
    }
    // Unreachable while the weights sum to `total`
    TileType::Grass
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_grid() {
        let a = generate(Some(42), 30, 20, 32).unwrap();
        let b = generate(Some(42), 30, 20, 32).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.seed(), Some(42));
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = generate(Some(1), 30, 20, 32).unwrap();
        let b = generate(Some(2), 30, 20, 32).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_unseeded_records_seed() {
        let grid = generate(None, 10, 10, 32).unwrap();
        let seed = grid.seed().unwrap();
        assert_eq!(generate(Some(seed), 10, 10, 32).unwrap(), grid);
    }

    #[test]
    fn test_center_greener_than_rim() {
        let grid = generate(Some(7), 60, 60, 32).unwrap();
        let outer_radius = OUTER_RADIUS_FRACTION * 60.0;

        let (mut inner_water, mut inner_total) = (0, 0);
        let (mut outer_water, mut outer_total) = (0, 0);
        for y in 0..60 {
            for x in 0..60 {
                let d = ((x as f32 - 30.0).powi(2) + (y as f32 - 30.0).powi(2)).sqrt();
                let water = grid.tile_at(x, y).unwrap() == TileType::Water;
                if d > outer_radius {
                    outer_total += 1;
                    outer_water += water as u32;
                } else {
                    inner_total += 1;
                    inner_water += water as u32;
                }
            }
        }

        let inner_ratio = inner_water as f32 / inner_total as f32;
        let outer_ratio = outer_water as f32 / outer_total as f32;
        assert!(outer_ratio > inner_ratio * 2.0);
    }

    #[test]
    fn test_weights_cover_every_tile_type() {
        for table in [&OUTER_WEIGHTS, &INNER_WEIGHTS] {
            for tile in TileType::ALL {
                assert!(table.iter().any(|(t, w)| *t == tile && *w > 0));
            }
        }
    }
}
