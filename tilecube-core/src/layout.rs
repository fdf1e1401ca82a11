/// Procedural generation of a connected tile layout
use rand::Rng;
use tracing::{debug, info};

use crate::error::LayoutError;
use crate::geometry::{Tile, TileSet};

/// Lattice steps to the eight neighbors of a tile, in units of one tile
const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
];

/// Size bounds for generated layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Fewest tiles added around the origin tile
    pub min_extra: usize,
    /// Most tiles added around the origin tile
    pub max_extra: usize,
    /// Placement attempts before giving up
    pub max_attempts: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_extra: 9,
            max_extra: 33,
            max_attempts: 100_000,
        }
    }
}

/// Grow a layout from the origin by attaching tiles to random neighbors of
/// random existing tiles until the drawn target count is reached.
///
/// Occupied candidates are simply discarded, so the number of iterations is
/// random; `max_attempts` bounds it.
pub fn generate<R: Rng + ?Sized>(
    rng: &mut R,
    tile_size: i64,
    config: &LayoutConfig,
) -> Result<TileSet, LayoutError> {
    if config.min_extra > config.max_extra {
        return Err(LayoutError::InvalidRange {
            min_extra: config.min_extra,
            max_extra: config.max_extra,
        });
    }

    let mut tiles = TileSet::new();
    tiles.insert(Tile::new(0, 0));

    let target = rng.gen_range(config.min_extra..=config.max_extra) + 1;
    let mut attempts = 0;

    while tiles.len() < target {
        if attempts == config.max_attempts {
            return Err(LayoutError::AttemptsExhausted {
                attempts,
                placed: tiles.len(),
                target,
            });
        }
        attempts += 1;

        let base = tiles.as_slice()[rng.gen_range(0..tiles.len())];
        let (dx, dy) = NEIGHBOR_OFFSETS[rng.gen_range(0..NEIGHBOR_OFFSETS.len())];
        let candidate = Tile::new(base.x + dx * tile_size, base.y + dy * tile_size);

        if tiles.insert(candidate).is_none() {
            debug!(x = candidate.x, y = candidate.y, "placement hit an occupied tile");
        }
    }

    info!(tiles = tiles.len(), attempts, "generated tile layout");
    Ok(tiles)
}
