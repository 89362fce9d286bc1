//! Procedural flat terrain: stone up to just below half height, four layers
//! of dirt, then a single grass layer. Everything above stays air.

use super::block::Block;
use super::{GridError, WorldGrid};

/// Dirt layers between the stone and the grass.
const DIRT_DEPTH: usize = 4;

impl WorldGrid {
    pub fn flatgrass(width: i32, length: i32, height: i32) -> Result<Self, GridError> {
        let mut grid = WorldGrid::new(width, length, height)?;

        // Height is at least 16, so the stone top is always at layer 3 or above.
        let layer = width as usize * length as usize;
        let grass_z = height as usize / 2 - 1;
        let stone_top = grass_z - DIRT_DEPTH;

        let blocks = grid.blocks_mut();
        blocks[..stone_top * layer].fill(Block::Stone.id());
        blocks[stone_top * layer..grass_z * layer].fill(Block::Dirt.id());
        blocks[grass_z * layer..(grass_z + 1) * layer].fill(Block::Grass.id());

        tracing::debug!(
            "Generated flatgrass {}x{}x{} (grass at z={})",
            width,
            length,
            height,
            grass_z
        );
        Ok(grid)
    }
}
