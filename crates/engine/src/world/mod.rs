pub mod block;
pub mod flatgrass;
pub mod position;

use block::Block;
use position::{Position, UNITS_PER_BLOCK};

/// Smallest legal extent along any axis.
pub const MIN_DIMENSION: i32 = 16;
/// Largest legal extent along any axis.
pub const MAX_DIMENSION: i32 = 2048;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("invalid map dimensions {width}x{length}x{height} (each must be within 16..=2048)")]
    InvalidDimension { width: i32, length: i32, height: i32 },
}

/// A fixed-size block world.
///
/// Blocks live in one flat buffer indexed `(z * length + y) * width + x`:
/// x varies fastest, then y, then z. Z is the vertical axis.
///
/// The grid does no locking. Whoever owns it after loading (the session
/// layer) is responsible for serializing concurrent reads and writes.
#[derive(Clone)]
pub struct WorldGrid {
    width: i32,
    length: i32,
    height: i32,
    blocks: Vec<u8>,
    pub spawn: Position,
}

impl WorldGrid {
    /// Allocate an all-air grid. Every dimension must lie in
    /// `MIN_DIMENSION..=MAX_DIMENSION`.
    ///
    /// The default spawn is the horizontal centre of the map at its top,
    /// with each coordinate clamped to what a position can hold.
    pub fn new(width: i32, length: i32, height: i32) -> Result<Self, GridError> {
        let volume = Self::volume_for(width, length, height)?;
        let half_block = i32::from(UNITS_PER_BLOCK / 2);
        let spawn = Position::new(
            clamp_units(width * half_block),
            clamp_units(length * half_block),
            clamp_units(height * i32::from(UNITS_PER_BLOCK)),
        );

        tracing::debug!("Allocated {}x{}x{} grid ({} blocks)", width, length, height, volume);

        Ok(Self {
            width,
            length,
            height,
            blocks: vec![Block::Air.id(); volume],
            spawn,
        })
    }

    /// Validate dimensions and return the cell count a grid of that size
    /// would hold, without allocating it.
    pub fn volume_for(width: i32, length: i32, height: i32) -> Result<usize, GridError> {
        let valid = |d: i32| (MIN_DIMENSION..=MAX_DIMENSION).contains(&d);
        if !(valid(width) && valid(length) && valid(height)) {
            return Err(GridError::InvalidDimension { width, length, height });
        }
        Ok(width as usize * length as usize * height as usize)
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn length(&self) -> i32 {
        self.length
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Total number of cells. Always equal to `blocks().len()`.
    #[inline]
    pub fn volume(&self) -> usize {
        self.blocks.len()
    }

    /// Buffer offset of a cell. Performs no bounds check; the result is only
    /// meaningful when `in_bounds(x, y, z)` holds.
    #[inline]
    pub fn index(&self, x: i32, y: i32, z: i32) -> usize {
        ((z as usize * self.length as usize) + y as usize) * self.width as usize + x as usize
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        (0..self.width).contains(&x) && (0..self.length).contains(&y) && (0..self.height).contains(&z)
    }

    /// Read a block. Returns `Block::Undefined` outside the grid.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> Block {
        if self.in_bounds(x, y, z) {
            Block::from_id(self.blocks[self.index(x, y, z)])
        } else {
            Block::Undefined
        }
    }

    /// Write a block. Out-of-bounds writes are silently ignored: callers doing
    /// coordinate math that may briefly leave the grid depend on this.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block: Block) {
        if self.in_bounds(x, y, z) {
            let index = self.index(x, y, z);
            self.blocks[index] = block.id();
        }
    }

    /// Raw block codes in index order.
    #[inline]
    pub fn blocks(&self) -> &[u8] {
        &self.blocks
    }

    /// Mutable raw block codes. The slice cannot change length, so the
    /// buffer always stays exactly `volume()` long.
    #[inline]
    pub fn blocks_mut(&mut self) -> &mut [u8] {
        &mut self.blocks
    }
}

impl std::fmt::Debug for WorldGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorldGrid")
            .field("width", &self.width)
            .field("length", &self.length)
            .field("height", &self.height)
            .field("spawn", &self.spawn)
            .finish_non_exhaustive()
    }
}

fn clamp_units(units: i32) -> i16 {
    units.min(i32::from(i16::MAX)) as i16
}
