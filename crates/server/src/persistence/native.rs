//! The native map format (`.fcm`).
//!
//! A gzip container holding, little-endian:
//!
//! | Size | Field |
//! |------|-------|
//! | 2 | magic `0x0752` |
//! | 2 × 3 | width, length, height (`i16`) |
//! | 2 × 3 | spawn x, z, y in whole blocks (`i16`) |
//! | 1 + 1 | spawn yaw, pitch |
//! | 1 + 1 | reserved permission bytes (written as zero) |
//! | volume | raw block codes in grid index order |
//!
//! Spawn coordinates are stored in blocks, so the sub-block part of a spawn
//! position does not survive a save/load cycle.

use std::io::{self, Read, Write};
use std::time::Instant;

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

use classic_engine::world::WorldGrid;
use classic_engine::world::position::{Position, UNITS_PER_BLOCK};

use crate::block;
use crate::error::MapError;

pub const MAGIC: u16 = 0x0752;

/// Decode a native map from a gzip stream.
///
/// Block codes above the standard set are folded through [`block::NATIVE`].
pub fn load<R: Read>(source: R) -> Result<WorldGrid, MapError> {
    let start = Instant::now();
    let mut reader = GzDecoder::new(source);

    let magic = read_u16(&mut reader)?;
    if magic != MAGIC {
        return Err(MapError::InvalidHeader { found: magic });
    }

    let width = read_i16(&mut reader)?;
    let length = read_i16(&mut reader)?;
    let height = read_i16(&mut reader)?;
    let mut grid = WorldGrid::new(width.into(), length.into(), height.into())?;

    let x = read_i16(&mut reader)?.wrapping_mul(UNITS_PER_BLOCK);
    let z = read_i16(&mut reader)?.wrapping_mul(UNITS_PER_BLOCK);
    let y = read_i16(&mut reader)?.wrapping_mul(UNITS_PER_BLOCK);
    let mut orientation = [0u8; 2];
    read_exact(&mut reader, &mut orientation)?;
    grid.spawn = Position::new(x, y, z).with_rotation(orientation[0], orientation[1]);

    // Visit/build permission bytes are not used.
    let mut permissions = [0u8; 2];
    read_exact(&mut reader, &mut permissions)?;

    read_exact(&mut reader, grid.blocks_mut())?;
    block::NATIVE.apply(grid.blocks_mut());

    tracing::info!(
        "Map loaded: {}x{}x{} ({:.2?})",
        grid.width(),
        grid.length(),
        grid.height(),
        start.elapsed(),
    );
    Ok(grid)
}

/// Encode `grid` as a native map into `sink`, finishing the gzip stream.
/// Returns the sink so the caller can flush or reuse it.
pub fn save<W: Write>(grid: &WorldGrid, sink: W) -> Result<W, MapError> {
    let start = Instant::now();
    let mut writer = GzEncoder::new(sink, Compression::default());

    writer.write_all(&MAGIC.to_le_bytes())?;
    for dimension in [grid.width(), grid.length(), grid.height()] {
        // Dimensions are at most 2048, well inside i16.
        writer.write_all(&(dimension as i16).to_le_bytes())?;
    }

    let spawn = grid.spawn;
    for units in [spawn.x, spawn.z, spawn.y] {
        writer.write_all(&(units / UNITS_PER_BLOCK).to_le_bytes())?;
    }
    writer.write_all(&[spawn.r, spawn.l])?;
    writer.write_all(&[0, 0])?;

    writer.write_all(grid.blocks())?;
    let sink = writer.finish()?;

    tracing::info!(
        "Map saved: {}x{}x{} ({:.2?})",
        grid.width(),
        grid.length(),
        grid.height(),
        start.elapsed(),
    );
    Ok(sink)
}

fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<(), MapError> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => MapError::UnexpectedEof,
        _ => MapError::Io(e),
    })
}

fn read_u16<R: Read>(reader: &mut R) -> Result<u16, MapError> {
    let mut b = [0u8; 2];
    read_exact(reader, &mut b)?;
    Ok(u16::from_le_bytes(b))
}

fn read_i16<R: Read>(reader: &mut R) -> Result<i16, MapError> {
    let mut b = [0u8; 2];
    read_exact(reader, &mut b)?;
    Ok(i16::from_le_bytes(b))
}
