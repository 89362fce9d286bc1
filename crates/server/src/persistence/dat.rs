//! Import of legacy `.dat` maps.
//!
//! A `.dat` map is a gzip container around a Java object-serialization
//! stream of the client's level object. There is no schema to decode it
//! against, so the importer recovers only what it needs by structure:
//!
//! 1. The first `AC ED` stream marker starts the level's class descriptor.
//! 2. After the class name, serial version, flags, and field count comes
//!    the field table, closed by `78 70` (end of block data, null
//!    superclass). Each entry is a type tag and a length-prefixed name.
//! 3. Primitive field values follow the table back-to-back in table order.
//!    The dimensions and spawn are read from there by field name.
//! 4. The block array is the first byte array after the table: its class
//!    descriptor ends `00 78 70`, then a 4-byte length, then the blocks.
//!
//! The container's last 4 bytes (gzip ISIZE) give the decompressed size.

use std::io::{self, Read};
use std::time::Instant;

use flate2::read::GzDecoder;

use classic_engine::world::WorldGrid;
use classic_engine::world::position::{Position, UNITS_PER_BLOCK};

use super::cursor::ByteCursor;
use crate::block;
use crate::error::MapError;

const STREAM_MAGIC: [u8; 2] = [0xAC, 0xED];
/// `TC_ENDBLOCKDATA`, `TC_NULL`.
const END_OF_FIELDS: [u8; 2] = [0x78, 0x70];
/// Last byte of a zero field count, then [`END_OF_FIELDS`].
const BYTE_ARRAY_DESCRIPTOR_END: [u8; 3] = [0x00, 0x78, 0x70];

/// Stream version and the object/class-descriptor tags after the magic.
const STREAM_HEADER_REST: usize = 4;
/// Serial version UID, flags, and field count after the class name.
const CLASS_DESCRIPTOR_TAIL: usize = 8 + 1 + 2;
/// Array length between the descriptor end and the array data.
const ARRAY_LENGTH: usize = 4;

/// Dimensions and spawn recovered from the level's primitive fields.
///
/// The level names its axes differently: its `height` is this engine's
/// length and its `depth` is this engine's (vertical) height.
#[derive(Debug, Default)]
struct LevelFields {
    width: i32,
    length: i32,
    height: i32,
    spawn: Position,
}

/// Import a `.dat` map from the complete file contents.
pub fn import(file: &[u8]) -> Result<WorldGrid, MapError> {
    let start = Instant::now();
    let data = decompress(file)?;

    let fields_start = find_field_table(&data)?;
    let marker = ByteCursor::at(&data, fields_start)?
        .find(&END_OF_FIELDS)
        .ok_or_else(|| MapError::format("end of field table not found"))?;
    let values_start = marker + END_OF_FIELDS.len();

    let fields = read_level_fields(&data, fields_start, marker, values_start)?;
    let volume = WorldGrid::volume_for(fields.width, fields.length, fields.height)?;

    // Locate the blocks before allocating the grid.
    let signature = ByteCursor::at(&data, values_start)?
        .find(&BYTE_ARRAY_DESCRIPTOR_END)
        .ok_or_else(|| MapError::format("block array not found"))?;
    let mut cursor = ByteCursor::at(&data, signature)?;
    cursor.skip(BYTE_ARRAY_DESCRIPTOR_END.len() + ARRAY_LENGTH)?;
    let blocks = cursor.take(volume)?;

    let mut grid = WorldGrid::new(fields.width, fields.length, fields.height)?;
    grid.spawn = fields.spawn;
    grid.blocks_mut().copy_from_slice(blocks);
    block::DAT.apply(grid.blocks_mut());

    tracing::info!(
        "Legacy map imported: {}x{}x{} ({:.2?})",
        grid.width(),
        grid.length(),
        grid.height(),
        start.elapsed(),
    );
    Ok(grid)
}

/// Decompress the whole container. The declared size comes from the
/// container's trailing 4 bytes.
fn decompress(file: &[u8]) -> Result<Vec<u8>, MapError> {
    let Some(footer) = file.len().checked_sub(4).map(|at| &file[at..]) else {
        return Err(MapError::format("file too short for a length footer"));
    };
    let declared = u32::from_le_bytes([footer[0], footer[1], footer[2], footer[3]]) as usize;

    let mut data = Vec::new();
    GzDecoder::new(file)
        .take(declared as u64)
        .read_to_end(&mut data)?;
    if data.len() < declared {
        return Err(MapError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("decompressed {} of {} declared bytes", data.len(), declared),
        )));
    }

    tracing::debug!("Decompressed legacy map payload: {} bytes", data.len());
    Ok(data)
}

/// Offset of the level's first field descriptor.
fn find_field_table(data: &[u8]) -> Result<usize, MapError> {
    let magic = ByteCursor::new(data)
        .find(&STREAM_MAGIC)
        .ok_or_else(|| MapError::format("object stream marker not found"))?;

    let mut cursor = ByteCursor::at(data, magic + STREAM_MAGIC.len())?;
    cursor.skip(STREAM_HEADER_REST)?;
    let class_name = cursor.read_prefixed()?;
    cursor.skip(CLASS_DESCRIPTOR_TAIL)?;

    tracing::debug!(
        "Level class {} at offset {}",
        String::from_utf8_lossy(class_name),
        magic
    );
    Ok(cursor.position())
}

/// Walk the field table in `[fields_start, marker)`, tracking where each
/// field's value sits in the value region, and pick out the fields we need.
///
/// Object fields carry a class-name string after their name. That string is
/// consumed as if it were one more (valueless) entry, which keeps the walk
/// aligned without decoding it.
fn read_level_fields(
    data: &[u8],
    fields_start: usize,
    marker: usize,
    values_start: usize,
) -> Result<LevelFields, MapError> {
    let mut fields = LevelFields::default();
    let mut cursor = ByteCursor::at(data, fields_start)?;
    let mut value_end = 0usize;

    while cursor.position() < marker {
        value_end += match cursor.read_u8()? {
            b'Z' | b'B' => 1,
            b'C' | b'S' => 2,
            b'I' | b'F' => 4,
            b'J' | b'D' => 8,
            _ => 0,
        };
        let name = cursor.read_prefixed()?;

        let value = || read_value(data, values_start, value_end);
        match name {
            b"width" => fields.width = dimension(value()?),
            b"height" => fields.length = dimension(value()?),
            b"depth" => fields.height = dimension(value()?),
            b"xSpawn" => fields.spawn.x = spawn_units(value()?),
            b"ySpawn" => fields.spawn.z = spawn_units(value()?),
            b"zSpawn" => fields.spawn.y = spawn_units(value()?),
            _ => {}
        }
    }

    tracing::debug!("Level fields: {:?}", fields);
    Ok(fields)
}

/// The 4-byte big-endian value ending `value_end` bytes into the value region.
fn read_value(data: &[u8], values_start: usize, value_end: usize) -> Result<i32, MapError> {
    let offset = value_end
        .checked_sub(4)
        .ok_or_else(|| MapError::format("field value precedes the value region"))?;
    ByteCursor::at(data, values_start.saturating_add(offset))?.read_i32_be()
}

/// Dimensions are stored as ints but only the low 16 bits are meaningful.
fn dimension(raw: i32) -> i32 {
    i32::from(raw as u16)
}

/// Block coordinate to world units at the block's centre.
fn spawn_units(block: i32) -> i16 {
    let half = i32::from(UNITS_PER_BLOCK / 2);
    block
        .wrapping_mul(i32::from(UNITS_PER_BLOCK))
        .wrapping_add(half) as i16
}
