//! Legacy `.dat` import against hand-built object streams.

use std::io::Write;

use classic_engine::world::block::Block;
use classic_engine::world::GridError;
use classic_server::error::MapError;
use classic_server::persistence::{self, dat};
use classic_server::physics::Dormant;
use flate2::Compression;
use flate2::write::GzEncoder;

const LEVEL_CLASS: &str = "com.mojang.minecraft.level.Level";
const LEVEL_UID: [u8; 8] = [0x21, 0x22, 0x23, 0x24, 0x25, 0x26, 0x27, 0x28];
const BYTE_ARRAY_UID: [u8; 8] = [0xAC, 0xF3, 0x17, 0xF8, 0x06, 0x08, 0x54, 0xE0];

struct Field {
    tag: u8,
    name: &'static str,
    value: Vec<u8>,
}

fn int(name: &'static str, v: i32) -> Field {
    Field { tag: b'I', name, value: v.to_be_bytes().to_vec() }
}

fn long(name: &'static str, v: i64) -> Field {
    Field { tag: b'J', name, value: v.to_be_bytes().to_vec() }
}

fn boolean(name: &'static str, v: bool) -> Field {
    Field { tag: b'Z', name, value: vec![v as u8] }
}

fn prefixed(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(&(s.len() as u16).to_be_bytes());
    out.extend_from_slice(s.as_bytes());
}

/// A level object stream: class descriptor with `fields` plus an object
/// field `blocks`, the primitive values, then (optionally) the block array.
fn level_stream(fields: &[Field], blocks: Option<&[u8]>) -> Vec<u8> {
    // Some files carry a small header in front of the stream.
    let mut out = b"LVL\x01".to_vec();

    out.extend_from_slice(&[0xAC, 0xED, 0x00, 0x05, 0x73, 0x72]);
    prefixed(&mut out, LEVEL_CLASS);
    out.extend_from_slice(&LEVEL_UID);
    out.push(0x02);
    out.extend_from_slice(&(fields.len() as u16 + 1).to_be_bytes());
    for field in fields {
        out.push(field.tag);
        prefixed(&mut out, field.name);
    }
    out.push(b'[');
    prefixed(&mut out, "blocks");
    out.push(0x74);
    prefixed(&mut out, "[B");
    out.extend_from_slice(&[0x78, 0x70]);

    for field in fields {
        out.extend_from_slice(&field.value);
    }

    if let Some(blocks) = blocks {
        out.extend_from_slice(&[0x75, 0x72]);
        prefixed(&mut out, "[B");
        out.extend_from_slice(&BYTE_ARRAY_UID);
        out.extend_from_slice(&[0x02, 0x00, 0x00, 0x78, 0x70]);
        out.extend_from_slice(&(blocks.len() as i32).to_be_bytes());
        out.extend_from_slice(blocks);
    }
    out
}

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// width 16, length 32, height 24; spawn at block (8, 10, 4).
fn standard_fields() -> Vec<Field> {
    vec![
        int("depth", 24),
        int("height", 32),
        int("width", 16),
        int("xSpawn", 8),
        int("ySpawn", 10),
        int("zSpawn", 4),
    ]
}

const VOLUME: usize = 16 * 32 * 24;

fn sample_blocks() -> Vec<u8> {
    let mut blocks = vec![0u8; VOLUME];
    blocks[0] = 51;
    blocks[1] = 80;
    blocks[2] = 10;
    blocks[3] = 1;
    blocks[4] = 120;
    blocks[VOLUME - 1] = 49;
    blocks
}

#[test]
fn imports_geometry_spawn_and_blocks() {
    let file = gzip(&level_stream(&standard_fields(), Some(&sample_blocks())));
    let grid = dat::import(&file).unwrap();

    assert_eq!((grid.width(), grid.length(), grid.height()), (16, 32, 24));
    assert_eq!(grid.volume(), VOLUME);

    // Block coordinates land on the centre of the block.
    assert_eq!(grid.spawn.x, 8 * 32 + 16);
    assert_eq!(grid.spawn.z, 10 * 32 + 16);
    assert_eq!(grid.spawn.y, 4 * 32 + 16);

    assert_eq!(grid.get_block(0, 0, 0), Block::Lava);
    assert_eq!(grid.get_block(1, 0, 0), Block::White);
    assert_eq!(grid.get_block(2, 0, 0), Block::Lava);
    assert_eq!(grid.get_block(3, 0, 0), Block::Stone);
    assert_eq!(grid.get_block(4, 0, 0), Block::Air);
    assert_eq!(grid.get_block(15, 31, 23), Block::Obsidian);
}

#[test]
fn other_field_types_keep_values_aligned() {
    let mut fields = vec![
        long("createTime", 1_600_000_000_000),
        boolean("creativeMode", true),
    ];
    fields.extend(standard_fields());
    fields.push(int("waterLevel", 12));

    let file = gzip(&level_stream(&fields, Some(&sample_blocks())));
    let grid = dat::import(&file).unwrap();
    assert_eq!((grid.width(), grid.length(), grid.height()), (16, 32, 24));
    assert_eq!(grid.spawn.x, 272);
    assert_eq!(grid.get_block(1, 0, 0), Block::White);
}

#[test]
fn dimensions_use_low_16_bits() {
    let mut fields = standard_fields();
    fields[2] = int("width", 0x0001_0010);
    let file = gzip(&level_stream(&fields, Some(&sample_blocks())));
    assert_eq!(dat::import(&file).unwrap().width(), 16);
}

#[test]
fn missing_block_array() {
    let file = gzip(&level_stream(&standard_fields(), None));
    assert!(matches!(dat::import(&file), Err(MapError::Format(_))));
}

#[test]
fn block_array_shorter_than_volume() {
    let file = gzip(&level_stream(&standard_fields(), Some(&[1u8; 100])));
    assert!(matches!(dat::import(&file), Err(MapError::Format(_))));
}

#[test]
fn huge_declared_size_with_little_data() {
    let fields = vec![
        int("depth", 2048),
        int("height", 2048),
        int("width", 2048),
        int("xSpawn", 0),
        int("ySpawn", 0),
        int("zSpawn", 0),
    ];
    let file = gzip(&level_stream(&fields, Some(&[1u8; 64])));
    assert!(matches!(dat::import(&file), Err(MapError::Format(_))));
}

#[test]
fn invalid_dimensions() {
    let mut fields = standard_fields();
    fields[2] = int("width", 8);
    let file = gzip(&level_stream(&fields, Some(&[0u8; 8 * 32 * 24])));
    match dat::import(&file) {
        Err(MapError::InvalidDimension(e)) => assert_eq!(
            e,
            GridError::InvalidDimension { width: 8, length: 32, height: 24 }
        ),
        other => panic!("expected InvalidDimension, got {:?}", other),
    }
}

#[test]
fn no_object_stream() {
    let file = gzip(&[0x11; 256]);
    assert!(matches!(dat::import(&file), Err(MapError::Format(_))));
}

#[test]
fn not_gzip() {
    assert!(matches!(dat::import(b"plain text, not a map"), Err(MapError::Io(_))));
}

#[test]
fn truncated_container() {
    let file = gzip(&level_stream(&standard_fields(), Some(&sample_blocks())));
    let cut = &file[..file.len() / 2];
    assert!(dat::import(cut).is_err());
}

#[test]
fn convert_to_native_file() {
    let dir = std::env::temp_dir();
    let src = dir.join("classic_server_test_convert.dat");
    let dst = dir.join("classic_server_test_convert.fcm");
    std::fs::write(&src, gzip(&level_stream(&standard_fields(), Some(&sample_blocks())))).unwrap();

    let imported = persistence::convert_dat(&src, &dst).unwrap();
    let via_dispatch = persistence::load_map(&src, false, &Dormant).unwrap();
    let native = persistence::load_map(&dst, false, &Dormant).unwrap();
    std::fs::remove_file(&src).unwrap();
    std::fs::remove_file(&dst).unwrap();

    assert_eq!(native.blocks(), imported.blocks());
    assert_eq!(via_dispatch.blocks(), imported.blocks());
    // The native format keeps whole blocks only.
    assert_eq!(native.spawn.x, 8 * 32);
    assert_eq!(native.spawn.z, 10 * 32);
    assert_eq!(native.spawn.y, 4 * 32);
}
