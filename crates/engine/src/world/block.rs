/// Canonical block type codes. Discriminants are the classic wire protocol's
/// block IDs, so a `Block` can be written to a map buffer or packet as-is.
///
/// `Undefined` is only ever returned by out-of-bounds queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Block {
    #[default]
    Air = 0,
    Stone = 1,
    Grass = 2,
    Dirt = 3,
    Cobblestone = 4,
    Wood = 5,
    Plant = 6,
    Admincrete = 7,
    Water = 8,
    StillWater = 9,
    Lava = 10,
    StillLava = 11,
    Sand = 12,
    Gravel = 13,
    GoldOre = 14,
    IronOre = 15,
    Coal = 16,
    Log = 17,
    Leaves = 18,
    Sponge = 19,
    Glass = 20,
    Red = 21,
    Orange = 22,
    Yellow = 23,
    Lime = 24,
    Green = 25,
    Teal = 26,
    Aqua = 27,
    Cyan = 28,
    Blue = 29,
    Indigo = 30,
    Violet = 31,
    Magenta = 32,
    Pink = 33,
    Black = 34,
    Gray = 35,
    White = 36,
    YellowFlower = 37,
    RedFlower = 38,
    BrownMushroom = 39,
    RedMushroom = 40,
    Gold = 41,
    Iron = 42,
    DoubleStair = 43,
    Stair = 44,
    Brick = 45,
    TNT = 46,
    Books = 47,
    MossyRocks = 48,
    Obsidian = 49,
    Undefined = 255,
}

/// Highest ID in the standard block set. Anything above it in a stored map
/// comes from an older or foreign block set and must be remapped on load.
pub const LAST_STANDARD: u8 = Block::Obsidian as u8;

const STANDARD: [Block; LAST_STANDARD as usize + 1] = [
    Block::Air,
    Block::Stone,
    Block::Grass,
    Block::Dirt,
    Block::Cobblestone,
    Block::Wood,
    Block::Plant,
    Block::Admincrete,
    Block::Water,
    Block::StillWater,
    Block::Lava,
    Block::StillLava,
    Block::Sand,
    Block::Gravel,
    Block::GoldOre,
    Block::IronOre,
    Block::Coal,
    Block::Log,
    Block::Leaves,
    Block::Sponge,
    Block::Glass,
    Block::Red,
    Block::Orange,
    Block::Yellow,
    Block::Lime,
    Block::Green,
    Block::Teal,
    Block::Aqua,
    Block::Cyan,
    Block::Blue,
    Block::Indigo,
    Block::Violet,
    Block::Magenta,
    Block::Pink,
    Block::Black,
    Block::Gray,
    Block::White,
    Block::YellowFlower,
    Block::RedFlower,
    Block::BrownMushroom,
    Block::RedMushroom,
    Block::Gold,
    Block::Iron,
    Block::DoubleStair,
    Block::Stair,
    Block::Brick,
    Block::TNT,
    Block::Books,
    Block::MossyRocks,
    Block::Obsidian,
];

impl Block {
    /// Decode a stored block code. Codes outside the standard set decode as
    /// `Undefined`.
    pub const fn from_id(id: u8) -> Block {
        if id <= LAST_STANDARD {
            STANDARD[id as usize]
        } else {
            Block::Undefined
        }
    }

    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }
}

impl From<Block> for u8 {
    fn from(block: Block) -> u8 {
        block as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_matches_discriminants() {
        for (id, block) in STANDARD.iter().enumerate() {
            assert_eq!(block.id() as usize, id, "{:?} is out of place", block);
        }
    }

    #[test]
    fn unknown_codes_decode_as_undefined() {
        assert_eq!(Block::from_id(50), Block::Undefined);
        assert_eq!(Block::from_id(255), Block::Undefined);
        assert_eq!(Block::from_id(10), Block::Lava);
    }
}
