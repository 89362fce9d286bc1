//! Remapping of foreign block codes onto the standard block set.
//!
//! Stored maps may carry codes above [`LAST_STANDARD`] from older block sets:
//! custom "active" blocks in native maps, and the extended survival blocks in
//! legacy `.dat` maps. Each loader folds those onto a standard block through
//! a 256-entry table. Unlisted codes become air.

use classic_engine::world::block::{Block, LAST_STANDARD};

/// A total mapping from stored byte to standard block.
pub struct BlockRemap([Block; 256]);

impl BlockRemap {
    #[inline]
    pub const fn get(&self, code: u8) -> Block {
        self.0[code as usize]
    }

    /// Rewrite every non-standard code in place. Standard codes are untouched.
    pub fn apply(&self, blocks: &mut [u8]) {
        for code in blocks.iter_mut().filter(|code| **code > LAST_STANDARD) {
            *code = self.get(*code).id();
        }
    }
}

/// Survival-era blocks found in legacy `.dat` maps (codes 50..=91).
pub static DAT: BlockRemap = BlockRemap(dat_table());

/// Codes found in native maps: the survival range shared with `.dat` maps,
/// plus the custom physics blocks of older servers (codes 100..=249).
pub static NATIVE: BlockRemap = BlockRemap(native_table());

const fn dat_table() -> [Block; 256] {
    let mut t = [Block::Air; 256];
    t[50] = Block::Air; // torch
    t[51] = Block::Lava; // fire
    t[52] = Block::Glass; // spawner
    t[53] = Block::Stair; // wood stairs
    t[54] = Block::Wood; // chest
    t[55] = Block::Air; // redstone wire
    t[56] = Block::IronOre; // diamond ore
    t[57] = Block::Aqua; // diamond block
    t[58] = Block::Log; // workbench
    t[59] = Block::Leaves; // crops
    t[60] = Block::Dirt; // soil
    t[61] = Block::Stone; // furnace
    t[62] = Block::Stone; // lit furnace
    t[63] = Block::Air; // sign post
    t[64] = Block::Air; // wooden door
    t[65] = Block::Air; // ladder
    t[66] = Block::Air; // rails
    t[67] = Block::Stair; // cobblestone stairs
    t[68] = Block::Air; // wall sign
    t[69] = Block::Air; // lever
    t[70] = Block::Air; // stone pressure plate
    t[71] = Block::Air; // iron door
    t[72] = Block::Air; // wooden pressure plate
    t[73] = Block::IronOre; // redstone ore
    t[74] = Block::IronOre; // glowing redstone ore
    t[75] = Block::Air; // redstone torch, off
    t[76] = Block::Air; // redstone torch, on
    t[77] = Block::Air; // stone button
    t[78] = Block::Air; // snow layer
    t[79] = Block::Glass; // ice
    t[80] = Block::White; // snow block
    t[81] = Block::Leaves; // cactus
    t[82] = Block::Gray; // clay
    t[83] = Block::Leaves; // reeds
    t[84] = Block::Log; // jukebox
    t[85] = Block::Wood; // fence
    t[86] = Block::Orange; // pumpkin
    t[87] = Block::Dirt; // netherrack
    t[88] = Block::Gravel; // soul sand
    t[89] = Block::Sand; // glowstone
    t[90] = Block::Violet; // portal
    t[91] = Block::Orange; // jack-o-lantern
    t
}

const fn native_table() -> [Block; 256] {
    let mut t = [Block::Air; 256];

    let dat = dat_table();
    let mut code = LAST_STANDARD as usize + 1;
    while code <= 91 {
        t[code] = dat[code];
        code += 1;
    }

    t[100] = Block::Glass; // op_glass
    t[101] = Block::Obsidian; // opsidian
    t[102] = Block::Brick; // op_brick
    t[103] = Block::Stone; // op_stone
    t[104] = Block::Cobblestone; // op_cobblestone
    // 105: op_air
    t[106] = Block::Water; // op_water

    t[110] = Block::Wood; // wood_float
    t[111] = Block::Log; // door
    t[112] = Block::Lava; // lava_fast
    t[113] = Block::Obsidian; // door2
    t[114] = Block::Glass; // door3
    t[115] = Block::Stone; // door4
    t[116] = Block::Leaves; // door5
    t[117] = Block::Sand; // door6
    t[118] = Block::Wood; // door7
    t[119] = Block::Green; // door8
    t[120] = Block::TNT; // door9
    t[121] = Block::Stair; // door10

    t[122] = Block::Log; // tdoor
    t[123] = Block::Obsidian; // tdoor2
    t[124] = Block::Glass; // tdoor3
    t[125] = Block::Stone; // tdoor4
    t[126] = Block::Leaves; // tdoor5
    t[127] = Block::Sand; // tdoor6
    t[128] = Block::Wood; // tdoor7
    t[129] = Block::Green; // tdoor8

    t[130] = Block::White; // message blocks
    t[131] = Block::Black;
    t[132] = Block::Air;
    t[133] = Block::Water;
    t[134] = Block::Lava;

    t[135] = Block::TNT; // tdoor9
    t[136] = Block::Stair; // tdoor10
    t[137] = Block::Air; // tdoor11
    t[138] = Block::Water; // tdoor12
    t[139] = Block::Lava; // tdoor13

    t[140] = Block::Water; // water_down
    t[141] = Block::Lava; // lava_down
    t[143] = Block::Aqua; // water_faucet
    t[144] = Block::Orange; // lava_faucet

    t[145] = Block::Water; // finite_water
    t[146] = Block::Lava; // finite_lava
    t[147] = Block::Cyan; // finite_faucet

    t[148] = Block::Log; // odoor1..12
    t[149] = Block::Obsidian;
    t[150] = Block::Glass;
    t[151] = Block::Stone;
    t[152] = Block::Leaves;
    t[153] = Block::Sand;
    t[154] = Block::Wood;
    t[155] = Block::Green;
    t[156] = Block::TNT;
    t[157] = Block::Stair;
    t[158] = Block::Lava;
    t[159] = Block::Water;

    t[160] = Block::Air; // air_portal
    t[161] = Block::Water; // water_portal
    t[162] = Block::Lava; // lava_portal

    t[164] = Block::Air; // air_door
    t[165] = Block::Air; // air_switch
    t[166] = Block::Water; // water_door
    t[167] = Block::Lava; // lava_door

    t[175] = Block::Cyan; // blue_portal
    t[176] = Block::Orange; // orange_portal

    t[182] = Block::TNT; // small_tnt
    t[183] = Block::TNT; // big_tnt
    t[184] = Block::Lava; // tnt_explosion
    t[185] = Block::Lava; // fire

    t[187] = Block::Glass; // rocket_start
    t[188] = Block::Gold; // rocket_head
    t[189] = Block::Iron; // firework

    t[190] = Block::Lava; // death_lava
    t[191] = Block::Water; // death_water
    t[192] = Block::Air; // death_air
    t[193] = Block::Water; // active_death_water
    t[194] = Block::Lava; // active_death_lava

    t[195] = Block::Lava; // magma
    t[196] = Block::Water; // geyser

    t[211] = Block::Red; // door8_air
    t[212] = Block::Lava; // door9_air

    t[230] = Block::Aqua; // train
    t[231] = Block::TNT; // creeper
    t[232] = Block::MossyRocks; // zombie body
    t[233] = Block::Lime; // zombie head

    t[235] = Block::White; // birds
    t[236] = Block::Black;
    t[237] = Block::Lava;
    t[238] = Block::Red;
    t[239] = Block::Water;
    t[240] = Block::Blue;
    t[242] = Block::Lava; // bird_kill

    t[245] = Block::Gold; // fish
    t[246] = Block::Sponge;
    t[247] = Block::Gray;
    t[248] = Block::Red;
    t[249] = Block::Blue;
    t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_codes_pass_through() {
        let mut blocks: Vec<u8> = (0..=LAST_STANDARD).collect();
        let expected = blocks.clone();
        NATIVE.apply(&mut blocks);
        assert_eq!(blocks, expected);
        DAT.apply(&mut blocks);
        assert_eq!(blocks, expected);
    }

    #[test]
    fn every_remapped_code_is_standard() {
        for code in 0..=255u8 {
            assert!(NATIVE.get(code) != Block::Undefined);
            assert!(DAT.get(code) != Block::Undefined);
        }
    }

    #[test]
    fn native_table_entries() {
        assert_eq!(NATIVE.get(51), Block::Lava);
        assert_eq!(NATIVE.get(95), Block::Air);
        assert_eq!(NATIVE.get(105), Block::Air);
        assert_eq!(NATIVE.get(112), Block::Lava);
        assert_eq!(NATIVE.get(232), Block::MossyRocks);
        assert_eq!(NATIVE.get(249), Block::Blue);
        assert_eq!(NATIVE.get(250), Block::Air);
    }

    #[test]
    fn dat_table_entries() {
        assert_eq!(DAT.get(51), Block::Lava);
        assert_eq!(DAT.get(80), Block::White);
        assert_eq!(DAT.get(91), Block::Orange);
        assert_eq!(DAT.get(92), Block::Air);
        assert_eq!(DAT.get(112), Block::Air);
    }

    #[test]
    fn apply_rewrites_only_foreign_codes() {
        let mut blocks = vec![10, 51, 49, 150, 255];
        NATIVE.apply(&mut blocks);
        assert_eq!(
            blocks,
            vec![
                Block::Lava.id(),
                Block::Lava.id(),
                Block::Obsidian.id(),
                Block::Glass.id(),
                Block::Air.id(),
            ]
        );
    }
}
