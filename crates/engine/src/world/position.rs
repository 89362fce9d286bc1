/// Number of position sub-units per block along each axis.
pub const UNITS_PER_BLOCK: i16 = 32;

/// An entity position in world units (32 per block) plus orientation.
///
/// Z is the vertical axis. Values outside the map are legal; they are used
/// for off-map spawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i16,
    pub y: i16,
    pub z: i16,
    /// Yaw.
    pub r: u8,
    /// Pitch.
    pub l: u8,
}

impl Position {
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z, r: 0, l: 0 }
    }

    pub const fn with_rotation(self, r: u8, l: u8) -> Self {
        Self { r, l, ..self }
    }
}
