//! World storage for a classic block-world server: a fixed-size 3D block
//! grid with bounds-checked accessors, a spawn point, and flat terrain
//! generation. Encoding and network concerns live in the server crate.

pub mod world;
