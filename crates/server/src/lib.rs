//! Data layer of a classic block-world server: map persistence (native
//! format and legacy `.dat` import), legacy block remapping, and chat
//! message framing.

pub mod block;
pub mod config;
pub mod error;
pub mod net;
pub mod persistence;
pub mod physics;
