//! Failure modes of map loading, saving, and import.

use std::path::PathBuf;

use classic_engine::world::GridError;

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// The stored dimensions are outside what a grid may hold.
    #[error(transparent)]
    InvalidDimension(#[from] GridError),

    /// A native map did not start with the expected magic number.
    #[error("incorrect map header (found magic {found:#06x})")]
    InvalidHeader { found: u16 },

    /// The stream ended before the declared data was read.
    #[error("map data ended unexpectedly")]
    UnexpectedEof,

    /// A legacy map could not be decoded by the structural scan.
    #[error("malformed legacy map: {0}")]
    Format(String),

    /// The file extension does not name a known map format.
    #[error("unrecognized map format: {}", .0.display())]
    UnknownFormat(PathBuf),

    #[error("map I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl MapError {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        MapError::Format(msg.into())
    }
}
