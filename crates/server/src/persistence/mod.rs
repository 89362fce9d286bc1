//! Map persistence: the native `.fcm` format and import of legacy `.dat`
//! maps, plus the file-level entry points the server uses.

pub mod cursor;
pub mod dat;
pub mod native;

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use classic_engine::world::WorldGrid;

use crate::error::MapError;
use crate::physics::{self, PhysicsLayer};

/// On-disk map formats, told apart by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapFormat {
    Native,
    Dat,
}

impl MapFormat {
    pub fn from_path(path: &Path) -> Result<Self, MapError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("fcm") => Ok(MapFormat::Native),
            Some("dat") => Ok(MapFormat::Dat),
            _ => Err(MapError::UnknownFormat(path.to_path_buf())),
        }
    }
}

/// Load a map file in whichever format its extension names.
///
/// When `physics_enabled` is set, `physics` is activated on the loaded grid
/// before it is returned.
pub fn load_map(
    path: &Path,
    physics_enabled: bool,
    physics: &dyn PhysicsLayer,
) -> Result<WorldGrid, MapError> {
    let mut grid = match MapFormat::from_path(path)? {
        MapFormat::Native => native::load(BufReader::new(File::open(path)?))?,
        MapFormat::Dat => dat::import(&fs::read(path)?)?,
    };
    physics::activate_if_enabled(physics_enabled, &mut grid, physics);
    Ok(grid)
}

/// Save a map in the native format. `path` must carry the native extension,
/// so the file can be loaded again by [`load_map`].
pub fn save_map(grid: &WorldGrid, path: &Path) -> Result<(), MapError> {
    if MapFormat::from_path(path)? != MapFormat::Native {
        return Err(MapError::UnknownFormat(path.to_path_buf()));
    }
    let mut file = native::save(grid, BufWriter::new(File::create(path)?))?;
    file.flush()?;
    tracing::debug!("Wrote {}", path.display());
    Ok(())
}

/// Convert a legacy `.dat` map into a native map file.
pub fn convert_dat(src: &Path, dst: &Path) -> Result<WorldGrid, MapError> {
    let grid = dat::import(&fs::read(src)?)?;
    save_map(&grid, dst)?;
    tracing::info!("Converted {} -> {}", src.display(), dst.display());
    Ok(grid)
}
