//! Post-load physics activation.
//!
//! The physics simulation itself lives outside this crate. Loaders only need
//! a way to hand a freshly built grid to it when the server has physics
//! switched on; [`PhysicsLayer`] is that seam.

use classic_engine::world::WorldGrid;

/// Something that starts simulating a grid once it has been loaded.
pub trait PhysicsLayer {
    /// Human-readable name, for logging.
    fn name(&self) -> &'static str;

    /// Prepare `grid` for simulation (e.g. queue every active block).
    fn activate(&self, grid: &mut WorldGrid);
}

/// A layer that does nothing. Used when no simulation is attached.
pub struct Dormant;

impl PhysicsLayer for Dormant {
    fn name(&self) -> &'static str {
        "dormant"
    }

    fn activate(&self, _grid: &mut WorldGrid) {}
}

/// Run `layer` over `grid` if `enabled`. Returns whether it ran.
pub fn activate_if_enabled(enabled: bool, grid: &mut WorldGrid, layer: &dyn PhysicsLayer) -> bool {
    if !enabled {
        return false;
    }
    tracing::info!(
        "Activating physics layer '{}' on {}x{}x{} map",
        layer.name(),
        grid.width(),
        grid.length(),
        grid.height(),
    );
    layer.activate(grid);
    true
}
