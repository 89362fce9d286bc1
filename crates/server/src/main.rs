use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use classic_engine::world::WorldGrid;
use classic_server::config::ServerConfig;
use classic_server::persistence::{self, MapFormat};
use classic_server::physics::Dormant;

fn main() -> anyhow::Result<()> {
    let config_path: PathBuf = std::env::args()
        .skip_while(|a| a != "--config")
        .nth(1)
        .unwrap_or_else(|| "server.json".into())
        .into();
    let converting = std::env::args().any(|a| a == "--convert");
    let convert: Vec<String> = std::env::args()
        .skip_while(|a| a != "--convert")
        .skip(1)
        .take(2)
        .collect();

    // Logging is configured from the config file, so the config loads first,
    // under a temporary subscriber that only reports problems.
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("warn"))
        .finish();
    let config = tracing::subscriber::with_default(bootstrap, || ServerConfig::load(&config_path))
        .with_context(|| format!("loading {}", config_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.log_level))
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let [src, dst] = convert.as_slice() {
        let grid = persistence::convert_dat(Path::new(src), Path::new(dst))
            .with_context(|| format!("converting {} to {}", src, dst))?;
        log_summary(&grid);
        return Ok(());
    }
    if converting {
        anyhow::bail!("usage: classic-server --convert SRC.dat DST.fcm");
    }

    tracing::info!("Classic server -- map data layer");

    let start = Instant::now();
    let format = MapFormat::from_path(&config.map_file)
        .with_context(|| format!("map_file {}", config.map_file.display()))?;
    let grid = if config.map_file.exists() {
        persistence::load_map(&config.map_file, config.physics, &Dormant)
            .with_context(|| format!("loading map {}", config.map_file.display()))?
    } else {
        anyhow::ensure!(
            format == MapFormat::Native,
            "no map at {}, and a generated map can only be saved as .fcm",
            config.map_file.display()
        );
        let size = config.default_map;
        tracing::info!(
            "No map at {}, generating {}x{}x{} flatgrass",
            config.map_file.display(),
            size.width,
            size.length,
            size.height,
        );
        let grid = WorldGrid::flatgrass(size.width, size.length, size.height)
            .context("generating default map")?;
        persistence::save_map(&grid, &config.map_file)
            .with_context(|| format!("saving map {}", config.map_file.display()))?;
        grid
    };
    tracing::info!("Map ready in {:.2?}", start.elapsed());
    log_summary(&grid);

    Ok(())
}

fn log_summary(grid: &WorldGrid) {
    let solid = grid.blocks().iter().filter(|&&b| b != 0).count();
    tracing::info!(
        "{}x{}x{} map, {} solid blocks, spawn ({}, {}, {})",
        grid.width(),
        grid.length(),
        grid.height(),
        solid,
        grid.spawn.x,
        grid.spawn.y,
        grid.spawn.z,
    );
}
