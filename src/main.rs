mod config;
mod scene;

use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use lumen_chunk::LightChannel;
use lumen_runtime::TaskPool;

use crate::config::LumenConfig;
use crate::scene::{Scene, build_world, merge_all, render_slice};

#[derive(Parser, Debug)]
#[command(name = "lumen", about = "Light a small voxel world chunk by chunk and print a slice")]
struct Cli {
    /// TOML config file (world, runtime and merger tables)
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = Scene::Torch)]
    scene: Scene,
    /// Chunks on each side of the origin along x and z
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(i32).range(0..=8))]
    radius: i32,
    /// World height of the printed slice (default: middle of the upper layer)
    #[arg(long, allow_hyphen_values = true)]
    slice_y: Option<i32>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => LumenConfig::from_path(path)?,
        None => LumenConfig::default(),
    };
    let dims = cfg.world.dims();
    let pool = Arc::new(TaskPool::from_config(&cfg.runtime)?);

    let store = build_world(cli.scene, dims, cli.radius);
    merge_all(&store, pool, cfg.merger.clone())?;

    let y = cli.slice_y.unwrap_or(dims.sy as i32 / 2);
    for channel in [LightChannel::BlockLight, LightChannel::Sunlight] {
        println!("{}", render_slice(&store, channel, cli.radius, y));
    }
    Ok(())
}
