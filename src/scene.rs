use std::fmt::Write;
use std::sync::Arc;
use std::time::Instant;

use clap::ValueEnum;
use lumen_chunk::{ChunkData, ChunkProvider, ChunkStore, LightChannel, Voxel};
use lumen_lighting::{LightMerger, MergeError, MergerConfig, SkyExposure, light_chunk_interior};
use lumen_runtime::TaskPool;
use lumen_world::{ChunkCoord, ChunkDims, VoxelPos};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Scene {
    /// A torch beside a wall that reaches into the next chunk.
    Torch,
    /// Open sky over a stone roof.
    Skylight,
}

impl Scene {
    fn sky(self, coord: ChunkCoord) -> SkyExposure {
        match self {
            Scene::Skylight if coord.cy == 0 => SkyExposure::Open,
            _ => SkyExposure::Covered,
        }
    }

    fn fill(self, data: &mut ChunkData) {
        let ChunkDims { sx, sy, sz } = data.dims;
        if data.coord.cy < 0 {
            data.fill_voxels(Voxel::STONE);
            return;
        }
        if data.coord != ChunkCoord::new(0, 0, 0) {
            return;
        }
        match self {
            Scene::Torch => {
                for y in 0..sy {
                    for z in 0..sz * 3 / 4 {
                        data.set_voxel(sx - 1, y, z, Voxel::STONE);
                    }
                }
                data.set_voxel(sx / 2, sy / 2, sz / 2, Voxel::torch(15));
            }
            Scene::Skylight => {
                let roof = sy * 3 / 4;
                for z in 1..sz.saturating_sub(1) {
                    for x in 1..sx.saturating_sub(1) {
                        data.set_voxel(x, roof, z, Voxel::STONE);
                    }
                }
            }
        }
    }
}

/// Two layers of chunks, `radius` chunks out from the origin on x and z.
/// Each chunk is generated, lit on its own, then marked ready.
pub fn build_world(scene: Scene, dims: ChunkDims, radius: i32) -> Arc<ChunkStore> {
    let store = Arc::new(ChunkStore::new(dims));
    for cy in -1..=0 {
        for cz in -radius..=radius {
            for cx in -radius..=radius {
                let coord = ChunkCoord::new(cx, cy, cz);
                let chunk = store.create(coord);
                match chunk.lock() {
                    Ok(mut data) => {
                        scene.fill(&mut data);
                        light_chunk_interior(&mut data, scene.sky(coord));
                    }
                    Err(e) => {
                        log::warn!(target: "lumen", "{}", e);
                        continue;
                    }
                }
                store.mark_ready(coord);
            }
        }
    }
    log::info!(target: "lumen", "built {:?} world: {} chunks of {:?}", scene, store.len(), dims);
    store
}

/// Merge every loaded chunk once, one at a time, through a `LightMerger`.
pub fn merge_all(
    store: &Arc<ChunkStore>,
    pool: Arc<TaskPool>,
    config: MergerConfig,
) -> Result<usize, MergeError> {
    let t0 = Instant::now();
    let mut merger: LightMerger<ChunkCoord> = LightMerger::new(store.clone(), pool, config);
    let mut merged = 0;
    for coord in store.coords() {
        let Some(chunk) = store.chunk(coord) else {
            continue;
        };
        merger.begin_merge(chunk, coord)?;
        if merger.complete_merge()?.is_some() {
            merged += 1;
        }
    }
    merger.shutdown();
    log::info!(target: "lumen", "merged {} chunks in {:.2?}", merged, t0.elapsed());
    Ok(merged)
}

fn cell(store: &ChunkStore, channel: LightChannel, p: VoxelPos) -> char {
    let dims = store.dims();
    let Some(chunk) = store.chunk_unready(p.chunk(dims)) else {
        return ' ';
    };
    let Ok(data) = chunk.lock() else {
        return '?';
    };
    let (x, y, z) = p.local(dims);
    if data.voxel(x, y, z).is_opaque() {
        return '#';
    }
    match data.light(channel, x, y, z) {
        0 => '.',
        v => char::from_digit(u32::from(v), 16).unwrap_or('+'),
    }
}

/// Horizontal slice at world height `y`, one hex digit per voxel, rows along z.
pub fn render_slice(store: &ChunkStore, channel: LightChannel, radius: i32, y: i32) -> String {
    let (sx, _, sz) = store.dims().as_i32();
    let mut out = String::new();
    let _ = writeln!(out, "{} light at y={}", channel.label(), y);
    for z in -radius * sz..(radius + 1) * sz {
        for x in -radius * sx..(radius + 1) * sx {
            out.push(cell(store, channel, VoxelPos::new(x, y, z)));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn light(store: &ChunkStore, channel: LightChannel, p: VoxelPos) -> u8 {
        let c = store.chunk_unready(p.chunk(store.dims())).unwrap();
        let (x, y, z) = p.local(store.dims());
        c.lock().unwrap().light(channel, x, y, z)
    }

    #[test]
    fn torch_light_wraps_into_next_chunk() {
        let store = build_world(Scene::Torch, ChunkDims::cube(8), 1);
        assert_eq!(store.len(), 18);
        assert_eq!(light(&store, LightChannel::BlockLight, VoxelPos::new(8, 4, 4)), 0);

        let pool = Arc::new(TaskPool::new(2).unwrap());
        let merged = merge_all(&store, pool, MergerConfig::default()).unwrap();
        assert_eq!(merged, 18);
        assert_eq!(light(&store, LightChannel::BlockLight, VoxelPos::new(4, 4, 4)), 15);
        assert!(light(&store, LightChannel::BlockLight, VoxelPos::new(8, 4, 4)) > 0);

        let slice = render_slice(&store, LightChannel::BlockLight, 1, 4);
        assert!(slice.contains('f'));
        assert!(slice.contains('#'));
        assert_eq!(slice.lines().count(), 1 + 24);
    }

    #[test]
    fn roof_shades_what_is_under_it() {
        let store = build_world(Scene::Skylight, ChunkDims::cube(8), 1);
        let pool = Arc::new(TaskPool::new(2).unwrap());
        merge_all(&store, pool, MergerConfig::default()).unwrap();
        assert_eq!(light(&store, LightChannel::Sunlight, VoxelPos::new(0, 4, 0)), 15);
        assert_eq!(light(&store, LightChannel::Sunlight, VoxelPos::new(4, 4, 4)), 12);
        assert_eq!(light(&store, LightChannel::Sunlight, VoxelPos::new(4, -1, 4)), 0);
    }

    struct Targets(std::sync::Mutex<Vec<String>>);

    impl log::Log for Targets {
        fn enabled(&self, _: &log::Metadata) -> bool {
            true
        }
        fn log(&self, record: &log::Record) {
            if let Ok(mut seen) = self.0.lock() {
                seen.push(format!("{}: {}", record.target(), record.args()));
            }
        }
        fn flush(&self) {}
    }

    static TARGETS: Targets = Targets(std::sync::Mutex::new(Vec::new()));

    #[test]
    fn scene_messages_use_the_lumen_target() {
        let _ = log::set_logger(&TARGETS);
        log::set_max_level(log::LevelFilter::Info);

        let store = build_world(Scene::Torch, ChunkDims::cube(4), 0);
        let pool = Arc::new(TaskPool::new(1).unwrap());
        merge_all(&store, pool, MergerConfig::default()).unwrap();

        let seen = TARGETS.0.lock().unwrap();
        assert!(seen.iter().any(|l| l.starts_with("lumen: built Torch world: 2 chunks")), "{:?}", *seen);
        assert!(seen.iter().any(|l| l.starts_with("lumen: merged 2 chunks")), "{:?}", *seen);
    }
}
