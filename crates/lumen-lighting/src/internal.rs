//! Light a single chunk on its own, before any neighbor is merged in.

use lumen_chunk::{ChunkData, LightChannel, MAX_SUNLIGHT_REGEN};
use lumen_world::VoxelPos;

use crate::{MergePropagators, Neighborhood, PipelineStats, Stage};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkyExposure {
    /// Nothing above the chunk; its top layer sees the sky.
    Open,
    Covered,
}

/// Reset all light in `data` and flood it from the chunk's own sources:
/// luminous voxels, plus the top layer when the sky is open.
pub fn light_chunk_interior(data: &mut ChunkData, sky: SkyExposure) -> PipelineStats {
    for ch in LightChannel::ALL {
        data.fill_light(ch, 0);
    }
    let (coord, dims) = (data.coord, data.dims);
    let mut emitters = Vec::new();
    for y in 0..dims.sy {
        for z in 0..dims.sz {
            for x in 0..dims.sx {
                let v = data.voxel(x, y, z);
                if v.luminance > 0 {
                    emitters.push((VoxelPos::from_chunk_local(coord, dims, x, y, z), v.luminance));
                }
            }
        }
    }
    let mut sky_cells = Vec::new();
    if sky == SkyExposure::Open && dims.sy > 0 {
        let top = dims.sy - 1;
        for z in 0..dims.sz {
            for x in 0..dims.sx {
                if !data.voxel(x, top, z).casts_shadow() {
                    sky_cells.push(VoxelPos::from_chunk_local(coord, dims, x, top, z));
                }
            }
        }
    }

    let hood = Neighborhood::new(&mut *data);
    let mut props = MergePropagators::new(&hood);
    {
        let block = props.stage_mut(Stage::BlockLight);
        for (pos, lum) in emitters {
            block.seed(pos, lum);
        }
    }
    {
        let regen = props.stage_mut(Stage::SunlightRegen);
        for pos in sky_cells {
            regen.seed(pos, MAX_SUNLIGHT_REGEN);
        }
    }
    let stats = props.finalize();
    data.deflate_sunlight();
    log::trace!(target: "lighting", "interior {:?}: {}", coord, stats);
    stats
}
