mod common;

use common::TestWorld;
use lumen_chunk::{ChunkData, ChunkStatus, LightChannel, MAX_LIGHT, Voxel};
use lumen_lighting::{SkyExposure, light_chunk_interior, merge_chunk};
use lumen_world::{ChunkCoord, ChunkDims, Side, VoxelPos};
use proptest::prelude::*;

type Cell = (i32, i32, i32);

fn cell() -> impl Strategy<Value = Cell> {
    (-4i32..8, -4i32..8, -4i32..8)
}

fn torches() -> impl Strategy<Value = Vec<(Cell, u8)>> {
    prop::collection::vec((cell(), 1u8..=15), 0..6)
}

fn stones() -> impl Strategy<Value = Vec<Cell>> {
    prop::collection::vec(cell(), 0..40)
}

/// 3x3x3 chunks of 4^3 around the origin, every one ready and interior-lit.
fn build_cube(torches: &[(Cell, u8)], stones: &[Cell], sky: bool) -> TestWorld {
    let dims = ChunkDims::cube(4);
    let w = TestWorld::new(dims);
    for cz in -1..=1 {
        for cy in -1..=1 {
            for cx in -1..=1 {
                let coord = ChunkCoord::new(cx, cy, cz);
                let exposure = if sky && cy == 1 {
                    SkyExposure::Open
                } else {
                    SkyExposure::Covered
                };
                w.add_with((cx, cy, cz), exposure, ChunkStatus::Ready, |d| {
                    for &s in stones {
                        let p = VoxelPos::from(s);
                        if p.chunk(dims) == coord {
                            let (x, y, z) = p.local(dims);
                            d.set_voxel(x, y, z, Voxel::STONE);
                        }
                    }
                    for &(t, level) in torches {
                        let p = VoxelPos::from(t);
                        if p.chunk(dims) == coord {
                            let (x, y, z) = p.local(dims);
                            d.set_voxel(x, y, z, Voxel::torch(level));
                        }
                    }
                });
            }
        }
    }
    w
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    // Flood over a full neighborhood drains; every lit voxel is either a source
    // or one step dimmer than some neighbor, and nothing exceeds the ceiling
    #[test]
    fn merge_terminates_and_respects_decay(torches in torches(), stones in stones()) {
        let w = build_cube(&torches, &stones, false);
        let center = w.chunk((0, 0, 0));
        let report = merge_chunk(w.store.as_ref(), &center).unwrap();
        prop_assert_eq!(report.present, 27);
        for p in w.positions(-1, 1) {
            let v = w.light(LightChannel::BlockLight, p).unwrap();
            prop_assert!(v <= MAX_LIGHT);
            let lum = w.voxel(p).unwrap().luminance;
            if v > lum {
                let fed = Side::ALL.iter().any(|&s| {
                    w.light(LightChannel::BlockLight, p.step(s))
                        .is_some_and(|n| n > v)
                });
                prop_assert!(fed, "{:?} has {} with no brighter neighbor", p, v);
            }
        }
    }

    // A converged neighborhood is a fixed point of merging
    #[test]
    fn second_merge_changes_nothing(torches in torches(), stones in stones(), sky in any::<bool>()) {
        let w = build_cube(&torches, &stones, sky);
        let center = w.chunk((0, 0, 0));
        merge_chunk(w.store.as_ref(), &center).unwrap();
        let first = w.snapshot();
        let again = merge_chunk(w.store.as_ref(), &center).unwrap();
        prop_assert_eq!(again.stats.total(), 0);
        prop_assert_eq!(first, w.snapshot());
    }

    // Two chunks merged in turn light up exactly like one volume spanning both,
    // on every channel; open sky stays well inside the regen depth
    #[test]
    fn boundary_matches_single_volume(
        stones in prop::collection::vec((0i32..12, 0i32..6, 0i32..6), 0..40),
        level in 8u8..=15,
        sky in any::<bool>(),
    ) {
        let exposure = if sky { SkyExposure::Open } else { SkyExposure::Covered };
        let dims = ChunkDims::cube(6);
        let torch = VoxelPos::new(3, 3, 3);
        let w = TestWorld::new(dims);
        let place = |d: &mut ChunkData| {
            let coord = d.coord;
            for &s in &stones {
                let p = VoxelPos::from(s);
                if p.chunk(dims) == coord {
                    let (x, y, z) = p.local(dims);
                    d.set_voxel(x, y, z, Voxel::STONE);
                }
            }
            if torch.chunk(dims) == coord {
                let (x, y, z) = torch.local(dims);
                d.set_voxel(x, y, z, Voxel::torch(level));
            }
        };
        let a = w.add_with((0, 0, 0), exposure, ChunkStatus::Ready, &place);
        let b = w.add_with((1, 0, 0), exposure, ChunkStatus::Ready, &place);
        merge_chunk(w.store.as_ref(), &a).unwrap();
        merge_chunk(w.store.as_ref(), &b).unwrap();

        let mut whole = ChunkData::new(ChunkCoord::default(), ChunkDims::new(12, 6, 6));
        for &(x, y, z) in &stones {
            whole.set_voxel(x as usize, y as usize, z as usize, Voxel::STONE);
        }
        whole.set_voxel(3, 3, 3, Voxel::torch(level));
        light_chunk_interior(&mut whole, exposure);

        for ch in LightChannel::ALL {
            for y in 0..6 {
                for z in 0..6 {
                    for x in 0..12 {
                        let p = VoxelPos::new(x as i32, y as i32, z as i32);
                        prop_assert_eq!(
                            w.light(ch, p),
                            Some(whole.light(ch, x, y, z)),
                            "{} at {:?}", ch.label(), p
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn lone_chunk_merge_keeps_its_own_light() {
    let w = TestWorld::new(ChunkDims::cube(8));
    let c = w.add((0, 0, 0), |d| {
        d.set_voxel(1, 1, 1, Voxel::torch(15));
        d.set_voxel(6, 6, 6, Voxel::torch(9));
        d.set_voxel(3, 3, 3, Voxel::STONE);
    });
    let before = w.snapshot();
    let report = merge_chunk(w.store.as_ref(), &c).unwrap();
    assert_eq!(report.present, 1);
    assert_eq!(report.pull_only, 0);
    assert_eq!(report.stats.total(), 0);
    assert_eq!(before, w.snapshot());
    assert_eq!(w.light(LightChannel::BlockLight, VoxelPos::new(1, 1, 2)), Some(14));
}
