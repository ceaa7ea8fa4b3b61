use lumen_world::{ChunkDims, Side, VoxelPos};
use proptest::prelude::*;

fn dim() -> impl Strategy<Value = usize> {
    1usize..=8
}

fn world_i32() -> impl Strategy<Value = i32> {
    -100_000i32..=100_000
}

proptest! {
    // Floor division: local coordinates are always in range and rebuild the same voxel
    #[test]
    fn chunk_and_local_rebuild_position(x in world_i32(), y in world_i32(), z in world_i32(), sx in dim(), sy in dim(), sz in dim()) {
        let dims = ChunkDims::new(sx, sy, sz);
        let p = VoxelPos::new(x, y, z);
        let c = p.chunk(dims);
        let (lx, ly, lz) = p.local(dims);
        prop_assert!(dims.contains_local(lx, ly, lz));
        prop_assert_eq!(VoxelPos::from_chunk_local(c, dims, lx, ly, lz), p);
    }

    // A step across a chunk face lands in the adjacent chunk, never further
    #[test]
    fn step_moves_at_most_one_chunk(x in world_i32(), y in world_i32(), z in world_i32(), sx in dim(), sy in dim(), sz in dim()) {
        let dims = ChunkDims::new(sx, sy, sz);
        let p = VoxelPos::new(x, y, z);
        for side in Side::ALL {
            let c0 = p.chunk(dims);
            let c1 = p.step(side).chunk(dims);
            prop_assert!(c1 == c0 || c1 == c0.adjacent(side));
        }
    }

    // idx maps each local voxel to a unique in-range index
    #[test]
    fn idx_is_unique_and_in_range(sx in dim(), sy in dim(), sz in dim()) {
        let dims = ChunkDims::new(sx, sy, sz);
        let mut seen = vec![false; dims.volume()];
        for y in 0..sy { for z in 0..sz { for x in 0..sx {
            let i = dims.idx(x, y, z);
            prop_assert!(i < dims.volume());
            prop_assert!(!seen[i]);
            seen[i] = true;
        }}}
        prop_assert!(seen.into_iter().all(|b| b));
    }
}

#[test]
fn negative_positions_use_floor_division() {
    let dims = ChunkDims::cube(16);
    let p = VoxelPos::new(-1, -16, -17);
    let c = p.chunk(dims);
    assert_eq!((c.cx, c.cy, c.cz), (-1, -1, -2));
    assert_eq!(p.local(dims), (15, 0, 15));
}
