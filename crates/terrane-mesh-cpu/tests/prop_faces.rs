use proptest::prelude::*;

use terrane_blocks::BlockType;
use terrane_chunk::{BlockGrid, Elevation};
use terrane_mesh_cpu::{NeighborPlanes, build_chunk_mesh};
use terrane_world::ChunkKey;

// Without neighbors every face of a solid cell that borders an empty cell or
// the outside of the grid is drawn, and nothing else.
fn expected_faces(cells: &[(usize, usize, usize)]) -> usize {
    let solid = |x: i32, y: i32, z: i32| {
        cells
            .iter()
            .any(|&(cx, cy, cz)| (cx as i32, cy as i32, cz as i32) == (x, y, z))
    };
    let mut n = 0;
    let mut uniq: Vec<_> = cells.to_vec();
    uniq.sort();
    uniq.dedup();
    for &(x, y, z) in &uniq {
        let (x, y, z) = (x as i32, y as i32, z as i32);
        for (dx, dy, dz) in [(1, 0, 0), (-1, 0, 0), (0, 1, 0), (0, -1, 0), (0, 0, 1), (0, 0, -1)] {
            let (nx, ny, nz) = (x + dx, y + dy, z + dz);
            let outside = !(0..16).contains(&nx) || !(0..256).contains(&ny) || !(0..16).contains(&nz);
            if outside || !solid(nx, ny, nz) {
                n += 1;
            }
        }
    }
    n
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn quad_count_matches_exposed_faces(
        cells in prop::collection::vec((0usize..16, 0usize..256, 0usize..16), 0..40)
    ) {
        let g = BlockGrid::new(ChunkKey::encode(0, 0));
        for &(x, y, z) in &cells {
            g.set_block(x, Elevation::Absolute(y as i32), z, BlockType::Stone);
        }
        let mesh = {
            let view = g.view();
            build_chunk_mesh(&view, &NeighborPlanes::none())
        };
        prop_assert_eq!(mesh.quad_count(), expected_faces(&cells));
        prop_assert_eq!(mesh.vertex_count(), mesh.quad_count() * 4);
        prop_assert_eq!(mesh.col.len(), mesh.vertex_count() * 4);
    }
}
