use proptest::prelude::*;
use terrane_blocks::BlockType;
use terrane_chunk::{BlockGrid, CHUNK_VOLUME, ColumnMap, Elevation};
use terrane_world::ChunkKey;

proptest! {
    #[test]
    fn raw_heights_roundtrip(y in -10_000i32..10_000) {
        prop_assert_eq!(Elevation::from_raw(y).to_raw(), y);
    }

    #[test]
    fn surface_writes_land_at_height_plus_offset(
        x in 0usize..16, z in 0usize..16, h in 0i32..200, dy in -20i32..40,
    ) {
        let mut cols = ColumnMap::default();
        cols.heights[x][z] = h;
        let g = BlockGrid::from_parts(ChunkKey::encode(0, 0), &cols, vec![BlockType::Empty; CHUNK_VOLUME]);
        let y = h + dy;
        prop_assume!((0..256).contains(&y));
        g.set_block_raw(x, 1000 + dy, z, BlockType::Glass);
        prop_assert_eq!(g.get(x, y, z), BlockType::Glass);
        prop_assert_eq!(g.resolve_y(x, Elevation::Surface(dy), z), Some(y as usize));
    }
}
