use proptest::prelude::*;
use terrane_world::{ChunkKey, Direction};

#[test]
fn boundary_pairs_roundtrip() {
    let edges = [i32::MIN, i32::MIN + 1, -1, 0, 1, i32::MAX - 1, i32::MAX];
    for &x in &edges {
        for &z in &edges {
            assert_eq!(ChunkKey::encode(x, z).decode(), (x, z), "({x}, {z})");
        }
    }
}

#[test]
fn all_ones_key_is_minus_one_pair() {
    assert_eq!(ChunkKey::from_raw(-1).decode(), (-1, -1));
    assert_eq!(ChunkKey::encode(-1, -1).raw(), -1);
    assert_eq!(ChunkKey::encode(0, -1).raw(), 0x0000_0000_FFFF_FFFF);
}

proptest! {
    #[test]
    fn encode_decode_roundtrip(x in any::<i32>(), z in any::<i32>()) {
        prop_assert_eq!(ChunkKey::encode(x, z).decode(), (x, z));
    }

    #[test]
    fn containing_is_aligned_and_covers(wx in -1_000_000i32..1_000_000, wz in -1_000_000i32..1_000_000) {
        let (ox, oz) = ChunkKey::containing(wx, wz).origin();
        prop_assert_eq!(ox.rem_euclid(16), 0);
        prop_assert_eq!(oz.rem_euclid(16), 0);
        prop_assert!(ox <= wx && wx < ox + 16);
        prop_assert!(oz <= wz && wz < oz + 16);
        let (lx, lz) = ChunkKey::local(wx, wz);
        prop_assert_eq!((ox + lx as i32, oz + lz as i32), (wx, wz));
    }

    #[test]
    fn neighbor_of_neighbor_is_self(wx in -100_000i32..100_000, wz in -100_000i32..100_000, d in 0usize..4) {
        let k = ChunkKey::containing(wx, wz);
        let dir = Direction::ALL[d];
        prop_assert_eq!(k.neighbor(dir).neighbor(dir.opposite()), k);
    }
}
