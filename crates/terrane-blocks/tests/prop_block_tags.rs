use proptest::prelude::*;
use terrane_blocks::{Biome, BlockType};

#[test]
fn wire_tags_are_stable() {
    assert_eq!(BlockType::Empty.as_u8(), 0);
    assert_eq!(BlockType::Water.as_u8(), 4);
    assert_eq!(BlockType::OakLog.as_u8(), 13);
    assert_eq!(BlockType::Path.as_u8(), 21);
    assert_eq!(BlockType::Grass.as_u8(), 27);
    for (i, b) in BlockType::ALL.iter().enumerate() {
        assert_eq!(b.as_u8() as usize, i);
    }
}

#[test]
fn biome_fill_table() {
    assert_eq!(Biome::Tundra.fill_block(), BlockType::Snow);
    assert_eq!(Biome::Plains.fill_block(), BlockType::Grass);
    assert_eq!(Biome::Desert.fill_block(), BlockType::Sand);
    assert_eq!(Biome::Taiga.fill_block(), BlockType::Grass);
    assert_eq!(Biome::Forest.fill_block(), BlockType::Stone);
    assert_eq!(Biome::Beach.fill_block(), BlockType::Sand);
    assert_eq!(Biome::Ocean.fill_block(), BlockType::Water);
    assert_eq!(Biome::River.fill_block(), BlockType::Water);
    assert_eq!(Biome::fill_block_for_tag(200), BlockType::Grass);
}

#[test]
fn serde_names_are_snake_case() {
    #[derive(serde::Deserialize)]
    struct Row {
        block: BlockType,
    }
    let row: Row = toml::from_str("block = \"oak_leaves\"").unwrap();
    assert_eq!(row.block, BlockType::OakLeaves);
}

proptest! {
    #[test]
    fn from_u8_accepts_exactly_known_tags(v in any::<u8>()) {
        match BlockType::from_u8(v) {
            Some(b) => prop_assert_eq!(b.as_u8(), v),
            None => prop_assert!(v as usize >= BlockType::COUNT),
        }
    }

    #[test]
    fn transparent_blocks_are_empty_or_water(v in 0u8..28) {
        let b = BlockType::from_u8(v).unwrap();
        prop_assert_eq!(b.is_transparent(), matches!(b, BlockType::Empty | BlockType::Water));
        prop_assert_eq!(b.is_solid(), b != BlockType::Empty);
    }
}
