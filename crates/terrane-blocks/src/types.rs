use serde::{Deserialize, Serialize};

/// Block material tag. The discriminants are written to the wire as a raw
/// byte, so new variants go at the end.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    #[default]
    Empty = 0,
    GrassBlock,
    Dirt,
    Stone,
    Water,
    Sand,
    Snow,
    Cobblestone,
    OakPlanks,
    SprucePlanks,
    JunglePlanks,
    BirchPlanks,
    AcaciaPlanks,
    OakLog,
    SpruceLog,
    BirchLog,
    JungleLog,
    AcaciaLog,
    OakLeaves,
    Bookshelf,
    Glass,
    Path,
    Sandstone,
    Lava,
    Bedrock,
    Cactus,
    Ice,
    Grass,
}

impl BlockType {
    pub const COUNT: usize = 28;

    /// Every variant in discriminant order.
    pub const ALL: [BlockType; Self::COUNT] = [
        BlockType::Empty,
        BlockType::GrassBlock,
        BlockType::Dirt,
        BlockType::Stone,
        BlockType::Water,
        BlockType::Sand,
        BlockType::Snow,
        BlockType::Cobblestone,
        BlockType::OakPlanks,
        BlockType::SprucePlanks,
        BlockType::JunglePlanks,
        BlockType::BirchPlanks,
        BlockType::AcaciaPlanks,
        BlockType::OakLog,
        BlockType::SpruceLog,
        BlockType::BirchLog,
        BlockType::JungleLog,
        BlockType::AcaciaLog,
        BlockType::OakLeaves,
        BlockType::Bookshelf,
        BlockType::Glass,
        BlockType::Path,
        BlockType::Sandstone,
        BlockType::Lava,
        BlockType::Bedrock,
        BlockType::Cactus,
        BlockType::Ice,
        BlockType::Grass,
    ];

    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn from_u8(v: u8) -> Option<BlockType> {
        Self::ALL.get(v as usize).copied()
    }

    /// Anything but `Empty` occupies its cell.
    #[inline]
    pub fn is_solid(self) -> bool {
        self != BlockType::Empty
    }

    /// Passable for the "first opaque" march mode.
    #[inline]
    pub fn is_transparent(self) -> bool {
        matches!(self, BlockType::Empty | BlockType::Water)
    }
}

/// Coarse terrain classification of a column.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Biome {
    Tundra = 0,
    #[default]
    Plains,
    Desert,
    Taiga,
    Forest,
    Beach,
    Ocean,
    River,
}

impl Biome {
    #[inline]
    pub fn from_u8(v: u8) -> Option<Biome> {
        Some(match v {
            0 => Biome::Tundra,
            1 => Biome::Plains,
            2 => Biome::Desert,
            3 => Biome::Taiga,
            4 => Biome::Forest,
            5 => Biome::Beach,
            6 => Biome::Ocean,
            7 => Biome::River,
            _ => return None,
        })
    }

    /// The block every column of this biome is filled with up to its height.
    pub fn fill_block(self) -> BlockType {
        match self {
            Biome::Tundra => BlockType::Snow,
            Biome::Plains | Biome::Taiga => BlockType::Grass,
            Biome::Desert | Biome::Beach => BlockType::Sand,
            Biome::Forest => BlockType::Stone,
            Biome::Ocean | Biome::River => BlockType::Water,
        }
    }

    /// Fill for a raw biome tag; unknown tags fall back to grass.
    pub fn fill_block_for_tag(tag: u8) -> BlockType {
        Biome::from_u8(tag).map_or(BlockType::Grass, Biome::fill_block)
    }
}
