use terrane_blocks::BlockType;
use terrane_chunk::Elevation;
use terrane_world::Direction;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StructureKind {
    /// Trees carry the absolute ground height of their trunk column so the
    /// crown stays level when it spills over sloped neighbors.
    OakTree { ground: i32 },
    SpruceTree { ground: i32 },
    VillageCenter,
    VillageRoad,
    House,
    Library,
}

/// A placed structure: what, where (world column) and which way it faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Structure {
    pub kind: StructureKind,
    pub x: i32,
    pub z: i32,
    pub orient: Direction,
}

impl Structure {
    pub fn new(kind: StructureKind, x: i32, z: i32) -> Self {
        Self {
            kind,
            x,
            z,
            orient: Direction::XPos,
        }
    }

    pub fn facing(kind: StructureKind, x: i32, z: i32, orient: Direction) -> Self {
        Self { kind, x, z, orient }
    }

    #[inline]
    pub fn is_building(&self) -> bool {
        matches!(self.kind, StructureKind::House | StructureKind::Library)
    }
}

/// Destination of carved blocks, addressed by world column.
pub trait BlockSink {
    fn set_block(&mut self, x: i32, elevation: Elevation, z: i32, t: BlockType);
}

impl<S: BlockSink + ?Sized> BlockSink for &mut S {
    fn set_block(&mut self, x: i32, elevation: Elevation, z: i32, t: BlockType) {
        (**self).set_block(x, elevation, z, t);
    }
}

impl BlockSink for Vec<(i32, Elevation, i32, BlockType)> {
    fn set_block(&mut self, x: i32, elevation: Elevation, z: i32, t: BlockType) {
        self.push((x, elevation, z, t));
    }
}
