use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard};

use terrane_blocks::{Biome, BlockType};
use terrane_world::{ChunkKey, Direction};

use crate::elevation::Elevation;
use crate::mesh::ChunkMesh;

const SX: usize = 16;
const SY: usize = 256;
const SZ: usize = 16;

/// Cells in one chunk.
pub const CHUNK_VOLUME: usize = SX * SY * SZ;

#[inline]
fn idx(x: usize, y: usize, z: usize) -> usize {
    x + SX * y + SX * SY * z
}

#[inline]
fn check_local(x: usize, y: usize, z: usize) {
    assert!(
        x < SX && y < SY && z < SZ,
        "local block index ({x}, {y}, {z}) outside 16x256x16 grid"
    );
}

#[inline]
fn y_in_range(y: i32) -> Option<usize> {
    (0..SY as i32).contains(&y).then_some(y as usize)
}

/// Ground heights and biomes of the 16x16 columns of a chunk, indexed `[x][z]`.
#[derive(Clone, Debug)]
pub struct ColumnMap {
    pub heights: [[i32; SZ]; SX],
    pub biomes: [[Biome; SZ]; SX],
    /// Dominant biome, taken from the center column.
    pub chunk_biome: Biome,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            heights: [[0; SZ]; SX],
            biomes: [[Biome::Plains; SZ]; SX],
            chunk_biome: Biome::Plains,
        }
    }
}

/// One 16x256x16 column of the world.
///
/// The block array sits behind its own lock; the mesh slot behind another so
/// that binding a mesh never waits on a block edit. Lifecycle flags are plain
/// atomics read by the driver thread without locking.
pub struct BlockGrid {
    key: ChunkKey,
    blocks: RwLock<Box<[BlockType]>>,
    heights: [[i32; SZ]; SX],
    biome: Biome,
    data_generated: AtomicBool,
    mesh_bound: AtomicBool,
    surface_generated: AtomicBool,
    blocks_changed: AtomicBool,
    linked: AtomicU8,
    mesh: Mutex<ChunkMesh>,
}

impl BlockGrid {
    /// An all-empty grid with flat zero heights.
    pub fn new(key: ChunkKey) -> Self {
        Self::from_parts(key, &ColumnMap::default(), vec![BlockType::Empty; CHUNK_VOLUME])
    }

    /// Fills every column from the ground up to its height with the fill
    /// block of that column's biome.
    pub fn filled(key: ChunkKey, columns: &ColumnMap) -> Self {
        let mut blocks = vec![BlockType::Empty; CHUNK_VOLUME];
        for x in 0..SX {
            for z in 0..SZ {
                let fill = columns.biomes[x][z].fill_block();
                let top = columns.heights[x][z].clamp(0, SY as i32) as usize;
                for y in 0..top {
                    blocks[idx(x, y, z)] = fill;
                }
            }
        }
        Self::from_parts(key, columns, blocks)
    }

    pub fn from_parts(key: ChunkKey, columns: &ColumnMap, blocks: Vec<BlockType>) -> Self {
        assert_eq!(blocks.len(), CHUNK_VOLUME, "chunk block array has wrong size");
        Self {
            key,
            blocks: RwLock::new(blocks.into_boxed_slice()),
            heights: columns.heights,
            biome: columns.chunk_biome,
            data_generated: AtomicBool::new(false),
            mesh_bound: AtomicBool::new(false),
            surface_generated: AtomicBool::new(false),
            blocks_changed: AtomicBool::new(false),
            linked: AtomicU8::new(0),
            mesh: Mutex::new(ChunkMesh::default()),
        }
    }

    #[inline]
    pub fn key(&self) -> ChunkKey {
        self.key
    }

    #[inline]
    pub fn origin(&self) -> (i32, i32) {
        self.key.origin()
    }

    #[inline]
    pub fn biome(&self) -> Biome {
        self.biome
    }

    /// Stored ground height of column `(x, z)`.
    #[inline]
    pub fn height_at(&self, x: usize, z: usize) -> i32 {
        self.heights[x][z]
    }

    /// Shared read access to the block array.
    pub fn view(&self) -> GridView<'_> {
        GridView {
            blocks: self.blocks.read().unwrap_or_else(PoisonError::into_inner),
        }
    }

    /// Block at an absolute height; heights outside `[0, 256)` read as empty.
    pub fn get(&self, x: usize, y: i32, z: usize) -> BlockType {
        self.view().get(x, y, z)
    }

    pub fn get_block(&self, x: usize, elevation: Elevation, z: usize) -> BlockType {
        self.get(x, elevation.resolve(self.height_at(x, z)), z)
    }

    /// Read with the raw-height convention (`500 < y < 1500` is surface relative).
    pub fn get_block_raw(&self, x: usize, y: i32, z: usize) -> BlockType {
        self.get_block(x, Elevation::from_raw(y), z)
    }

    /// Absolute height an elevation resolves to in column `(x, z)`, if it lies
    /// inside the grid.
    pub fn resolve_y(&self, x: usize, elevation: Elevation, z: usize) -> Option<usize> {
        y_in_range(elevation.resolve(self.height_at(x, z)))
    }

    /// Writes one block and marks the grid dirty.
    ///
    /// Panics when the local index or the resolved height is outside the grid.
    pub fn set_block(&self, x: usize, elevation: Elevation, z: usize, t: BlockType) {
        check_local(x, 0, z);
        let y = elevation.resolve(self.height_at(x, z));
        let Some(ly) = y_in_range(y) else {
            panic!("block write at ({x}, {y}, {z}) outside 16x256x16 grid");
        };
        let mut blocks = self.blocks.write().unwrap_or_else(PoisonError::into_inner);
        blocks[idx(x, ly, z)] = t;
        drop(blocks);
        self.mark_changed();
    }

    pub fn set_block_raw(&self, x: usize, y: i32, z: usize, t: BlockType) {
        self.set_block(x, Elevation::from_raw(y), z, t);
    }

    /// Applies a batch of writes under one lock. Writes whose height resolves
    /// outside the grid are skipped; returns how many landed.
    pub fn apply_edits<I>(&self, edits: I) -> usize
    where
        I: IntoIterator<Item = (usize, Elevation, usize, BlockType)>,
    {
        let mut blocks = self.blocks.write().unwrap_or_else(PoisonError::into_inner);
        let mut applied = 0;
        for (x, elevation, z, t) in edits {
            check_local(x, 0, z);
            if let Some(y) = y_in_range(elevation.resolve(self.heights[x][z])) {
                blocks[idx(x, y, z)] = t;
                applied += 1;
            }
        }
        drop(blocks);
        if applied > 0 {
            self.mark_changed();
        }
        applied
    }

    /// Copy of the cells on the given side, for meshing against this grid.
    pub fn border(&self, side: Direction) -> BorderPlane {
        let view = self.view();
        let mut cells = vec![BlockType::Empty; SX * SY].into_boxed_slice();
        for y in 0..SY {
            for t in 0..SX {
                let (x, z) = match side {
                    Direction::XPos => (SX - 1, t),
                    Direction::XNeg => (0, t),
                    Direction::ZPos => (t, SZ - 1),
                    Direction::ZNeg => (t, 0),
                };
                cells[t + SX * y] = view.get_local(x, y, z);
            }
        }
        BorderPlane { cells }
    }

    #[inline]
    pub fn data_generated(&self) -> bool {
        self.data_generated.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set_data_generated(&self, v: bool) {
        self.data_generated.store(v, Ordering::Release);
    }

    #[inline]
    pub fn mesh_bound(&self) -> bool {
        self.mesh_bound.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set_mesh_bound(&self, v: bool) {
        self.mesh_bound.store(v, Ordering::Release);
    }

    #[inline]
    pub fn surface_generated(&self) -> bool {
        self.surface_generated.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set_surface_generated(&self) {
        self.surface_generated.store(true, Ordering::Release);
    }

    #[inline]
    pub fn blocks_changed(&self) -> bool {
        self.blocks_changed.load(Ordering::Acquire)
    }

    #[inline]
    pub fn mark_changed(&self) {
        self.blocks_changed.store(true, Ordering::Release);
    }

    /// Clears the dirty flag, returning whether it was set.
    #[inline]
    pub fn take_changed(&self) -> bool {
        self.blocks_changed.swap(false, Ordering::AcqRel)
    }

    /// Records that the neighbor on `side` exists.
    #[inline]
    pub fn link(&self, side: Direction) {
        self.linked.fetch_or(1 << side.index(), Ordering::AcqRel);
    }

    #[inline]
    pub fn is_linked(&self, side: Direction) -> bool {
        self.linked.load(Ordering::Acquire) & (1 << side.index()) != 0
    }

    /// Replaces the mesh slot and publishes it through `data_generated`.
    pub fn store_mesh(&self, mesh: ChunkMesh) {
        let mut slot = self.mesh();
        *slot = mesh;
        self.set_mesh_bound(false);
        self.set_data_generated(true);
    }

    /// Locks the mesh slot.
    pub fn mesh(&self) -> MutexGuard<'_, ChunkMesh> {
        self.mesh.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for BlockGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockGrid")
            .field("origin", &self.origin())
            .field("biome", &self.biome)
            .field("data_generated", &self.data_generated())
            .field("mesh_bound", &self.mesh_bound())
            .finish_non_exhaustive()
    }
}

/// Read guard over a grid's blocks.
pub struct GridView<'a> {
    blocks: RwLockReadGuard<'a, Box<[BlockType]>>,
}

impl GridView<'_> {
    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> BlockType {
        check_local(x, y, z);
        self.blocks[idx(x, y, z)]
    }

    /// Heights outside `[0, 256)` read as empty.
    #[inline]
    pub fn get(&self, x: usize, y: i32, z: usize) -> BlockType {
        match y_in_range(y) {
            Some(y) => self.get_local(x, y, z),
            None => BlockType::Empty,
        }
    }
}

/// Cells on one vertical side of a grid, indexed by position along the edge
/// and height.
#[derive(Clone, Debug)]
pub struct BorderPlane {
    cells: Box<[BlockType]>,
}

impl BorderPlane {
    #[inline]
    pub fn get(&self, t: usize, y: usize) -> BlockType {
        self.cells[t + SX * y]
    }
}
