use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::Instant;

use hashbrown::{HashMap, HashSet};
use terrane_blocks::BlockType;
use terrane_chunk::march::{ground_contact, sweep_axes};
use terrane_chunk::{BlockGrid, ColumnMap, Elevation, MarchHit, MarchMode, grid_march};
use terrane_edit::{DeferredEdit, DeferredEdits, affected_chunks};
use terrane_geom::{IVec3, Vec3};
use terrane_mesh_cpu::{NeighborPlanes, mesh_grid};
use terrane_structures::{BlockSink, Structure, StructurePlanner};
use terrane_world::{
    CHUNK_HEIGHT, CHUNK_SIZE, ChunkKey, Direction, NoiseField, RegionKey, WorldGenParams, ZoneKey,
};

use crate::error::TerrainError;
use crate::permits::GenerationPermits;
use crate::render::{DrawCounts, RenderSink, ViewWindow};

pub enum ChunkEntry {
    /// Generation has been claimed but the grid is not published yet.
    Pending,
    /// Published and readable; structures and deferred edits still landing.
    Decorating(Arc<BlockGrid>),
    Ready(Arc<BlockGrid>),
}

impl ChunkEntry {
    /// The published grid, whether or not decoration has finished.
    pub fn grid(&self) -> Option<&Arc<BlockGrid>> {
        match self {
            ChunkEntry::Pending => None,
            ChunkEntry::Decorating(grid) | ChunkEntry::Ready(grid) => Some(grid),
        }
    }
}

/// Result of [`Terrain::get_or_create_entry`]. Only the caller that sees
/// `Created` is expected to generate the chunk; `Pending` covers chunks that
/// are claimed or still decorating.
#[derive(Clone, Debug)]
pub enum EntrySlot {
    Created(ChunkKey),
    Pending(ChunkKey),
    Ready(Arc<BlockGrid>),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldInit {
    pub seed: i32,
    pub spawn: Vec3,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TerrainStats {
    pub ready: usize,
    pub pending: usize,
    pub zones: usize,
    pub regions: usize,
    pub deferred_chunks: usize,
    pub deferred_edits: usize,
    pub village_runs: usize,
    pub permits_in_use: usize,
}

enum RegionState {
    Empty,
    Village { center: (i32, i32) },
}

/// The chunk store: every generated grid keyed by chunk origin, plus the
/// bookkeeping that keeps generation and edits consistent across threads.
///
/// Lock order is chunk map, then deferred edits. The region registry and the
/// zone set are only ever taken alone.
pub struct Terrain {
    field: NoiseField,
    planner: StructurePlanner,
    chunks: Mutex<HashMap<ChunkKey, ChunkEntry>>,
    /// Signalled, with the chunk map lock, whenever an entry turns `Ready`.
    settled: Condvar,
    zones: Mutex<HashSet<ZoneKey>>,
    deferred: Mutex<DeferredEdits>,
    regions: Mutex<HashMap<RegionKey, RegionState>>,
    permits: GenerationPermits,
    village_runs: AtomicUsize,
    world_init: OnceLock<WorldInit>,
}

impl Terrain {
    pub fn new(params: &WorldGenParams, gen_permits: usize) -> Self {
        Self {
            field: NoiseField::new(params),
            planner: StructurePlanner::new(params),
            chunks: Mutex::new(HashMap::new()),
            settled: Condvar::new(),
            zones: Mutex::new(HashSet::new()),
            deferred: Mutex::new(DeferredEdits::new()),
            regions: Mutex::new(HashMap::new()),
            permits: GenerationPermits::new(gen_permits),
            village_runs: AtomicUsize::new(0),
            world_init: OnceLock::new(),
        }
    }

    #[inline]
    pub fn params(&self) -> &WorldGenParams {
        self.planner.params()
    }

    #[inline]
    pub fn field(&self) -> &NoiseField {
        &self.field
    }

    #[inline]
    pub fn permits(&self) -> &GenerationPermits {
        &self.permits
    }

    fn lock_chunks(&self) -> MutexGuard<'_, HashMap<ChunkKey, ChunkEntry>> {
        self.chunks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_deferred(&self) -> MutexGuard<'_, DeferredEdits> {
        self.deferred.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_regions(&self) -> MutexGuard<'_, HashMap<RegionKey, RegionState>> {
        self.regions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_zones(&self) -> MutexGuard<'_, HashSet<ZoneKey>> {
        self.zones.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn has_chunk_at(&self, wx: i32, wz: i32) -> bool {
        let key = ChunkKey::containing(wx, wz);
        self.lock_chunks().get(&key).is_some_and(|e| e.grid().is_some())
    }

    pub fn get_or_create_entry(&self, wx: i32, wz: i32) -> EntrySlot {
        let key = ChunkKey::containing(wx, wz);
        let mut chunks = self.lock_chunks();
        match chunks.get(&key) {
            Some(ChunkEntry::Ready(grid)) => EntrySlot::Ready(Arc::clone(grid)),
            Some(ChunkEntry::Pending | ChunkEntry::Decorating(_)) => EntrySlot::Pending(key),
            None => {
                chunks.insert(key, ChunkEntry::Pending);
                EntrySlot::Created(key)
            }
        }
    }

    pub fn chunk(&self, key: ChunkKey) -> Option<Arc<BlockGrid>> {
        self.lock_chunks().get(&key).and_then(ChunkEntry::grid).cloned()
    }

    /// Blocks until the chunk at `key` has finished generating.
    fn wait_ready(&self, key: ChunkKey) -> Arc<BlockGrid> {
        let mut chunks = self.lock_chunks();
        loop {
            if let Some(ChunkEntry::Ready(grid)) = chunks.get(&key) {
                return Arc::clone(grid);
            }
            chunks = self
                .settled
                .wait(chunks)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Deferred edits still queued for `key`.
    pub fn deferred_for(&self, key: ChunkKey) -> usize {
        self.lock_deferred().pending(key)
    }

    #[inline]
    pub fn chunk_at(&self, wx: i32, wz: i32) -> Option<Arc<BlockGrid>> {
        self.chunk(ChunkKey::containing(wx, wz))
    }

    /// Block at a world position, reading `y` with the raw-height convention.
    pub fn get_block_at(&self, x: i32, y: i32, z: i32) -> Result<BlockType, TerrainError> {
        let grid = self
            .chunk_at(x, z)
            .ok_or(TerrainError::NotLoaded { x, y, z })?;
        if !(0..CHUNK_HEIGHT).contains(&y) {
            return Ok(BlockType::Empty);
        }
        let (lx, lz) = ChunkKey::local(x, z);
        Ok(grid.get_block_raw(lx, y, lz))
    }

    /// Like [`Terrain::get_block_at`], with unloaded chunks reading as empty.
    pub fn block_or_empty(&self, cell: IVec3) -> BlockType {
        self.get_block_at(cell.x, cell.y, cell.z)
            .unwrap_or(BlockType::Empty)
    }

    pub fn set_block_at(&self, x: i32, y: i32, z: i32, t: BlockType) {
        self.set_block_elevation(x, Elevation::from_raw(y), z, t);
    }

    /// Writes into the covering chunk when it is ready, otherwise queues the
    /// write for when it is generated. Writes that resolve outside a ready
    /// chunk's height range are dropped.
    pub fn set_block_elevation(&self, x: i32, elevation: Elevation, z: i32, t: BlockType) {
        let key = ChunkKey::containing(x, z);
        let chunks = self.lock_chunks();
        let ready = chunks.get(&key).and_then(ChunkEntry::grid).cloned();
        let Some(grid) = ready else {
            // Still under the chunk map lock: the generating task cannot
            // publish and flush between our check and this push.
            self.lock_deferred().push(x, elevation, z, t);
            return;
        };
        let neighbors: Vec<Arc<BlockGrid>> = affected_chunks(x, z)
            .into_iter()
            .skip(1)
            .filter_map(|k| chunks.get(&k).and_then(ChunkEntry::grid).cloned())
            .collect();
        drop(chunks);

        let (lx, lz) = ChunkKey::local(x, z);
        if grid.resolve_y(lx, elevation, lz).is_none() {
            log::warn!(
                "dropping {:?} write at ({}, {:?}, {}): outside the chunk height range",
                t,
                x,
                elevation,
                z
            );
            return;
        }
        grid.set_block(lx, elevation, lz, t);
        for n in neighbors {
            n.mark_changed();
        }
    }

    /// Generates the chunk covering `(wx, wz)` and builds its first mesh. A
    /// chunk that is already ready is returned as is; one claimed by another
    /// caller is waited for.
    pub fn instantiate_chunk_at(&self, wx: i32, wz: i32) -> Arc<BlockGrid> {
        match self.get_or_create_entry(wx, wz) {
            EntrySlot::Ready(grid) => grid,
            EntrySlot::Pending(key) => self.wait_ready(key),
            EntrySlot::Created(key) => {
                let grid = self.generate_chunk(key);
                self.build_mesh(key);
                grid
            }
        }
    }

    /// Fills, publishes and decorates one chunk, leaving meshing to the
    /// caller. Holds a generation permit for the whole run. Only the holder
    /// of the `Created` claim for `key` may call this.
    pub fn generate_chunk(&self, key: ChunkKey) -> Arc<BlockGrid> {
        let _permit = self.permits.acquire();
        let t0 = Instant::now();
        let (ox, oz) = key.origin();

        let mut columns = ColumnMap::default();
        for x in 0..CHUNK_SIZE as usize {
            for z in 0..CHUNK_SIZE as usize {
                let s = self.field.sample_column(ox + x as i32, oz + z as i32);
                columns.heights[x][z] = s.height;
                columns.biomes[x][z] = s.biome;
                if x == 8 && z == 8 {
                    columns.chunk_biome = s.chunk_biome;
                }
            }
        }
        let grid = Arc::new(BlockGrid::filled(key, &columns));
        grid.set_surface_generated();
        self.lock_chunks()
            .insert(key, ChunkEntry::Decorating(Arc::clone(&grid)));

        let mut structures = self.planner.local_structures(&grid);
        structures.extend(self.regional_structures(ox, oz));
        let mut sink = self;
        for s in &structures {
            self.planner.carve(s, &mut sink);
        }

        let queued = self.lock_deferred().take(key);
        let applied = grid.apply_edits(queued.iter().map(DeferredEdit::as_write));
        if applied < queued.len() {
            log::warn!(
                "chunk ({}, {}): dropped {} deferred edits outside the height range",
                ox,
                oz,
                queued.len() - applied
            );
        }
        self.link_neighbors(&grid);
        self.lock_chunks()
            .insert(key, ChunkEntry::Ready(Arc::clone(&grid)));
        self.settled.notify_all();

        let ms = t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32;
        log::debug!(
            "chunk ({}, {}) generated: biome={:?} structures={} deferred={} ms={}",
            ox,
            oz,
            grid.biome(),
            structures.len(),
            applied,
            ms
        );
        grid
    }

    /// Village structures for the region containing `(wx, wz)`, the first
    /// time any chunk of that region asks. Later callers get nothing.
    fn regional_structures(&self, wx: i32, wz: i32) -> Vec<Structure> {
        let region = self.planner.region_of(wx, wz);
        let site = {
            let mut regions = self.lock_regions();
            if regions.contains_key(&region) {
                return Vec::new();
            }
            let site = self.planner.village_site(region, &self.field);
            let state = match site {
                Some(center) => RegionState::Village { center },
                None => RegionState::Empty,
            };
            regions.insert(region, state);
            site
        };
        match site {
            Some(center) => {
                self.village_runs.fetch_add(1, Ordering::AcqRel);
                self.planner.plan_village(center).structures
            }
            None => Vec::new(),
        }
    }

    /// Village center planned for `region`, once some chunk in it has been
    /// generated.
    pub fn village_center(&self, region: RegionKey) -> Option<(i32, i32)> {
        match self.lock_regions().get(&region) {
            Some(RegionState::Village { center }) => Some(*center),
            _ => None,
        }
    }

    /// Links `grid` with every ready neighbor, both ways. Neighbors get
    /// marked dirty so their capped border faces are rebuilt.
    fn link_neighbors(&self, grid: &BlockGrid) {
        let key = grid.key();
        for dir in Direction::ALL {
            if let Some(n) = self.chunk(key.neighbor(dir)) {
                grid.link(dir);
                n.link(dir.opposite());
                n.mark_changed();
            }
        }
    }

    /// Claims the 64x64 zone containing `(wx, wz)`; false if already claimed.
    pub fn claim_zone(&self, wx: i32, wz: i32) -> bool {
        self.lock_zones().insert(ZoneKey::containing(wx, wz))
    }

    pub fn zone_chunk_origins(&self, zone: ZoneKey) -> impl Iterator<Item = (i32, i32)> {
        zone.chunk_origins()
    }

    pub fn world_init(&self) -> WorldInit {
        *self.world_init.get_or_init(|| {
            let half = (CHUNK_SIZE / 2) as f32;
            let ground = self.field.sample_column(8, 8).height;
            WorldInit {
                seed: self.field.seed(),
                spawn: Vec3::new(half + 0.5, ground as f32 + 1.0, half + 0.5),
            }
        })
    }

    /// Meshes a ready chunk against its linked neighbors; `None` if the chunk
    /// is not ready.
    pub fn build_mesh(&self, key: ChunkKey) -> Option<usize> {
        let grid = self.chunk(key)?;
        let mut planes = NeighborPlanes::none();
        for dir in Direction::ALL {
            if !grid.is_linked(dir) {
                continue;
            }
            if let Some(n) = self.chunk(key.neighbor(dir)) {
                planes.set(dir, &n);
            }
        }
        grid.take_changed();
        Some(mesh_grid(&grid, &planes))
    }

    /// Hands newly meshed chunks inside `window` to `sink` and takes back the
    /// ones in the ring just outside it.
    pub fn draw<R: RenderSink + ?Sized>(&self, window: &ViewWindow, sink: &mut R) -> DrawCounts {
        let mut counts = DrawCounts::default();
        for (x, z) in window.chunk_origins() {
            let Some(grid) = self.chunk_at(x, z) else {
                continue;
            };
            if grid.data_generated() && !grid.mesh_bound() {
                let mesh = grid.mesh();
                sink.bind(grid.key(), &mesh);
                grid.set_mesh_bound(true);
                drop(mesh);
                counts.bound += 1;
            }
        }
        for (x, z) in window.unload_ring() {
            let Some(grid) = self.chunk_at(x, z) else {
                continue;
            };
            if grid.data_generated() && grid.mesh_bound() {
                sink.unbind(grid.key());
                grid.set_mesh_bound(false);
                counts.unbound += 1;
            }
        }
        counts
    }

    /// Meshed chunks inside `window` whose blocks changed since their last
    /// mesh. Claiming a chunk clears its dirty flag.
    pub fn dirty_chunks_in(&self, window: &ViewWindow) -> Vec<ChunkKey> {
        window
            .chunk_origins()
            .filter_map(|(x, z)| self.chunk_at(x, z))
            .filter(|g| g.data_generated() && g.take_changed())
            .map(|g| g.key())
            .collect()
    }

    pub fn stats(&self) -> TerrainStats {
        let (ready, pending) = {
            let chunks = self.lock_chunks();
            let ready = chunks.values().filter(|e| e.grid().is_some()).count();
            (ready, chunks.len() - ready)
        };
        let deferred = self.lock_deferred().stats();
        TerrainStats {
            ready,
            pending,
            zones: self.lock_zones().len(),
            regions: self.lock_regions().len(),
            deferred_chunks: deferred.chunk_entries,
            deferred_edits: deferred.block_edits,
            village_runs: self.village_runs.load(Ordering::Acquire),
            permits_in_use: self.permits.in_use(),
        }
    }

    pub fn grid_march(&self, origin: Vec3, ray: Vec3, mode: MarchMode) -> Option<MarchHit> {
        grid_march(origin, ray, mode, |c| self.block_or_empty(c))
    }

    pub fn ground_contact(&self, feet: &[Vec3], probe: f32) -> bool {
        ground_contact(feet, probe, |c| self.block_or_empty(c))
    }

    pub fn sweep_axes(&self, corners: &[Vec3], velocity: Vec3) -> Vec3 {
        sweep_axes(corners, velocity, |c| self.block_or_empty(c))
    }
}

impl BlockSink for &Terrain {
    fn set_block(&mut self, x: i32, elevation: Elevation, z: i32, t: BlockType) {
        self.set_block_elevation(x, elevation, z, t);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terrain() -> Terrain {
        let mut p = WorldGenParams::default().with_seed(21);
        p.village_chance = 0.0;
        Terrain::new(&p, 4)
    }

    #[test]
    fn entry_is_created_once() {
        let t = terrain();
        assert!(matches!(t.get_or_create_entry(5, 5), EntrySlot::Created(k) if k == ChunkKey::encode(0, 0)));
        assert!(matches!(t.get_or_create_entry(15, 0), EntrySlot::Pending(_)));
        assert!(!t.has_chunk_at(0, 0));
        assert_eq!(t.stats().pending, 1);
    }

    #[test]
    fn unloaded_reads_fail() {
        let t = terrain();
        assert_eq!(
            t.get_block_at(3, 70, -4),
            Err(TerrainError::NotLoaded { x: 3, y: 70, z: -4 })
        );
        assert_eq!(t.block_or_empty(IVec3::new(3, 70, -4)), BlockType::Empty);
    }

    #[test]
    fn loaded_out_of_range_y_reads_empty() {
        let t = terrain();
        t.instantiate_chunk_at(0, 0);
        assert_eq!(t.get_block_at(1, -1, 1), Ok(BlockType::Empty));
        assert_eq!(t.get_block_at(1, 256, 1), Ok(BlockType::Empty));
        assert_ne!(t.get_block_at(1, 0, 1), Ok(BlockType::Empty));
    }

    #[test]
    fn zones_claim_once() {
        let t = terrain();
        assert!(t.claim_zone(10, 10));
        assert!(!t.claim_zone(63, 0));
        assert!(t.claim_zone(-1, 0));
        assert_eq!(t.stats().zones, 2);
    }

    #[test]
    fn world_init_is_stable() {
        let t = terrain();
        let a = t.world_init();
        assert_eq!(a.seed, 21);
        assert_eq!(a.spawn.x, 8.5);
        assert_eq!(a, t.world_init());
        let ground = t.field().sample_column(8, 8).height;
        assert_eq!(a.spawn.y, ground as f32 + 1.0);
    }
}
