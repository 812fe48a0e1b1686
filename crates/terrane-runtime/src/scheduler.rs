use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, unbounded};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use terrane_geom::Vec3;
use terrane_world::{ChunkKey, ZONE_SIZE, ZoneKey};

use crate::config::RuntimeConfig;
use crate::render::ViewWindow;
use crate::terrain::{EntrySlot, Terrain};

/// Half extent, in blocks, of the area generated by
/// [`Runtime::create_init_scene`].
pub const INIT_SCENE_EXTENT: i32 = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Job {
    Generate(ChunkKey),
    Mesh(ChunkKey),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobKind {
    Generate,
    Mesh,
}

/// Completion record sent back to the driver.
#[derive(Clone, Debug)]
pub struct JobOut {
    pub key: ChunkKey,
    pub kind: JobKind,
    /// Quads in the stored mesh; zero for generation jobs.
    pub quads: usize,
    pub t_total_ms: u32,
}

fn elapsed_ms(t0: Instant) -> u32 {
    t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32
}

struct MeshLane {
    tx: Sender<ChunkKey>,
    queued: Arc<AtomicUsize>,
}

impl MeshLane {
    fn submit(&self, key: ChunkKey) -> bool {
        self.queued.fetch_add(1, Ordering::AcqRel);
        if self.tx.send(key).is_err() {
            self.queued.fetch_sub(1, Ordering::AcqRel);
            return false;
        }
        true
    }
}

fn process_generate(terrain: &Terrain, key: ChunkKey, tx: &Sender<JobOut>, mesh: &MeshLane) {
    let t0 = Instant::now();
    terrain.generate_chunk(key);
    mesh.submit(key);
    let _ = tx.send(JobOut {
        key,
        kind: JobKind::Generate,
        quads: 0,
        t_total_ms: elapsed_ms(t0),
    });
}

fn process_mesh(terrain: &Terrain, key: ChunkKey, tx: &Sender<JobOut>) {
    let t0 = Instant::now();
    let Some(quads) = terrain.build_mesh(key) else {
        log::debug!("mesh job for unloaded chunk {:?}", key.origin());
        return;
    };
    let _ = tx.send(JobOut {
        key,
        kind: JobKind::Mesh,
        quads,
        t_total_ms: elapsed_ms(t0),
    });
}

/// Background generation and meshing. Generation and meshing run on
/// separate pools fed by their own queues; every finished job is reported
/// on one result channel.
pub struct Runtime {
    terrain: Arc<Terrain>,
    gen_tx: Sender<ChunkKey>,
    mesh: MeshLane,
    res_rx: Receiver<JobOut>,
    _gen_pool: Arc<ThreadPool>,
    _mesh_pool: Arc<ThreadPool>,
    q_gen: Arc<AtomicUsize>,
    inflight_gen: Arc<AtomicUsize>,
    inflight_mesh: Arc<AtomicUsize>,
    pub w_gen: usize,
    pub w_mesh: usize,
}

impl Runtime {
    pub fn new(terrain: Arc<Terrain>, cfg: &RuntimeConfig) -> Result<Self, ThreadPoolBuildError> {
        let (gen_tx, gen_rx) = unbounded::<ChunkKey>();
        let (mesh_tx, mesh_rx) = unbounded::<ChunkKey>();
        let (res_tx, res_rx) = unbounded::<JobOut>();
        let (w_gen, w_mesh) = cfg.workers();

        let q_gen_ctr = Arc::new(AtomicUsize::new(0));
        let q_mesh_ctr = Arc::new(AtomicUsize::new(0));
        let inflight_gen_ctr = Arc::new(AtomicUsize::new(0));
        let inflight_mesh_ctr = Arc::new(AtomicUsize::new(0));

        let gen_pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(w_gen)
                .thread_name(|i| format!("terrane-gen-{i}"))
                .build()?,
        );
        for _ in 0..w_gen {
            let rx = gen_rx.clone();
            let tx = res_tx.clone();
            let terrain = terrain.clone();
            let mesh = MeshLane {
                tx: mesh_tx.clone(),
                queued: q_mesh_ctr.clone(),
            };
            let q_gen = q_gen_ctr.clone();
            let inflight_gen = inflight_gen_ctr.clone();
            gen_pool.spawn(move || {
                while let Ok(key) = rx.recv() {
                    inflight_gen.fetch_add(1, Ordering::AcqRel);
                    q_gen.fetch_sub(1, Ordering::AcqRel);
                    log::trace!("gen job picked up: {:?}", key.origin());
                    process_generate(terrain.as_ref(), key, &tx, &mesh);
                    inflight_gen.fetch_sub(1, Ordering::AcqRel);
                }
            });
        }

        let mesh_pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(w_mesh)
                .thread_name(|i| format!("terrane-mesh-{i}"))
                .build()?,
        );
        for _ in 0..w_mesh {
            let rx = mesh_rx.clone();
            let tx = res_tx.clone();
            let terrain = terrain.clone();
            let q_mesh = q_mesh_ctr.clone();
            let inflight_mesh = inflight_mesh_ctr.clone();
            mesh_pool.spawn(move || {
                while let Ok(key) = rx.recv() {
                    inflight_mesh.fetch_add(1, Ordering::AcqRel);
                    q_mesh.fetch_sub(1, Ordering::AcqRel);
                    log::trace!("mesh job picked up: {:?}", key.origin());
                    process_mesh(terrain.as_ref(), key, &tx);
                    inflight_mesh.fetch_sub(1, Ordering::AcqRel);
                }
            });
        }

        log::info!(
            "runtime started: gen_workers={} mesh_workers={} permits={}",
            w_gen,
            w_mesh,
            terrain.permits().capacity()
        );
        Ok(Self {
            terrain,
            gen_tx,
            mesh: MeshLane {
                tx: mesh_tx,
                queued: q_mesh_ctr,
            },
            res_rx,
            _gen_pool: gen_pool,
            _mesh_pool: mesh_pool,
            q_gen: q_gen_ctr,
            inflight_gen: inflight_gen_ctr,
            inflight_mesh: inflight_mesh_ctr,
            w_gen,
            w_mesh,
        })
    }

    #[inline]
    pub fn terrain(&self) -> &Arc<Terrain> {
        &self.terrain
    }

    pub fn submit(&self, job: Job) -> bool {
        match job {
            Job::Generate(key) => {
                self.q_gen.fetch_add(1, Ordering::AcqRel);
                if self.gen_tx.send(key).is_err() {
                    self.q_gen.fetch_sub(1, Ordering::AcqRel);
                    return false;
                }
                true
            }
            Job::Mesh(key) => self.mesh.submit(key),
        }
    }

    /// Schedules generation of the chunk covering `(wx, wz)` unless it is
    /// already ready or claimed.
    pub fn request_chunk(&self, wx: i32, wz: i32) -> bool {
        match self.terrain.get_or_create_entry(wx, wz) {
            EntrySlot::Created(key) => self.submit(Job::Generate(key)),
            EntrySlot::Pending(_) | EntrySlot::Ready(_) => false,
        }
    }

    #[inline]
    pub fn request_mesh(&self, key: ChunkKey) -> bool {
        self.submit(Job::Mesh(key))
    }

    /// Claims every unclaimed zone within `radius` blocks of `pos` and
    /// schedules its chunks. Returns how many chunks were scheduled.
    pub fn ensure_zones_around(&self, pos: Vec3, radius: i32) -> usize {
        let (zx, zz) = ZoneKey::containing(pos.x.floor() as i32, pos.z.floor() as i32).origin();
        let step = ZONE_SIZE as usize;
        let mut requested = 0;
        for x in (zx - radius..=zx + radius).step_by(step) {
            for z in (zz - radius..=zz + radius).step_by(step) {
                if !self.terrain.claim_zone(x, z) {
                    continue;
                }
                for (cx, cz) in ZoneKey::containing(x, z).chunk_origins() {
                    if self.request_chunk(cx, cz) {
                        requested += 1;
                    }
                }
            }
        }
        if requested > 0 {
            log::debug!(
                "zones around ({:.0}, {:.0}): scheduled {} chunks",
                pos.x,
                pos.z,
                requested
            );
        }
        requested
    }

    /// Generates and meshes the starting area around the origin before
    /// returning.
    pub fn create_init_scene(&self) -> Result<usize, ThreadPoolBuildError> {
        self.create_scene(INIT_SCENE_EXTENT)
    }

    /// Synchronously generates every zone within `extent` blocks of the
    /// origin, then meshes it. Runs on its own short-lived pool since the
    /// lane pools are occupied by their queue loops.
    pub fn create_scene(&self, extent: i32) -> Result<usize, ThreadPoolBuildError> {
        let t0 = Instant::now();
        let step = ZONE_SIZE as usize;
        let mut keys = Vec::new();
        for x in (-extent..=extent).step_by(step) {
            for z in (-extent..=extent).step_by(step) {
                if !self.terrain.claim_zone(x, z) {
                    continue;
                }
                for (cx, cz) in ZoneKey::containing(x, z).chunk_origins() {
                    if let EntrySlot::Created(key) = self.terrain.get_or_create_entry(cx, cz) {
                        keys.push(key);
                    }
                }
            }
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.w_gen + self.w_mesh)
            .thread_name(|i| format!("terrane-scene-{i}"))
            .build()?;
        let terrain = self.terrain.as_ref();
        pool.install(|| {
            keys.par_iter().for_each(|&key| {
                terrain.generate_chunk(key);
            });
        });
        let quads: usize = pool.install(|| {
            keys.par_iter()
                .filter_map(|&key| terrain.build_mesh(key))
                .sum()
        });
        log::info!(
            "init scene: chunks={} quads={} ms={}",
            keys.len(),
            quads,
            elapsed_ms(t0)
        );
        Ok(keys.len())
    }

    /// Queues a remesh for every dirty meshed chunk inside `window`.
    pub fn remesh_dirty(&self, window: &ViewWindow) -> usize {
        let dirty = self.terrain.dirty_chunks_in(window);
        for &key in &dirty {
            self.request_mesh(key);
        }
        dirty.len()
    }

    pub fn drain_results(&self) -> Vec<JobOut> {
        self.res_rx.try_iter().collect()
    }

    /// (queued gen, in-flight gen, queued mesh, in-flight mesh)
    pub fn queue_debug_counts(&self) -> (usize, usize, usize, usize) {
        (
            self.q_gen.load(Ordering::Acquire),
            self.inflight_gen.load(Ordering::Acquire),
            self.mesh.queued.load(Ordering::Acquire),
            self.inflight_mesh.load(Ordering::Acquire),
        )
    }

    /// True once both lanes have no queued or running work.
    pub fn is_idle(&self) -> bool {
        // Read in pipeline order. Workers enter flight before leaving the
        // queue, and a generation job queues its mesh before leaving flight.
        let q_gen = self.q_gen.load(Ordering::Acquire);
        let inflight_gen = self.inflight_gen.load(Ordering::Acquire);
        let q_mesh = self.mesh.queued.load(Ordering::Acquire);
        let inflight_mesh = self.inflight_mesh.load(Ordering::Acquire);
        q_gen == 0 && inflight_gen == 0 && q_mesh == 0 && inflight_mesh == 0
    }
}
