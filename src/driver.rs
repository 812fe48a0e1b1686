use std::error::Error;
use std::thread;
use std::time::{Duration, Instant};

use terrane_blocks::BlockType;
use terrane_chunk::MarchMode;
use terrane_geom::{Aabb, Vec3};
use terrane_net::Packet;
use terrane_runtime::{JobKind, Runtime, RuntimeConfig, ViewWindow};
use terrane_world::ChunkKey;

use crate::sink::LoggingSink;

const TICK: Duration = Duration::from_millis(16);
const WALK: Vec3 = Vec3::new(0.6, -0.8, 0.25);
const PLAYER_HALF_WIDTH: f32 = 0.3;
const PLAYER_HEIGHT: f32 = 1.8;
const MARKER_EVERY: u32 = 60;
const DRAIN_TIMEOUT: Duration = Duration::from_secs(120);

/// Stands in for the game loop: walks a player across the world, keeps the
/// zones around it requested, remeshes edits and feeds the render sink.
pub struct Driver {
    runtime: Runtime,
    cfg: RuntimeConfig,
    sink: LoggingSink,
    pos: Vec3,
    generated: usize,
    meshed: usize,
    markers: usize,
}

impl Driver {
    pub fn new(runtime: Runtime, cfg: RuntimeConfig) -> Self {
        let init = runtime.terrain().world_init();
        let hello = Packet::WorldInit {
            seed: init.seed,
            spawn: init.spawn,
        }
        .encode();
        log::info!(
            "world seed={} spawn=({:.1}, {:.1}, {:.1}) init_packet={}B",
            init.seed,
            init.spawn.x,
            init.spawn.y,
            init.spawn.z,
            hello.len()
        );
        Self {
            runtime,
            cfg,
            sink: LoggingSink::default(),
            pos: init.spawn,
            generated: 0,
            meshed: 0,
            markers: 0,
        }
    }

    pub fn init_scene(&mut self) -> Result<usize, Box<dyn Error>> {
        let n = self.runtime.create_init_scene()?;
        self.draw();
        Ok(n)
    }

    fn window(&self) -> ViewWindow {
        ViewWindow::around(self.pos.x, self.pos.z, self.cfg.view_radius)
    }

    pub fn run(&mut self, steps: u32) {
        let interval = self.cfg.remesh_interval.max(1);
        for tick in 0..steps {
            let t0 = Instant::now();
            self.runtime
                .ensure_zones_around(self.pos, self.cfg.zone_radius);
            self.collect();
            self.step_player();
            if tick % interval == 0 {
                let n = self.runtime.remesh_dirty(&self.window());
                if n > 0 {
                    log::debug!("tick {}: remeshing {} dirty chunks", tick, n);
                }
            }
            if tick % MARKER_EVERY == MARKER_EVERY - 1 {
                self.place_marker();
            }
            self.draw();
            if tick % 60 == 0 {
                let (qg, ig, qm, im) = self.runtime.queue_debug_counts();
                log::info!(
                    "tick {} pos=({:.1}, {:.1}, {:.1}) gen q={} run={} mesh q={} run={} bound={}",
                    tick,
                    self.pos.x,
                    self.pos.y,
                    self.pos.z,
                    qg,
                    ig,
                    qm,
                    im,
                    self.sink.bound_chunks()
                );
            }
            if let Some(rest) = TICK.checked_sub(t0.elapsed()) {
                thread::sleep(rest);
            }
        }
    }

    fn collect(&mut self) {
        for out in self.runtime.drain_results() {
            match out.kind {
                JobKind::Generate => self.generated += 1,
                JobKind::Mesh => self.meshed += 1,
            }
            log::trace!(
                "{:?} done for {:?} in {}ms",
                out.kind,
                out.key.origin(),
                out.t_total_ms
            );
        }
    }

    fn draw(&mut self) {
        let window = self.window();
        let counts = self.runtime.terrain().draw(&window, &mut self.sink);
        if counts.bound + counts.unbound > 0 {
            log::debug!("draw: bound={} unbound={}", counts.bound, counts.unbound);
        }
    }

    /// Moves the player box along `WALK`, holding still until the ground
    /// under it exists and hopping one block when walled in.
    fn step_player(&mut self) {
        let terrain = self.runtime.terrain();
        if !terrain.has_chunk_at(self.pos.x.floor() as i32, self.pos.z.floor() as i32) {
            return;
        }
        let corners = Aabb::from_feet(self.pos, PLAYER_HALF_WIDTH, PLAYER_HEIGHT).corners();
        let moved = terrain.sweep_axes(&corners, WALK);
        let feet = [corners[0], corners[1], corners[4], corners[5]];
        let grounded = terrain.ground_contact(&feet, 0.05);
        if grounded && moved.x == 0.0 && WALK.x != 0.0 {
            self.pos.y += 1.0;
        }
        self.pos += moved;
    }

    /// Drops a cobblestone on the first opaque cell under the player.
    fn place_marker(&mut self) {
        let terrain = self.runtime.terrain();
        let origin = self.pos + Vec3::new(0.0, 0.5, 0.0);
        let Some(hit) = terrain.grid_march(origin, Vec3::new(0.0, -16.0, 0.0), MarchMode::Opaque)
        else {
            return;
        };
        let at = hit.prev;
        terrain.set_block_at(at.x, at.y, at.z, BlockType::Cobblestone);
        self.markers += 1;
        let packet = Packet::BlockChange {
            chunk: ChunkKey::containing(at.x, at.z),
            y: at.y.clamp(0, 255) as u8,
            block: BlockType::Cobblestone,
        };
        log::debug!(
            "marker at ({}, {}, {}) packet={:02x?}",
            at.x,
            at.y,
            at.z,
            packet.encode()
        );
    }

    /// Waits for the queues to drain, then reports.
    pub fn finish(mut self) {
        let t0 = Instant::now();
        while !self.runtime.is_idle() && t0.elapsed() < DRAIN_TIMEOUT {
            self.collect();
            thread::sleep(TICK);
        }
        self.collect();
        self.draw();
        let s = self.runtime.terrain().stats();
        log::info!(
            "done: ready={} pending={} zones={} regions={} villages={} deferred={} ({} chunks)",
            s.ready,
            s.pending,
            s.zones,
            s.regions,
            s.village_runs,
            s.deferred_edits,
            s.deferred_chunks
        );
        log::info!(
            "jobs: generated={} meshed={} markers={} binds={} unbinds={} bound_quads={}",
            self.generated,
            self.meshed,
            self.markers,
            self.sink.binds,
            self.sink.unbinds,
            self.sink.bound_quads()
        );
    }
}
