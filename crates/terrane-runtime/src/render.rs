use terrane_chunk::ChunkMesh;
use terrane_world::{CHUNK_SIZE, ChunkKey};

/// The rendering side of the mesh handoff. `bind` receives the chunk's mesh
/// while its mesh lock is held; `unbind` releases whatever `bind` uploaded.
pub trait RenderSink {
    fn bind(&mut self, key: ChunkKey, mesh: &ChunkMesh);
    fn unbind(&mut self, key: ChunkKey);
}

/// Chunk-aligned drawing window in world blocks, `[min, max)` on both axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewWindow {
    pub min_x: i32,
    pub max_x: i32,
    pub min_z: i32,
    pub max_z: i32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawCounts {
    pub bound: usize,
    pub unbound: usize,
}

impl ViewWindow {
    /// Window of half width `radius` around the chunk containing `(x, z)`.
    pub fn around(x: f32, z: f32, radius: i32) -> Self {
        let (cx, cz) = ChunkKey::containing(x.floor() as i32, z.floor() as i32).origin();
        Self {
            min_x: cx - radius,
            max_x: cx + radius,
            min_z: cz - radius,
            max_z: cz + radius,
        }
    }

    pub fn contains(&self, key: ChunkKey) -> bool {
        let (x, z) = key.origin();
        (self.min_x..self.max_x).contains(&x) && (self.min_z..self.max_z).contains(&z)
    }

    pub fn chunk_origins(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let step = CHUNK_SIZE as usize;
        (self.min_x..self.max_x).step_by(step).flat_map(move |x| {
            (self.min_z..self.max_z)
                .step_by(step)
                .map(move |z| (x, z))
        })
    }

    /// Chunk origins just outside the window whose meshes get released: two
    /// chunks past the minimum edges and one past the maximum edges.
    pub fn unload_ring(&self) -> Vec<(i32, i32)> {
        let step = CHUNK_SIZE as usize;
        let mut ring = Vec::new();
        for x in (self.min_x - 2 * CHUNK_SIZE..self.max_x + 2 * CHUNK_SIZE).step_by(step) {
            ring.push((x, self.min_z - 2 * CHUNK_SIZE));
            ring.push((x, self.max_z + CHUNK_SIZE));
        }
        for z in (self.min_z - CHUNK_SIZE..self.max_z + CHUNK_SIZE).step_by(step) {
            ring.push((self.min_x - 2 * CHUNK_SIZE, z));
            ring.push((self.max_x + CHUNK_SIZE, z));
        }
        ring
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn window_snaps_to_chunk_origin() {
        let w = ViewWindow::around(-0.5, 17.0, 32);
        assert_eq!(w, ViewWindow { min_x: -48, max_x: 16, min_z: -16, max_z: 48 });
        assert_eq!(w.chunk_origins().count(), 16);
        assert!(w.contains(ChunkKey::encode(-48, 32)));
        assert!(!w.contains(ChunkKey::encode(16, 0)));
    }

    #[test]
    fn ring_stays_outside_the_window() {
        let w = ViewWindow::around(0.0, 0.0, 64);
        let ring = w.unload_ring();
        assert!(!ring.is_empty());
        for (x, z) in ring {
            assert!(!w.contains(ChunkKey::encode(x, z)), "({x}, {z})");
        }
    }

    proptest! {
        #[test]
        fn window_covers_its_own_chunk_and_ring_misses_it(
            x in -100_000.0f32..100_000.0,
            z in -100_000.0f32..100_000.0,
            chunks in 1i32..12,
        ) {
            let w = ViewWindow::around(x, z, chunks * CHUNK_SIZE);
            let here = ChunkKey::containing(x.floor() as i32, z.floor() as i32);
            prop_assert!(w.contains(here));
            let side = (2 * chunks) as usize;
            prop_assert_eq!(w.chunk_origins().count(), side * side);
            prop_assert!(w.chunk_origins().all(|(cx, cz)| w.contains(ChunkKey::encode(cx, cz))));

            let ring = w.unload_ring();
            prop_assert_eq!(ring.len(), 2 * (side + 4) + 2 * (side + 2));
            for (rx, rz) in ring {
                prop_assert_eq!(rx.rem_euclid(CHUNK_SIZE), 0);
                prop_assert_eq!(rz.rem_euclid(CHUNK_SIZE), 0);
                prop_assert!(!w.contains(ChunkKey::encode(rx, rz)));
            }
        }
    }
}
