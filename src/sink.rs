use hashbrown::HashMap;
use terrane_chunk::ChunkMesh;
use terrane_runtime::RenderSink;
use terrane_world::ChunkKey;

/// Stands in for a GPU uploader: remembers what is bound and how big it is.
#[derive(Default)]
pub struct LoggingSink {
    bound: HashMap<ChunkKey, usize>,
    pub binds: usize,
    pub unbinds: usize,
}

impl LoggingSink {
    pub fn bound_chunks(&self) -> usize {
        self.bound.len()
    }

    pub fn bound_quads(&self) -> usize {
        self.bound.values().sum()
    }
}

impl RenderSink for LoggingSink {
    fn bind(&mut self, key: ChunkKey, mesh: &ChunkMesh) {
        let (x, z) = key.origin();
        log::trace!("bind ({}, {}) quads={}", x, z, mesh.quad_count());
        self.bound.insert(key, mesh.quad_count());
        self.binds += 1;
    }

    fn unbind(&mut self, key: ChunkKey) {
        let (x, z) = key.origin();
        log::trace!("unbind ({}, {})", x, z);
        self.bound.remove(&key);
        self.unbinds += 1;
    }
}
