//! Block writes queued for chunks that have not been generated yet.
#![forbid(unsafe_code)]

use std::collections::HashMap;

use terrane_blocks::BlockType;
use terrane_chunk::Elevation;
use terrane_world::{CHUNK_SIZE, ChunkKey, Direction};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeferredStats {
    pub chunk_entries: usize,
    pub block_edits: usize,
}

/// One queued write, in the target chunk's local column space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeferredEdit {
    pub x: u8,
    pub z: u8,
    pub elevation: Elevation,
    pub block: BlockType,
}

impl DeferredEdit {
    /// Tuple form accepted by `BlockGrid::apply_edits`.
    #[inline]
    pub fn as_write(&self) -> (usize, Elevation, usize, BlockType) {
        (self.x as usize, self.elevation, self.z as usize, self.block)
    }
}

/// Per-chunk append-only queues. Edits for a key are kept in arrival order so
/// that replaying them leaves the last write to a cell in place.
#[derive(Default, Debug)]
pub struct DeferredEdits {
    inner: HashMap<ChunkKey, Vec<DeferredEdit>>,
}

impl DeferredEdits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> DeferredStats {
        DeferredStats {
            chunk_entries: self.inner.len(),
            block_edits: self.inner.values().map(Vec::len).sum(),
        }
    }

    /// Queues a write at world column `(wx, wz)`; returns the target key.
    pub fn push(&mut self, wx: i32, elevation: Elevation, wz: i32, block: BlockType) -> ChunkKey {
        let key = ChunkKey::containing(wx, wz);
        let (x, z) = ChunkKey::local(wx, wz);
        self.inner.entry(key).or_default().push(DeferredEdit {
            x: x as u8,
            z: z as u8,
            elevation,
            block,
        });
        key
    }

    /// Removes and returns everything queued for `key`.
    pub fn take(&mut self, key: ChunkKey) -> Vec<DeferredEdit> {
        self.inner.remove(&key).unwrap_or_default()
    }

    pub fn pending(&self, key: ChunkKey) -> usize {
        self.inner.get(&key).map_or(0, Vec::len)
    }

    /// Latest queued block for a cell, if any.
    pub fn get(&self, wx: i32, elevation: Elevation, wz: i32) -> Option<BlockType> {
        let key = ChunkKey::containing(wx, wz);
        let (x, z) = ChunkKey::local(wx, wz);
        self.inner.get(&key).and_then(|q| {
            q.iter()
                .rev()
                .find(|e| e.x as usize == x && e.z as usize == z && e.elevation == elevation)
                .map(|e| e.block)
        })
    }

    pub fn snapshot_for_chunk(&self, key: ChunkKey) -> Vec<DeferredEdit> {
        self.inner.get(&key).cloned().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Chunks whose mesh depends on the column `(wx, wz)`: the covering chunk,
/// plus the neighbor across each border the column lies on.
pub fn affected_chunks(wx: i32, wz: i32) -> Vec<ChunkKey> {
    let key = ChunkKey::containing(wx, wz);
    let (lx, lz) = ChunkKey::local(wx, wz);
    let edge = (CHUNK_SIZE - 1) as usize;
    let mut out = vec![key];
    if lx == 0 {
        out.push(key.neighbor(Direction::XNeg));
    }
    if lx == edge {
        out.push(key.neighbor(Direction::XPos));
    }
    if lz == 0 {
        out.push(key.neighbor(Direction::ZNeg));
    }
    if lz == edge {
        out.push(key.neighbor(Direction::ZPos));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_edit_touches_two_neighbors() {
        let mut affected = affected_chunks(-16, 31);
        affected.sort();
        let mut want = vec![
            ChunkKey::encode(-16, 16),
            ChunkKey::encode(-32, 16),
            ChunkKey::encode(-16, 32),
        ];
        want.sort();
        assert_eq!(affected, want);
        assert_eq!(affected_chunks(5, 7), vec![ChunkKey::encode(0, 0)]);
    }

    #[test]
    fn take_drains_one_key() {
        let mut q = DeferredEdits::new();
        let a = q.push(3, Elevation::Absolute(70), 4, BlockType::Stone);
        let b = q.push(-1, Elevation::Surface(2), 4, BlockType::OakLeaves);
        assert_ne!(a, b);
        assert_eq!(q.stats(), DeferredStats { chunk_entries: 2, block_edits: 2 });
        let edits = q.take(a);
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].as_write(), (3, Elevation::Absolute(70), 4, BlockType::Stone));
        assert_eq!(q.pending(a), 0);
        assert_eq!(q.pending(b), 1);
        assert!(q.take(a).is_empty());
    }
}
