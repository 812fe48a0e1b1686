use terrane_blocks::Rgba;
use terrane_chunk::ChunkMesh;
use terrane_geom::Vec3;

#[derive(Default, Clone)]
pub struct MeshBuild {
    pub pos: Vec<f32>,
    pub norm: Vec<f32>,
    pub col: Vec<u8>,
    pub idx: Vec<u32>,
}

impl MeshBuild {
    /// Pre-reserve capacity for approximately `n_quads` quads worth of data.
    #[inline]
    pub fn reserve_quads(&mut self, n_quads: usize) {
        self.pos.reserve(n_quads * 4 * 3);
        self.norm.reserve(n_quads * 4 * 3);
        self.col.reserve(n_quads * 4 * 4);
        self.idx.reserve(n_quads * 6);
    }

    /// Appends a quad (two triangles) facing along `n`. Corners may arrive in
    /// either winding; they are reordered so the front side faces `n`.
    pub fn add_quad(&mut self, corners: [Vec3; 4], n: Vec3, rgba: Rgba) {
        let base = (self.pos.len() / 3) as u32;
        let mut vs = corners;
        let cross = (vs[1] - vs[0]).cross(vs[2] - vs[0]);
        if cross.dot(n) < 0.0 {
            vs.swap(1, 3);
        }
        for v in vs {
            self.pos.extend_from_slice(&[v.x, v.y, v.z]);
            self.norm.extend_from_slice(&[n.x, n.y, n.z]);
            self.col.extend_from_slice(&rgba);
        }
        self.idx
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.idx.len() / 6
    }

    pub fn finish(self) -> ChunkMesh {
        ChunkMesh {
            pos: self.pos,
            norm: self.norm,
            col: self.col,
            idx: self.idx,
        }
    }
}
