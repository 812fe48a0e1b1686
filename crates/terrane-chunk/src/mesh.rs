/// CPU-side geometry of a chunk's visible faces.
///
/// Positions and normals are packed `xyz` triples, colors `rgba` bytes, one
/// entry per vertex. Every quad adds 4 vertices and 6 indices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkMesh {
    pub pos: Vec<f32>,
    pub norm: Vec<f32>,
    pub col: Vec<u8>,
    pub idx: Vec<u32>,
}

impl ChunkMesh {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.idx.len() / 6
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.idx.is_empty()
    }

    /// Normal of the `q`-th quad.
    pub fn quad_normal(&self, q: usize) -> [f32; 3] {
        let v = q * 4 * 3;
        [self.norm[v], self.norm[v + 1], self.norm[v + 2]]
    }

    /// Corner positions of the `q`-th quad in emission order.
    pub fn quad_corners(&self, q: usize) -> [[f32; 3]; 4] {
        let mut out = [[0.0; 3]; 4];
        for (i, c) in out.iter_mut().enumerate() {
            let v = (q * 4 + i) * 3;
            *c = [self.pos[v], self.pos[v + 1], self.pos[v + 2]];
        }
        out
    }

    pub fn quad_color(&self, q: usize) -> [u8; 4] {
        let v = q * 4 * 4;
        [self.col[v], self.col[v + 1], self.col[v + 2], self.col[v + 3]]
    }
}
