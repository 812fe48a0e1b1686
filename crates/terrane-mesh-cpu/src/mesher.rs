use std::time::Instant;

use terrane_blocks::BlockType;
use terrane_chunk::{BlockGrid, BorderPlane, ChunkMesh, GridView};
use terrane_world::Direction;

use crate::face::Face;
use crate::mesh_build::MeshBuild;

const SX: i32 = 16;
const SY: i32 = 256;
const SZ: i32 = 16;

/// Facing border cells of the (up to) four horizontal neighbors. Slot `d`
/// holds the plane of the neighbor across side `d`, taken from that
/// neighbor's opposite side.
#[derive(Default)]
pub struct NeighborPlanes {
    planes: [Option<BorderPlane>; 4],
}

impl NeighborPlanes {
    pub fn none() -> Self {
        Self::default()
    }

    /// Captures the facing border of `neighbor`, which lies across `side`.
    pub fn set(&mut self, side: Direction, neighbor: &BlockGrid) {
        self.planes[side.index()] = Some(neighbor.border(side.opposite()));
    }

    #[inline]
    pub fn get(&self, side: Direction) -> Option<&BorderPlane> {
        self.planes[side.index()].as_ref()
    }
}

enum Emit {
    No,
    /// Face of the current (solid) cell.
    Own(BlockType),
    /// Face of a solid neighbor seen from an empty border cell.
    Facing(BlockType),
}

#[inline]
fn decide(cur: BlockType, other: BlockType) -> Emit {
    if cur.is_solid() {
        if other == BlockType::Empty {
            Emit::Own(cur)
        } else {
            Emit::No
        }
    } else if other.is_solid() {
        Emit::Facing(other)
    } else {
        Emit::No
    }
}

/// Builds the visible-face mesh of `grid` in chunk-local coordinates.
///
/// Inside the grid a face is emitted where a solid cell meets an empty one.
/// Across the top and bottom of the grid solid cells are always capped. Across
/// a horizontal side the decision uses the neighbor plane when present; an
/// empty border cell facing a solid neighbor emits that neighbor's face,
/// colored by the neighbor and facing back into the empty cell. Without a
/// neighbor, solid border cells are capped and empty ones emit nothing.
pub fn build_chunk_mesh(grid: &GridView<'_>, neighbors: &NeighborPlanes) -> ChunkMesh {
    let mut mb = MeshBuild::default();
    mb.reserve_quads(4096);
    for z in 0..SZ {
        for y in 0..SY {
            for x in 0..SX {
                let cur = grid.get_local(x as usize, y as usize, z as usize);
                let on_side = x == 0 || x == SX - 1 || z == 0 || z == SZ - 1;
                if !cur.is_solid() && !on_side {
                    continue;
                }
                for face in Face::ALL {
                    let (dx, dy, dz) = face.delta();
                    let (nx, ny, nz) = (x + dx, y + dy, z + dz);
                    let emit = if nx < 0 || nx >= SX || nz < 0 || nz >= SZ {
                        let Some(side) = face.side() else {
                            continue;
                        };
                        match neighbors.get(side) {
                            Some(plane) => {
                                let t = if side.runs_along_x() { z } else { x };
                                decide(cur, plane.get(t as usize, y as usize))
                            }
                            None if cur.is_solid() => Emit::Own(cur),
                            None => Emit::No,
                        }
                    } else if ny < 0 || ny >= SY {
                        if cur.is_solid() { Emit::Own(cur) } else { Emit::No }
                    } else if cur.is_solid() {
                        decide(cur, grid.get_local(nx as usize, ny as usize, nz as usize))
                    } else {
                        Emit::No
                    };
                    match emit {
                        Emit::No => {}
                        Emit::Own(b) => mb.add_quad(face.corners(x, y, z), face.normal(), b.color()),
                        Emit::Facing(b) => {
                            mb.add_quad(face.corners(x, y, z), -face.normal(), b.color())
                        }
                    }
                }
            }
        }
    }
    mb.finish()
}

/// Meshes `grid` against its neighbors and stores the result in its mesh slot.
/// Returns the number of quads.
pub fn mesh_grid(grid: &BlockGrid, neighbors: &NeighborPlanes) -> usize {
    let t0 = Instant::now();
    let mesh = {
        let view = grid.view();
        build_chunk_mesh(&view, neighbors)
    };
    let quads = mesh.quad_count();
    grid.store_mesh(mesh);
    let ms = t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32;
    let (ox, oz) = grid.origin();
    log::trace!(target: "perf", "ms={} mesh_build quads={} origin=({}, {})", ms, quads, ox, oz);
    quads
}
