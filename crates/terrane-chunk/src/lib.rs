//! Chunk block grids, their lifecycle state, and voxel ray marching.
#![forbid(unsafe_code)]

mod elevation;
mod grid;
pub mod march;
mod mesh;

pub use elevation::Elevation;
pub use grid::{BlockGrid, BorderPlane, CHUNK_VOLUME, ColumnMap, GridView};
pub use march::{MarchHit, MarchMode, grid_march};
pub use mesh::ChunkMesh;
