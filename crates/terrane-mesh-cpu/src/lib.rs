//! CPU face-visibility mesher for chunk grids.
#![forbid(unsafe_code)]

mod face;
mod mesh_build;
mod mesher;

pub use face::Face;
pub use mesh_build::MeshBuild;
pub use mesher::{NeighborPlanes, build_chunk_mesh, mesh_grid};
