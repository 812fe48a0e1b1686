//! Structure planning (trees, villages) and the voxel patterns they carve.
#![forbid(unsafe_code)]

mod carve;
mod planner;
mod structure;
pub mod village;

pub use carve::carve;
pub use planner::StructurePlanner;
pub use structure::{BlockSink, Structure, StructureKind};
pub use village::{Segment, VillagePlan, grow_village};
