//! Block and biome tags plus their fixed material tables.
#![forbid(unsafe_code)]

pub mod material;
pub mod types;

pub use material::Rgba;
pub use types::{Biome, BlockType};
