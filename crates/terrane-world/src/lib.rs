//! World keys, noise fields, the height/biome model and worldgen parameters.
#![forbid(unsafe_code)]

pub mod height;
pub mod keys;
pub mod noise;
pub mod worldgen;

pub use height::{Band, ColumnSample, SEA_LEVEL, column_height, resolve_column};
pub use keys::{
    CHUNK_HEIGHT, CHUNK_SIZE, ChunkKey, Direction, RegionKey, ZONE_SIZE, ZoneKey,
};
pub use noise::{NoiseField, classify_climate, hash01, hash01_3, jitter2};
pub use worldgen::{WorldGenConfig, WorldGenParams, load_params_from_path};
