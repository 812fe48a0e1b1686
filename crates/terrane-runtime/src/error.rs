use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TerrainError {
    #[error("no chunk loaded at ({x}, {y}, {z})")]
    NotLoaded { x: i32, y: i32, z: i32 },
}
