use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

use terrane_blocks::BlockType;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default)]
    pub world: WorldSection,
    #[serde(default)]
    pub terrain: Terrain,
    #[serde(default)]
    pub trees: Trees,
    #[serde(default)]
    pub village: Village,
}

#[derive(Clone, Debug, Deserialize)]
pub struct WorldSection {
    #[serde(default = "default_seed")]
    pub seed: i32,
}
fn default_seed() -> i32 {
    1337
}
impl Default for WorldSection {
    fn default() -> Self {
        Self {
            seed: default_seed(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Terrain {
    #[serde(default = "default_bedrock_freq")]
    pub bedrock_frequency: f32,
    #[serde(default = "default_beach_freq")]
    pub beach_frequency: f32,
    #[serde(default = "default_hills_freq")]
    pub hills_frequency: f32,
    #[serde(default = "default_hills_octaves")]
    pub hills_octaves: i32,
    #[serde(default = "default_hills_amplitude")]
    pub hills_amplitude: f32,
    #[serde(default = "default_climate_freq")]
    pub temperature_frequency: f32,
    #[serde(default = "default_climate_freq")]
    pub moisture_frequency: f32,
    #[serde(default = "default_river_freq")]
    pub river_frequency: f32,
    #[serde(default = "default_river_width")]
    pub river_width: f32,
}
fn default_bedrock_freq() -> f32 {
    0.0025
}
fn default_beach_freq() -> f32 {
    0.01
}
fn default_hills_freq() -> f32 {
    0.008
}
fn default_hills_octaves() -> i32 {
    4
}
fn default_hills_amplitude() -> f32 {
    40.0
}
fn default_climate_freq() -> f32 {
    0.0015
}
fn default_river_freq() -> f32 {
    0.003
}
fn default_river_width() -> f32 {
    0.03
}
impl Default for Terrain {
    fn default() -> Self {
        Self {
            bedrock_frequency: default_bedrock_freq(),
            beach_frequency: default_beach_freq(),
            hills_frequency: default_hills_freq(),
            hills_octaves: default_hills_octaves(),
            hills_amplitude: default_hills_amplitude(),
            temperature_frequency: default_climate_freq(),
            moisture_frequency: default_climate_freq(),
            river_frequency: default_river_freq(),
            river_width: default_river_width(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Trees {
    /// Trees are only planted on columns lower than this.
    #[serde(default = "default_tree_cutoff")]
    pub max_height: i32,
    #[serde(default = "default_trunk")]
    pub trunk: BlockType,
    #[serde(default = "default_leaves")]
    pub leaves: BlockType,
}
fn default_tree_cutoff() -> i32 {
    128
}
fn default_trunk() -> BlockType {
    BlockType::OakLog
}
fn default_leaves() -> BlockType {
    BlockType::OakLeaves
}
impl Default for Trees {
    fn default() -> Self {
        Self {
            max_height: default_tree_cutoff(),
            trunk: default_trunk(),
            leaves: default_leaves(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Village {
    #[serde(default = "default_region_size")]
    pub region_size: i32,
    /// Probability that a region holds a village at all.
    #[serde(default = "default_village_chance")]
    pub chance: f32,
    /// Upper bound on road-growth queue pops per village.
    #[serde(default = "default_max_segments")]
    pub max_segments: usize,
    #[serde(default = "default_road")]
    pub road: BlockType,
    #[serde(default = "default_library_radius")]
    pub library_radius: i32,
}
fn default_region_size() -> i32 {
    512
}
fn default_village_chance() -> f32 {
    0.6
}
fn default_max_segments() -> usize {
    20_000
}
fn default_road() -> BlockType {
    BlockType::Path
}
fn default_library_radius() -> i32 {
    30
}
impl Default for Village {
    fn default() -> Self {
        Self {
            region_size: default_region_size(),
            chance: default_village_chance(),
            max_segments: default_max_segments(),
            road: default_road(),
            library_radius: default_library_radius(),
        }
    }
}

/// Flattened worldgen parameters for hot loops.
#[derive(Clone, Debug)]
pub struct WorldGenParams {
    pub seed: i32,
    pub bedrock_frequency: f32,
    pub beach_frequency: f32,
    pub hills_frequency: f32,
    pub hills_octaves: i32,
    pub hills_amplitude: f32,
    pub temperature_frequency: f32,
    pub moisture_frequency: f32,
    pub river_frequency: f32,
    pub river_width: f32,
    pub tree_max_height: i32,
    pub tree_trunk: BlockType,
    pub tree_leaves: BlockType,
    pub region_size: i32,
    pub village_chance: f32,
    pub village_max_segments: usize,
    pub village_road: BlockType,
    pub library_radius: i32,
}

impl WorldGenParams {
    pub fn from_config(cfg: &WorldGenConfig) -> Self {
        Self {
            seed: cfg.world.seed,
            bedrock_frequency: cfg.terrain.bedrock_frequency,
            beach_frequency: cfg.terrain.beach_frequency,
            hills_frequency: cfg.terrain.hills_frequency,
            hills_octaves: cfg.terrain.hills_octaves.max(1),
            hills_amplitude: cfg.terrain.hills_amplitude.max(0.0),
            temperature_frequency: cfg.terrain.temperature_frequency,
            moisture_frequency: cfg.terrain.moisture_frequency,
            river_frequency: cfg.terrain.river_frequency,
            river_width: cfg.terrain.river_width,
            tree_max_height: cfg.trees.max_height,
            tree_trunk: cfg.trees.trunk,
            tree_leaves: cfg.trees.leaves,
            region_size: cfg.village.region_size.max(64),
            village_chance: cfg.village.chance.clamp(0.0, 1.0),
            village_max_segments: cfg.village.max_segments.max(4),
            village_road: cfg.village.road,
            library_radius: cfg.village.library_radius,
        }
    }

    pub fn with_seed(mut self, seed: i32) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for WorldGenParams {
    fn default() -> Self {
        Self::from_config(&WorldGenConfig::default())
    }
}

pub fn load_params_from_path(path: &Path) -> Result<WorldGenParams, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let cfg: WorldGenConfig = toml::from_str(&s)?;
    Ok(WorldGenParams::from_config(&cfg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg: WorldGenConfig = toml::from_str(
            r#"
            [world]
            seed = 7

            [village]
            chance = 1.0
            road = "cobblestone"
            "#,
        )
        .unwrap();
        let p = WorldGenParams::from_config(&cfg);
        assert_eq!(p.seed, 7);
        assert_eq!(p.village_chance, 1.0);
        assert_eq!(p.village_road, BlockType::Cobblestone);
        assert_eq!(p.region_size, 512);
        assert_eq!(p.tree_trunk, BlockType::OakLog);
        assert_eq!(p.hills_octaves, 4);
    }

    #[test]
    fn empty_config_is_default() {
        let cfg: WorldGenConfig = toml::from_str("").unwrap();
        let p = WorldGenParams::from_config(&cfg);
        assert_eq!(p.tree_max_height, 128);
        assert_eq!(p.library_radius, 30);
    }
}
