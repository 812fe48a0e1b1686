use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::thread;

/// `[runtime]` section of the worldgen TOML. Worker counts of zero mean
/// "derive from available parallelism".
#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default = "default_gen_permits")]
    pub gen_permits: usize,
    #[serde(default)]
    pub gen_workers: usize,
    #[serde(default)]
    pub mesh_workers: usize,
    /// Half width of the drawn window, in blocks.
    #[serde(default = "default_view_radius")]
    pub view_radius: i32,
    /// Half width of the area whose zones are kept requested, in blocks.
    #[serde(default = "default_zone_radius")]
    pub zone_radius: i32,
    /// Ticks between dirty-chunk remesh sweeps.
    #[serde(default = "default_remesh_interval")]
    pub remesh_interval: u32,
}
fn default_gen_permits() -> usize {
    16
}
fn default_view_radius() -> i32 {
    256
}
fn default_zone_radius() -> i32 {
    192
}
fn default_remesh_interval() -> u32 {
    30
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            gen_permits: default_gen_permits(),
            gen_workers: 0,
            mesh_workers: 0,
            view_radius: default_view_radius(),
            zone_radius: default_zone_radius(),
            remesh_interval: default_remesh_interval(),
        }
    }
}

impl RuntimeConfig {
    /// Generation and mesh worker counts. Meshing keeps one thread, or a
    /// quarter of the machine when that is more; generation gets the rest.
    pub fn workers(&self) -> (usize, usize) {
        let worker_count: usize = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(8);
        let w_mesh = if self.mesh_workers > 0 {
            self.mesh_workers
        } else {
            (worker_count / 4).max(1)
        };
        let w_gen = if self.gen_workers > 0 {
            self.gen_workers
        } else {
            worker_count.saturating_sub(w_mesh).max(1)
        };
        (w_gen, w_mesh)
    }
}

#[derive(Deserialize, Default)]
struct RuntimeFile {
    #[serde(default)]
    runtime: RuntimeConfig,
}

pub fn load_runtime_config(path: &Path) -> Result<RuntimeConfig, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let file: RuntimeFile = toml::from_str(&s)?;
    Ok(file.runtime)
}
