mod driver;
mod sink;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use terrane_runtime::{Runtime, RuntimeConfig, Terrain, load_runtime_config};
use terrane_world::{WorldGenParams, load_params_from_path};

use crate::driver::Driver;

#[derive(Parser, Debug)]
#[command(name = "terrane", about = "Headless terrain generation driver")]
struct Args {
    /// World seed; overrides the config file
    #[arg(long)]
    seed: Option<i32>,
    /// Worldgen TOML ([world], [terrain], [trees], [village], [runtime])
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Drawn window half width in blocks; overrides the config file
    #[arg(long)]
    radius: Option<i32>,
    /// Driver ticks to run after the initial scene
    #[arg(long, default_value_t = 240)]
    steps: u32,
    /// Generate the full starting area synchronously before the first tick
    #[arg(long)]
    init_scene: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let (mut params, mut rt_cfg) = match &args.config {
        Some(path) => {
            let params = match load_params_from_path(path) {
                Ok(p) => p,
                Err(e) => {
                    log::error!("failed to load worldgen config {:?}: {}", path, e);
                    return ExitCode::FAILURE;
                }
            };
            let rt_cfg = match load_runtime_config(path) {
                Ok(c) => c,
                Err(e) => {
                    log::error!("failed to load runtime config {:?}: {}", path, e);
                    return ExitCode::FAILURE;
                }
            };
            log::info!("loaded config from {:?}", path);
            (params, rt_cfg)
        }
        None => (WorldGenParams::default(), RuntimeConfig::default()),
    };
    if let Some(seed) = args.seed {
        params = params.with_seed(seed);
    }
    if let Some(radius) = args.radius {
        rt_cfg.view_radius = radius.max(16);
    }

    let terrain = Arc::new(Terrain::new(&params, rt_cfg.gen_permits));
    let runtime = match Runtime::new(Arc::clone(&terrain), &rt_cfg) {
        Ok(rt) => rt,
        Err(e) => {
            log::error!("failed to start worker pools: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut driver = Driver::new(runtime, rt_cfg);
    if args.init_scene {
        if let Err(e) = driver.init_scene() {
            log::error!("initial scene failed: {}", e);
            return ExitCode::FAILURE;
        }
    }
    driver.run(args.steps);
    driver.finish();
    ExitCode::SUCCESS
}
