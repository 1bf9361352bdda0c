//! Hova: a hover vehicle skimming a small planet, driven by a fixed-timestep
//! scheduler.
//!
//! Run with: `cargo run -p hova-app -- [MSAA] [MAXFPS]`

use std::process::ExitCode;

use clap::Parser;
use hova_app::{
    HeadlessRenderer, Scheduler, SchedulerSettings, load_terrain, session_params,
    spawn_stdin_input,
};
use hova_config::{CliArgs, Config};
use hova_sim::{Entropy, FixedEntropy, OsEntropy};
use tracing::{error, info};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().or_else(Config::default_dir);
    let loaded = match &config_dir {
        Some(dir) => Config::load_or_default(dir),
        None => Ok(Config::default()),
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            hova_log::init_logging(None, false, None);
            error!("Failed to load config: {e}");
            return ExitCode::FAILURE;
        }
    };
    config.apply_cli_overrides(&args);

    let log_dir = config_dir
        .as_deref()
        .filter(|_| config.debug.log_to_file)
        .map(|dir| dir.join("logs"));
    hova_log::init_logging(log_dir.as_deref(), cfg!(debug_assertions), Some(&config));

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {e}");
        return ExitCode::FAILURE;
    }

    info!("Hova");
    info!(
        "MSAA: {} | Max FPS: {} | Logic rate: {}",
        config.render.msaa_samples, config.render.max_fps, config.sim.logic_rate
    );
    info!("Controls (type + Enter): N = new session, F = report FPS/LPS, Q = quit");

    let mesh = match load_terrain(&config.terrain) {
        Ok(mesh) => mesh,
        Err(e) => {
            error!("Terrain unavailable: {e}");
            return ExitCode::FAILURE;
        }
    };

    let entropy: Box<dyn Entropy> = match args.seed {
        Some(seed) => Box::new(FixedEntropy(seed)),
        None => Box::new(OsEntropy),
    };

    let mut input = match spawn_stdin_input() {
        Ok(input) => input,
        Err(e) => {
            error!("Failed to start input thread: {e}");
            return ExitCode::FAILURE;
        }
    };
    let mut renderer = HeadlessRenderer::new(config.render.msaa_samples);

    let mut scheduler = Scheduler::new(
        SchedulerSettings::from_config(&config, args.duration),
        session_params(&config),
        mesh,
        entropy,
    );
    scheduler.run(&mut input, &mut renderer);

    info!("Rendered {} frames", renderer.frames());
    ExitCode::SUCCESS
}
