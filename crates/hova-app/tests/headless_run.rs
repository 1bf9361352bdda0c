//! End-to-end runs of the scheduler against the procedural terrain.

use std::collections::VecDeque;

use hova_app::{
    HeadlessRenderer, Scheduler, SchedulerSettings, SchedulerState, SimCommand, load_terrain,
    session_params,
};
use hova_config::{CliArgs, Config};
use hova_sim::FixedEntropy;

fn run_scripted(config: &Config, seed: u64, script: &[(u32, SimCommand)]) -> (Scheduler, HeadlessRenderer) {
    let mesh = load_terrain(&config.terrain).unwrap();
    let settings = SchedulerSettings::from_config(config, Some(20.0));
    let mut scheduler = Scheduler::new(
        settings,
        session_params(config),
        mesh,
        Box::new(FixedEntropy(seed)),
    );
    let mut renderer = HeadlessRenderer::new(config.render.msaa_samples);
    let mut input = VecDeque::new();

    scheduler.start(0.0);
    let dt = config.delta_time();
    let mut i = 0u32;
    while scheduler.state() == SchedulerState::Running {
        i += 1;
        for (_, command) in script.iter().filter(|(at, _)| *at == i) {
            input.push_back(*command);
        }
        scheduler.iterate(f64::from(i) * dt, &mut input, &mut renderer);
    }
    (scheduler, renderer)
}

#[test]
fn test_seeded_runs_are_identical() {
    let config = Config::default();
    let script = [(300, SimCommand::NewSession), (700, SimCommand::ReportStats)];
    let (a, ra) = run_scripted(&config, 11, &script);
    let (b, rb) = run_scripted(&config, 11, &script);

    assert_eq!(a.session().cosmos(), b.session().cosmos());
    assert_eq!(
        a.session().hover().terrain_height.to_bits(),
        b.session().hover().terrain_height.to_bits()
    );
    assert_eq!(ra.frames(), rb.frames());
    assert_eq!(a.session().clock().logic_count(), 1200);
}

#[test]
fn test_vehicle_stays_near_surface() {
    let config = Config::default();
    let (scheduler, _) = run_scripted(&config, 3, &[]);
    let height = scheduler.session().hover().terrain_height;
    let surface = config.terrain.radius;
    let slack = config.terrain.amplitude + 0.5;
    assert!(
        (height - surface).abs() < slack,
        "height {height} drifted from surface {surface}"
    );
}

#[test]
fn test_cli_cap_limits_frames() {
    let args = CliArgs {
        max_fps: Some(30.0),
        ..CliArgs::default()
    };
    let mut config = Config::default();
    config.apply_cli_overrides(&args);

    let (scheduler, renderer) = run_scripted(&config, 1, &[]);
    // 20 simulated seconds at 30 frames per second.
    assert!((i64::try_from(renderer.frames()).unwrap() - 600).abs() <= 1);
    assert_eq!(scheduler.session().clock().frame_count(), renderer.frames());
    assert!(renderer.status().ends_with("Sec |"));
}

#[test]
fn test_quit_stops_early() {
    let config = Config::default();
    let (scheduler, _) = run_scripted(&config, 9, &[(90, SimCommand::Quit)]);
    assert_eq!(scheduler.session().clock().logic_count(), 90);
}
