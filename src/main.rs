//! Headless session: builds the arena, walks forward, fires at the target
//! and into the pins, then runs until every fragment has expired.

use std::process::ExitCode;

use pinfall::{InputEvent, Intent, NullPresentation, SimulationConfig, StartupError, Vec3};

const SESSION_FRAMES: u64 = 600;

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("simulation failed to start: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), StartupError> {
    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::from_path(path)?,
        None => SimulationConfig::default(),
    };
    let target = config.arena.target_position;
    let mut simulation = pinfall::Simulation::new(config, NullPresentation)?;

    simulation.handle_input(InputEvent::Lock);
    simulation.handle_input(InputEvent::Pressed(Intent::Forward));

    let mut slow_frames = 0;
    for frame in 0..SESSION_FRAMES {
        match frame {
            30 => simulation.handle_input(InputEvent::Released(Intent::Forward)),
            60 => simulation.handle_input(InputEvent::Fire),
            90 => {
                let position = simulation.viewpoint().position;
                simulation.viewpoint_mut().look_at(target);
                simulation.handle_input(InputEvent::Fire);
                log::info!("fired at target from {position}");
            }
            150 => {
                simulation.viewpoint_mut().look_at(Vec3::new(25.0, 0.5, 0.0));
                simulation.handle_input(InputEvent::Fire);
            }
            _ => {}
        }

        let report = simulation.frame();
        slow_frames += usize::from(report.over_budget);

        if !report.detonations.is_empty() {
            log::info!(
                "frame {}: {} target(s) destroyed, {} fragments",
                report.frame,
                report.detonations.len(),
                report.fragments_spawned
            );
        }
        if report.fragments_expired > 0 {
            log::info!("frame {}: {} fragments expired", report.frame, report.fragments_expired);
        }
    }

    let scene = simulation.scene();
    let standing = simulation
        .pins()
        .iter()
        .zip(simulation.factory().pin_layout())
        .filter(|(pin, home)| {
            scene
                .registry
                .position_of(**pin)
                .is_some_and(|position| position.distance(*home) < 0.1)
        })
        .count();
    log::info!(
        "session done at {:.2}s simulated: {} bodies, {} of 10 pins untouched, {} target(s) destroyed, {} slow frame(s)",
        scene.world.simulated_time(),
        scene.world.body_count(),
        standing,
        simulation.targets().iter().filter(|t| t.is_destroyed()).count(),
        slow_frames
    );
    Ok(())
}
