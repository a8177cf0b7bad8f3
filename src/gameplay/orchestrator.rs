//! Per-frame driver tying physics, sync, input, and destruction together.

use std::time::Duration;

use glam::Vec3;

use super::{
    destruction::{DestructionEffect, RemovalSchedule},
    input::InputEvent,
    locomotion::{ControlLock, LocomotionState},
    projectiles::ProjectileTracker,
    targets::{ExplosiveTarget, ImpactDetector},
};
use crate::{
    config::{SimulationConfig, StepMode},
    error::StartupError,
    scene::{BodyFactory, Presentation, Projection, Scene, Viewpoint, VisualId},
    utils::logging::{warn_if_frame_budget_exceeded, ScopedTimer},
};

/// What one call to [`Simulation::frame`] did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    pub simulated_time: f64,
    /// World advances performed this frame.
    pub advances: u32,
    pub synced: usize,
    pub detonations: Vec<VisualId>,
    pub fragments_spawned: usize,
    pub fragments_expired: usize,
    /// Wall-clock time the frame took.
    pub wall_time: Duration,
    /// True when `wall_time` exceeded one configured time step.
    pub over_budget: bool,
}

/// The whole bowling arena: world, visuals, participant, and targets.
pub struct Simulation<P: Presentation> {
    config: SimulationConfig,
    scene: Scene<P>,
    factory: BodyFactory,
    pins: Vec<VisualId>,
    targets: Vec<ExplosiveTarget>,
    detector: ImpactDetector,
    destruction: DestructionEffect,
    schedule: RemovalSchedule,
    projectiles: ProjectileTracker,
    locomotion: LocomotionState,
    lock: ControlLock,
    viewpoint: Viewpoint,
    projection: Projection,
    accumulator: f32,
    frame: u64,
}

impl<P: Presentation> Simulation<P> {
    /// Builds the world and lays out the lane, rails, pin rack, and the
    /// explosive target.
    pub fn new(config: SimulationConfig, presentation: P) -> Result<Self, StartupError> {
        let mut simulation = Self::without_arena(config, presentation)?;
        let factory = simulation.factory.clone();
        factory.lane(&mut simulation.scene);
        factory.rails(&mut simulation.scene);
        simulation.pins = factory.pin_rack(&mut simulation.scene);
        simulation.add_explosive_target(simulation.config.arena.target_position);
        log::info!(
            "arena ready: {} bodies, {} pins, {} target(s)",
            simulation.scene.world.body_count(),
            simulation.pins.len(),
            simulation.targets.len()
        );
        Ok(simulation)
    }

    /// Builds the world with nothing in it.
    pub fn without_arena(config: SimulationConfig, presentation: P) -> Result<Self, StartupError> {
        config.validate()?;
        let scene = Scene::new(&config.physics, presentation)?;
        let viewpoint = Viewpoint::looking_at(config.arena.viewpoint_start, config.arena.viewpoint_look_at);
        Ok(Self {
            factory: BodyFactory::new(config.arena.clone()),
            detector: ImpactDetector::new(config.gameplay.trigger_radius),
            destruction: DestructionEffect::from_config(&config.gameplay),
            projectiles: ProjectileTracker::new(config.gameplay.max_projectiles),
            schedule: RemovalSchedule::new(),
            pins: Vec::new(),
            targets: Vec::new(),
            locomotion: LocomotionState::default(),
            lock: ControlLock::default(),
            viewpoint,
            projection: Projection::default(),
            accumulator: 0.0,
            frame: 0,
            scene,
            config,
        })
    }

    pub fn add_explosive_target(&mut self, position: Vec3) -> VisualId {
        let visual = self.factory.explosive_target(&mut self.scene, position);
        self.targets.push(ExplosiveTarget::new(visual));
        visual
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Pressed(intent) => self.locomotion.set(intent, true),
            InputEvent::Released(intent) => self.locomotion.set(intent, false),
            InputEvent::Fire => {
                self.fire();
            }
            InputEvent::Lock => {
                log::info!("view control locked");
                self.lock = ControlLock::Locked;
            }
            InputEvent::Unlock => {
                log::info!("view control unlocked");
                self.lock = ControlLock::Unlocked;
            }
            InputEvent::Look { dx, dy } => {
                if self.lock.is_locked() {
                    let sensitivity = self.config.gameplay.look_sensitivity;
                    self.viewpoint.rotate(dx * sensitivity, dy * sensitivity);
                }
            }
            InputEvent::Resize { width, height } => self.resize(width, height),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection.resize(width, height);
    }

    /// Spawns a projectile ahead of the viewpoint and launches it along
    /// the view direction.
    pub fn fire(&mut self) -> VisualId {
        let projectile = self.spawn_projectile();
        let impulse = self.viewpoint.forward() * self.config.gameplay.fire_impulse;
        self.apply_projectile_impulse(impulse);
        projectile
    }

    /// Spawns a resting projectile `spawn_distance` along the view direction
    /// and makes it the tracked one. Superseded projectiles beyond the cap
    /// are disposed, oldest first.
    pub fn spawn_projectile(&mut self) -> VisualId {
        let origin = self.viewpoint.position
            + self.viewpoint.forward() * self.config.gameplay.spawn_distance;
        let projectile = self.factory.projectile(&mut self.scene, origin);
        for superseded in self.projectiles.supersede(projectile) {
            self.scene.dispose(superseded);
            log::debug!("disposed superseded projectile {superseded:?}");
        }
        log::debug!("spawned projectile {projectile:?} at {origin}");
        projectile
    }

    /// Applies an impulse to the tracked projectile; false if there is none.
    pub fn apply_projectile_impulse(&mut self, impulse: Vec3) -> bool {
        let Some(body) = self
            .projectiles
            .tracked()
            .and_then(|projectile| self.scene.registry.body_of(projectile))
        else {
            log::debug!("no projectile to launch");
            return false;
        };
        self.scene.world.apply_central_impulse(body, impulse)
    }

    /// Runs one frame with the configured fixed step.
    pub fn frame(&mut self) -> FrameReport {
        let step = self.config.physics.time_step;
        self.frame_with_elapsed(Duration::from_secs_f32(step))
    }

    /// Runs one frame. `elapsed` only matters in [`StepMode::Accumulated`];
    /// the fixed mode always advances by one configured step.
    pub fn frame_with_elapsed(&mut self, elapsed: Duration) -> FrameReport {
        let timer = ScopedTimer::new("frame");
        self.frame += 1;
        let mut report = FrameReport {
            frame: self.frame,
            ..FrameReport::default()
        };

        report.advances = self.step_physics(elapsed);
        report.synced = self.scene.sync_all().synced;

        if self.lock.is_locked() {
            self.apply_locomotion();
        }

        let now = self.scene.world.simulated_time();
        let projectile = self
            .projectiles
            .tracked()
            .and_then(|projectile| self.scene.registry.position_of(projectile));
        for detonation in self
            .detector
            .check(projectile, &mut self.targets, &self.scene.registry)
        {
            let fragments = self.destruction.trigger(
                &mut self.scene,
                &self.factory,
                &detonation,
                &mut self.schedule,
                now,
            );
            report.fragments_spawned += fragments.len();
            report.detonations.push(detonation.target);
        }

        for expired in self.schedule.drain_due(now) {
            if self.scene.dispose(expired) {
                report.fragments_expired += 1;
            } else {
                log::trace!("fragment {expired:?} was already gone");
            }
        }

        self.scene.presentation.render(&self.viewpoint, &self.projection);
        report.simulated_time = self.scene.world.simulated_time();
        report.wall_time = timer.elapsed();
        report.over_budget = warn_if_frame_budget_exceeded(
            report.wall_time,
            self.config.physics.time_step * 1000.0,
        );
        report
    }

    fn step_physics(&mut self, elapsed: Duration) -> u32 {
        let physics = &self.config.physics;
        match physics.step_mode {
            StepMode::FixedPerFrame => {
                self.scene.world.advance(physics.time_step, physics.max_substeps);
                1
            }
            StepMode::Accumulated => {
                let step = physics.time_step;
                let ceiling = step * physics.max_substeps as f32;
                self.accumulator = (self.accumulator + elapsed.as_secs_f32()).min(ceiling);
                // Tolerance keeps an exact multiple of the step from losing one.
                let advances = ((self.accumulator / step + 1e-4).floor() as u32).min(physics.max_substeps);
                for _ in 0..advances {
                    self.scene.world.advance(step, physics.max_substeps);
                }
                self.accumulator = (self.accumulator - advances as f32 * step).max(0.0);
                advances
            }
        }
    }

    fn apply_locomotion(&mut self) {
        let direction = self.locomotion.direction();
        if direction == glam::Vec2::ZERO {
            return;
        }
        let speed = self.config.gameplay.move_speed;
        self.viewpoint.move_forward(direction.y * speed);
        self.viewpoint.move_right(direction.x * speed);
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene<P> {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene<P> {
        &mut self.scene
    }

    pub fn presentation(&self) -> &P {
        &self.scene.presentation
    }

    pub fn factory(&self) -> &BodyFactory {
        &self.factory
    }

    pub fn pins(&self) -> &[VisualId] {
        &self.pins
    }

    pub fn targets(&self) -> &[ExplosiveTarget] {
        &self.targets
    }

    pub fn tracked_projectile(&self) -> Option<VisualId> {
        self.projectiles.tracked()
    }

    pub fn live_projectiles(&self) -> usize {
        self.projectiles.len()
    }

    pub fn pending_removals(&self) -> usize {
        self.schedule.len()
    }

    pub fn viewpoint(&self) -> &Viewpoint {
        &self.viewpoint
    }

    pub fn viewpoint_mut(&mut self) -> &mut Viewpoint {
        &mut self.viewpoint
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn control_lock(&self) -> ControlLock {
        self.lock
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{gameplay::input::Intent, scene::RecordingPresentation};

    #[test]
    fn impulse_without_projectile_is_a_no_op() {
        let mut simulation =
            Simulation::without_arena(SimulationConfig::default(), RecordingPresentation::new())
                .expect("default config");
        assert!(!simulation.apply_projectile_impulse(Vec3::X));
    }

    #[test]
    fn report_carries_wall_time() {
        let mut simulation =
            Simulation::without_arena(SimulationConfig::default(), RecordingPresentation::new())
                .expect("default config");
        let report = simulation.frame();
        assert!(report.wall_time > Duration::ZERO);
        assert_eq!(report.frame, 1);
    }

    #[test]
    fn accumulated_mode_waits_for_a_full_step() {
        let mut config = SimulationConfig::default();
        config.physics.step_mode = StepMode::Accumulated;
        let mut simulation = Simulation::without_arena(config, RecordingPresentation::new())
            .expect("default config");

        assert_eq!(simulation.frame_with_elapsed(Duration::from_millis(5)).advances, 0);
        assert_eq!(simulation.frame_with_elapsed(Duration::from_millis(15)).advances, 1);
        assert_eq!(simulation.frame_with_elapsed(Duration::from_secs(5)).advances, 10);
    }

    #[test]
    fn movement_needs_the_lock() {
        let mut simulation =
            Simulation::without_arena(SimulationConfig::default(), RecordingPresentation::new())
                .expect("default config");
        let start = simulation.viewpoint().position;
        simulation.handle_input(InputEvent::Pressed(Intent::Forward));
        simulation.frame();
        assert_eq!(simulation.viewpoint().position, start);

        simulation.handle_input(InputEvent::Lock);
        simulation.frame();
        assert!(simulation.viewpoint().position.x > start.x);
    }
}
