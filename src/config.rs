//! Engine defaults and the serde-backed simulation configuration.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default gravity vector applied in the dynamics world (Y-up).
pub const DEFAULT_GRAVITY: [f32; 3] = [0.0, -9.8, 0.0];

/// Fixed amount of simulated time advanced per rendered frame (seconds).
pub const DEFAULT_TIME_STEP: f32 = 1.0 / 60.0;

/// Upper bound on substeps inside a single world advance.
pub const DEFAULT_MAX_SUBSTEPS: u32 = 10;

/// Largest substep the world takes internally (seconds).
pub const DEFAULT_INTERNAL_STEP: f32 = 1.0 / 120.0;

/// Velocity iterations of the contact solver per substep.
pub const DEFAULT_SOLVER_ITERATIONS: u32 = 10;

pub const DEFAULT_LINEAR_DAMPING: f32 = 0.0;
pub const DEFAULT_ANGULAR_DAMPING: f32 = 0.05;

/// Cell size of the broad-phase uniform grid.
pub const DEFAULT_BROADPHASE_CELL_SIZE: f32 = 4.0;

pub const DEFAULT_RESTITUTION: f32 = 0.3;
pub const DEFAULT_FRICTION: f32 = 0.2;
pub const DEFAULT_ROLLING_FRICTION: f32 = 0.1;

/// How a frame maps onto simulated time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StepMode {
    /// One fixed step per rendered frame; simulation speed follows the refresh rate.
    #[default]
    FixedPerFrame,
    /// Real elapsed time is accumulated and consumed in fixed-size steps.
    Accumulated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: Vec3,
    pub time_step: f32,
    pub max_substeps: u32,
    pub internal_step: f32,
    pub solver_iterations: u32,
    pub broadphase_cell_size: f32,
    pub step_mode: StepMode,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::from_array(DEFAULT_GRAVITY),
            time_step: DEFAULT_TIME_STEP,
            max_substeps: DEFAULT_MAX_SUBSTEPS,
            internal_step: DEFAULT_INTERNAL_STEP,
            solver_iterations: DEFAULT_SOLVER_ITERATIONS,
            broadphase_cell_size: DEFAULT_BROADPHASE_CELL_SIZE,
            step_mode: StepMode::default(),
        }
    }
}

/// Dimensions and placement of the static lane furniture and the pin rack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub lane_length: f32,
    pub lane_width: f32,
    pub lane_height: f32,
    pub rail_height: f32,
    pub rail_thickness: f32,
    /// Outward lean of each guard rail about the lane axis (radians).
    pub rail_tilt: f32,
    pub pin_spacing: f32,
    /// Distance of the head pin from the far end of the lane.
    pub pin_rack_offset: f32,
    pub target_position: Vec3,
    pub viewpoint_start: Vec3,
    pub viewpoint_look_at: Vec3,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            lane_length: 60.0,
            lane_width: 6.0,
            lane_height: 1.0,
            rail_height: 2.5,
            rail_thickness: 0.5,
            rail_tilt: 0.02,
            pin_spacing: 1.1,
            pin_rack_offset: 5.0,
            target_position: Vec3::new(25.0, 15.0, 0.0),
            viewpoint_start: Vec3::new(-25.0, 2.0, 0.0),
            viewpoint_look_at: Vec3::new(0.0, 1.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    pub trigger_radius: f32,
    pub fragment_count: usize,
    /// Seconds a fragment lives before it is removed.
    pub fragment_ttl: f64,
    /// Fragment impulses draw x and z uniformly from `[-lateral, lateral]`.
    pub fragment_lateral_impulse: f32,
    /// Fragment impulses draw y uniformly from `[0, vertical]`.
    pub fragment_vertical_impulse: f32,
    pub fire_impulse: f32,
    pub spawn_distance: f32,
    /// Viewpoint travel per frame while locomotion is engaged.
    pub move_speed: f32,
    pub look_sensitivity: f32,
    pub rng_seed: u64,
    /// Live projectiles kept before the oldest superseded one is disposed.
    pub max_projectiles: usize,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            trigger_radius: 3.0,
            fragment_count: 6,
            fragment_ttl: 3.0,
            fragment_lateral_impulse: 10.0,
            fragment_vertical_impulse: 15.0,
            fire_impulse: 300.0,
            spawn_distance: 2.0,
            move_speed: 0.3,
            look_sensitivity: 0.002,
            rng_seed: 0x5eed_b011,
            max_projectiles: 32,
        }
    }
}

/// Top-level configuration for a [`crate::Simulation`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub physics: PhysicsConfig,
    pub arena: ArenaConfig,
    pub gameplay: GameplayConfig,
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rejects values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let gameplay = &self.gameplay;
        if !(gameplay.trigger_radius > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "trigger_radius must be positive, got {}",
                gameplay.trigger_radius
            )));
        }
        if !(gameplay.fragment_ttl >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "fragment_ttl must be non-negative, got {}",
                gameplay.fragment_ttl
            )));
        }
        if gameplay.max_projectiles == 0 {
            return Err(ConfigError::Invalid(
                "max_projectiles must allow at least one projectile".into(),
            ));
        }
        if !(gameplay.fragment_lateral_impulse >= 0.0 && gameplay.fragment_vertical_impulse >= 0.0)
        {
            return Err(ConfigError::Invalid(
                "fragment impulse ranges must be non-negative".into(),
            ));
        }
        let arena = &self.arena;
        if !(arena.lane_length > 0.0 && arena.lane_width > 0.0 && arena.lane_height > 0.0) {
            return Err(ConfigError::Invalid("lane dimensions must be positive".into()));
        }
        Ok(())
    }
}
