//! Error types for world construction and configuration loading.

use thiserror::Error;

/// Failures while constructing the dynamics world. All of them are fatal at
/// startup; there is no degraded physics mode.
#[derive(Debug, Error, PartialEq)]
pub enum WorldError {
    #[error("gravity must be finite, got {0:?}")]
    InvalidGravity([f32; 3]),
    #[error("time step must be positive and finite, got {0}")]
    InvalidTimeStep(f32),
    #[error("max substeps must be at least 1")]
    InvalidSubsteps,
    #[error("solver needs at least one iteration")]
    InvalidSolverIterations,
    #[error("broadphase cell size must be positive and finite, got {0}")]
    InvalidCellSize(f32),
}

/// Failures while reading or validating a [`crate::config::SimulationConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Anything that can stop a simulation from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    World(#[from] WorldError),
}
