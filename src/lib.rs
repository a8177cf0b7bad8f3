//! Pinfall – a first-person bowling arena on a small rigid-body engine.
//!
//! The [`DynamicsWorld`] owns every rigid body and advances them with a
//! fixed step. A [`BodyRegistry`] joins each body to the visual that a
//! [`Presentation`] draws, and [`Simulation`] runs the per-frame loop:
//! physics, sync, movement, target detection, fragment cleanup, render.

pub mod collision;
pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod gameplay;
pub mod scene;
pub mod utils;
pub mod world;

pub use glam::{Quat, Vec2, Vec3};

pub use collision::{broadphase::BroadPhase, contact::ContactManifold, narrowphase::NarrowPhase};
pub use config::{ArenaConfig, GameplayConfig, PhysicsConfig, SimulationConfig, StepMode};
pub use core::{
    constraints::Joint,
    rigidbody::RigidBody,
    shape::Shape,
    types::{Material, Transform, Velocity},
};
pub use dynamics::{integrator::Integrator, solver::ContactSolver};
pub use error::{ConfigError, StartupError, WorldError};
pub use gameplay::{
    ControlLock, DestructionEffect, Detonation, ExplosiveTarget, FrameReport, ImpactDetector,
    InputEvent, Intent, LocomotionState, RemovalSchedule, Simulation,
};
pub use scene::{
    BodyFactory, BodyHandle, BodyRegistry, Geometry, NullPresentation, PairDesc, Presentation,
    Projection, RecordingPresentation, Scene, Viewpoint, VisualBody, VisualId,
};
pub use utils::allocator::{Arena, BodyId};
pub use world::{DynamicsWorld, WorldInfo};
