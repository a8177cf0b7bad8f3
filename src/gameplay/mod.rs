pub mod destruction;
pub mod input;
pub mod locomotion;
pub mod orchestrator;
pub mod projectiles;
pub mod targets;

pub use destruction::{DestructionEffect, RemovalSchedule};
pub use input::{InputEvent, Intent};
pub use locomotion::{ControlLock, LocomotionState};
pub use orchestrator::{FrameReport, Simulation};
pub use projectiles::ProjectileTracker;
pub use targets::{Detonation, ExplosiveTarget, ImpactDetector};
