//! Collision detection: broad-phase grid, signed distance fields, narrow-phase manifolds.

pub mod broadphase;
pub mod contact;
pub mod narrowphase;
pub mod sdf;

pub use broadphase::{BroadPhase, SpatialGrid};
pub use contact::{ContactManifold, ContactPoint};
pub use narrowphase::NarrowPhase;
