//! Core types describing rigid bodies, their shapes, and shared data.

pub mod constraints;
pub mod rigidbody;
pub mod shape;
pub mod types;

pub use constraints::Joint;
pub use rigidbody::RigidBody;
pub use shape::{Aabb, Shape};
pub use types::{ContactMaterial, Material, Transform, Velocity};
