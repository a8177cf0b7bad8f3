use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_FRICTION, DEFAULT_RESTITUTION, DEFAULT_ROLLING_FRICTION};

/// Position and orientation of a body, shared by the dynamics and presentation sides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Maps a world-space point into this transform's local frame.
    pub fn to_local(&self, point: Vec3) -> Vec3 {
        self.rotation.conjugate() * (point - self.position)
    }

    /// Maps a local-space point into world space.
    pub fn to_world(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * point
    }

    /// Component-wise comparison used by sync assertions.
    pub fn abs_diff_eq(&self, other: &Self, tolerance: f32) -> bool {
        self.position.abs_diff_eq(other.position, tolerance)
            && self.rotation.abs_diff_eq(other.rotation, tolerance)
    }
}

/// Linear and angular velocity of a rigid body (world space).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub linear: Vec3,
    pub angular: Vec3,
}

/// Surface coefficients that shape contact response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub restitution: f32,
    pub friction: f32,
    /// Resistance to rolling at the contact patch.
    pub rolling_friction: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            restitution: DEFAULT_RESTITUTION,
            friction: DEFAULT_FRICTION,
            rolling_friction: DEFAULT_ROLLING_FRICTION,
        }
    }
}

impl Material {
    pub fn new(restitution: f32, friction: f32, rolling_friction: f32) -> Self {
        Self {
            restitution,
            friction,
            rolling_friction,
        }
    }

    /// Mixes two materials into the coefficients used for one contact pair.
    pub fn combine(&self, other: &Self) -> ContactMaterial {
        ContactMaterial {
            restitution: (self.restitution.max(0.0) * other.restitution.max(0.0)).sqrt(),
            friction: 0.5 * (self.friction + other.friction),
            rolling_friction: 0.5 * (self.rolling_friction + other.rolling_friction),
        }
    }
}

/// Per-pair coefficients resolved from two [`Material`]s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactMaterial {
    pub restitution: f32,
    pub friction: f32,
    pub rolling_friction: f32,
}

impl Default for ContactMaterial {
    fn default() -> Self {
        Material::default().combine(&Material::default())
    }
}
