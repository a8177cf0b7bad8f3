use glam::Vec3;

use crate::{core::types::ContactMaterial, utils::allocator::BodyId};

/// One point of contact between two bodies. The normal points from body A
/// toward body B; `depth` is positive while the shapes overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPoint {
    pub point: Vec3,
    pub normal: Vec3,
    pub depth: f32,
    /// Separating velocity the solver aims for along the normal (restitution).
    pub target_velocity: f32,
    pub normal_impulse: f32,
    pub tangent_impulse: Vec3,
    pub rolling_impulse: Vec3,
}

impl ContactPoint {
    pub fn new(point: Vec3, normal: Vec3, depth: f32) -> Self {
        Self {
            point,
            normal,
            depth,
            target_velocity: 0.0,
            normal_impulse: 0.0,
            tangent_impulse: Vec3::ZERO,
            rolling_impulse: Vec3::ZERO,
        }
    }
}

/// All contact points generated for a single body pair in one substep.
#[derive(Debug, Clone)]
pub struct ContactManifold {
    pub body_a: BodyId,
    pub body_b: BodyId,
    pub material: ContactMaterial,
    pub points: Vec<ContactPoint>,
}

impl ContactManifold {
    pub fn new(body_a: BodyId, body_b: BodyId, material: ContactMaterial) -> Self {
        Self {
            body_a,
            body_b,
            material,
            points: Vec::new(),
        }
    }

    pub fn deepest(&self) -> Option<&ContactPoint> {
        self.points
            .iter()
            .max_by(|a, b| a.depth.total_cmp(&b.depth))
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
