use glam::Vec3;

use crate::utils::allocator::BodyId;

/// Constraint between two bodies, solved alongside contacts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Joint {
    /// Keeps the anchor points of both bodies a fixed distance apart.
    Distance {
        body_a: BodyId,
        body_b: BodyId,
        local_anchor_a: Vec3,
        local_anchor_b: Vec3,
        rest_length: f32,
    },
}

impl Joint {
    pub fn distance(body_a: BodyId, body_b: BodyId, rest_length: f32) -> Self {
        Joint::Distance {
            body_a,
            body_b,
            local_anchor_a: Vec3::ZERO,
            local_anchor_b: Vec3::ZERO,
            rest_length,
        }
    }

    pub fn bodies(&self) -> (BodyId, BodyId) {
        match self {
            Joint::Distance { body_a, body_b, .. } => (*body_a, *body_b),
        }
    }

    pub fn involves(&self, id: BodyId) -> bool {
        let (a, b) = self.bodies();
        a == id || b == id
    }
}
