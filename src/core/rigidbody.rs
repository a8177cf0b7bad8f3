use glam::{Mat3, Vec3};

use super::{
    shape::{Aabb, Shape},
    types::{Material, Transform, Velocity},
};
use crate::config::{DEFAULT_ANGULAR_DAMPING, DEFAULT_LINEAR_DAMPING};
use crate::utils::math::{invert_diagonal, world_inverse_inertia};

/// Dynamics-side body: shape, mass, motion state, and surface material.
///
/// A body built with zero (or non-positive) mass is static: it is never
/// integrated and ignores impulses.
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub shape: Shape,
    pub transform: Transform,
    pub velocity: Velocity,
    pub material: Material,
    pub gravity_scale: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    mass: f32,
    inverse_mass: f32,
    inverse_inertia_local: Mat3,
}

impl RigidBody {
    pub fn new(shape: Shape, mass: f32, transform: Transform) -> Self {
        let mass = if mass.is_finite() && mass > 0.0 { mass } else { 0.0 };
        let (inverse_mass, inverse_inertia_local) = if mass > 0.0 {
            (1.0 / mass, invert_diagonal(shape.local_inertia(mass)))
        } else {
            (0.0, Mat3::ZERO)
        };

        Self {
            shape,
            transform: Transform {
                position: transform.position,
                rotation: transform.rotation.normalize(),
            },
            velocity: Velocity::default(),
            material: Material::default(),
            gravity_scale: 1.0,
            linear_damping: DEFAULT_LINEAR_DAMPING,
            angular_damping: DEFAULT_ANGULAR_DAMPING,
            mass,
            inverse_mass,
            inverse_inertia_local,
        }
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn inverse_mass(&self) -> f32 {
        self.inverse_mass
    }

    pub fn is_static(&self) -> bool {
        self.inverse_mass == 0.0
    }

    pub fn inverse_inertia_world(&self) -> Mat3 {
        if self.is_static() {
            return Mat3::ZERO;
        }
        world_inverse_inertia(self.inverse_inertia_local, self.transform.rotation)
    }

    /// World-space velocity of a point rigidly attached to the body.
    pub fn velocity_at(&self, point: Vec3) -> Vec3 {
        self.velocity.linear + self.velocity.angular.cross(point - self.transform.position)
    }

    pub fn apply_central_impulse(&mut self, impulse: Vec3) {
        if self.is_static() {
            return;
        }
        self.velocity.linear += impulse * self.inverse_mass;
    }

    pub fn apply_impulse(&mut self, impulse: Vec3, point: Vec3) {
        if self.is_static() {
            return;
        }
        self.velocity.linear += impulse * self.inverse_mass;
        let torque = (point - self.transform.position).cross(impulse);
        self.velocity.angular += self.inverse_inertia_world() * torque;
    }

    pub fn apply_angular_impulse(&mut self, impulse: Vec3) {
        if self.is_static() {
            return;
        }
        self.velocity.angular += self.inverse_inertia_world() * impulse;
    }

    pub fn aabb(&self) -> Aabb {
        self.shape.aabb(&self.transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_mass_bodies_are_static_and_ignore_impulses() {
        let mut lane = RigidBody::new(
            Shape::cuboid(Vec3::new(30.0, 0.5, 3.0)),
            0.0,
            Transform::default(),
        );
        assert!(lane.is_static());
        lane.apply_central_impulse(Vec3::splat(100.0));
        lane.apply_impulse(Vec3::X, Vec3::Y);
        assert_eq!(lane.velocity, Velocity::default());
    }

    #[test]
    fn negative_mass_is_treated_as_static() {
        let body = RigidBody::new(Shape::sphere(1.0), -3.0, Transform::default());
        assert!(body.is_static());
        assert_eq!(body.mass(), 0.0);
    }

    #[test]
    fn central_impulse_changes_linear_velocity_only() {
        let mut ball = RigidBody::new(Shape::sphere(0.6), 5.0, Transform::default());
        ball.apply_central_impulse(Vec3::new(300.0, 0.0, 0.0));
        assert!(ball.velocity.linear.abs_diff_eq(Vec3::new(60.0, 0.0, 0.0), 1e-4));
        assert_eq!(ball.velocity.angular, Vec3::ZERO);
    }

    #[test]
    fn off_centre_impulse_spins_the_body() {
        let mut pin = RigidBody::new(Shape::cylinder(0.25, 0.5), 1.0, Transform::default());
        pin.apply_impulse(Vec3::X, Vec3::new(0.0, 0.5, 0.0));
        assert!(pin.velocity.angular.z < 0.0);
    }
}
