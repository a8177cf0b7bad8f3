use glam::Vec3;

use crate::{
    core::rigidbody::RigidBody,
    utils::{allocator::Arena, math::angular_velocity_to_quat},
};

/// Semi-implicit Euler integrator for rigid bodies. Static bodies are skipped.
#[derive(Debug, Clone, Default)]
pub struct Integrator {
    parallel: bool,
}

impl Integrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_parallel(&mut self, enabled: bool) {
        self.parallel = enabled;
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }

    pub fn integrate_velocity(body: &mut RigidBody, gravity: Vec3, dt: f32) {
        if body.is_static() {
            return;
        }

        body.velocity.linear += gravity * body.gravity_scale * dt;
        body.velocity.linear *= (1.0 - body.linear_damping * dt).max(0.0);
        body.velocity.angular *= (1.0 - body.angular_damping * dt).max(0.0);
    }

    pub fn integrate_position(body: &mut RigidBody, dt: f32) {
        if body.is_static() {
            return;
        }

        body.transform.position += body.velocity.linear * dt;
        let delta = angular_velocity_to_quat(body.velocity.angular, dt);
        body.transform.rotation = (delta * body.transform.rotation).normalize();
    }

    pub fn integrate_velocities(&self, bodies: &mut Arena<RigidBody>, gravity: Vec3, dt: f32) {
        #[cfg(feature = "parallel")]
        {
            if self.parallel {
                bodies.par_for_each_mut(|body| Self::integrate_velocity(body, gravity, dt));
                return;
            }
        }

        for (_, body) in bodies.iter_mut() {
            Self::integrate_velocity(body, gravity, dt);
        }
    }

    pub fn integrate_positions(&self, bodies: &mut Arena<RigidBody>, dt: f32) {
        #[cfg(feature = "parallel")]
        {
            if self.parallel {
                bodies.par_for_each_mut(|body| Self::integrate_position(body, dt));
                return;
            }
        }

        for (_, body) in bodies.iter_mut() {
            Self::integrate_position(body, dt);
        }
    }
}
