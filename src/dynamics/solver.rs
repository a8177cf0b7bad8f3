use glam::{Mat3, Vec3};

use crate::{
    collision::contact::{ContactManifold, ContactPoint},
    config::DEFAULT_SOLVER_ITERATIONS,
    core::{constraints::Joint, rigidbody::RigidBody, types::ContactMaterial},
    utils::allocator::Arena,
};

/// Totals gathered while solving one substep.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SolverStepMetrics {
    pub manifolds_solved: usize,
    pub contacts_solved: usize,
    pub joints_solved: usize,
    pub normal_impulse_sum: f32,
}

impl SolverStepMetrics {
    fn record(&mut self, manifolds: &[ContactManifold], joints: usize) {
        self.manifolds_solved += manifolds.len();
        self.joints_solved += joints;
        for manifold in manifolds {
            self.contacts_solved += manifold.points.len();
            self.normal_impulse_sum += manifold
                .points
                .iter()
                .map(|p| p.normal_impulse)
                .sum::<f32>();
        }
    }
}

/// Sequential-impulse contact solver with a positional correction pass.
#[derive(Debug, Clone)]
pub struct ContactSolver {
    pub velocity_iterations: u32,
    /// Fraction of remaining penetration removed per substep.
    pub bias_factor: f32,
    /// Penetration tolerated without correction.
    pub slop: f32,
    /// Closing speeds below this do not bounce.
    pub restitution_threshold: f32,
}

impl Default for ContactSolver {
    fn default() -> Self {
        Self::new(DEFAULT_SOLVER_ITERATIONS)
    }
}

impl ContactSolver {
    pub fn new(velocity_iterations: u32) -> Self {
        Self {
            velocity_iterations: velocity_iterations.max(1),
            bias_factor: 0.2,
            slop: 0.005,
            restitution_threshold: 1.0,
        }
    }

    /// Computes each point's restitution target from the pre-solve closing speed.
    pub fn prepare(&self, bodies: &Arena<RigidBody>, manifolds: &mut [ContactManifold]) {
        for manifold in manifolds.iter_mut() {
            let (Some(a), Some(b)) = (bodies.get(manifold.body_a), bodies.get(manifold.body_b))
            else {
                continue;
            };
            let restitution = manifold.material.restitution;
            for point in &mut manifold.points {
                let closing = (b.velocity_at(point.point) - a.velocity_at(point.point))
                    .dot(point.normal);
                point.target_velocity = if closing < -self.restitution_threshold {
                    -restitution * closing
                } else {
                    0.0
                };
            }
        }
    }

    pub fn solve(
        &self,
        bodies: &mut Arena<RigidBody>,
        manifolds: &mut [ContactManifold],
        joints: &[Joint],
        dt: f32,
    ) -> SolverStepMetrics {
        for _ in 0..self.velocity_iterations {
            for manifold in manifolds.iter_mut() {
                let Some((a, b)) = bodies.get2_mut(manifold.body_a, manifold.body_b) else {
                    continue;
                };
                if a.is_static() && b.is_static() {
                    continue;
                }
                let material = manifold.material;
                for point in &mut manifold.points {
                    Self::resolve_normal(a, b, point);
                    Self::resolve_friction(a, b, point, &material);
                    Self::resolve_rolling(a, b, point, &material);
                }
            }

            for joint in joints {
                let (id_a, id_b) = joint.bodies();
                if let Some((a, b)) = bodies.get2_mut(id_a, id_b) {
                    self.resolve_joint(a, b, joint, dt);
                }
            }
        }

        let mut metrics = SolverStepMetrics::default();
        metrics.record(manifolds, joints.len());
        metrics
    }

    /// Pushes overlapping bodies apart along the deepest normal of each manifold.
    pub fn correct_positions(&self, bodies: &mut Arena<RigidBody>, manifolds: &[ContactManifold]) {
        for manifold in manifolds {
            let Some(deepest) = manifold.deepest() else {
                continue;
            };
            let Some((a, b)) = bodies.get2_mut(manifold.body_a, manifold.body_b) else {
                continue;
            };

            let total_inverse_mass = a.inverse_mass() + b.inverse_mass();
            if total_inverse_mass <= 1e-6 {
                continue;
            }
            let correction = (deepest.depth - self.slop).max(0.0) * self.bias_factor;
            let push = deepest.normal * (correction / total_inverse_mass);

            a.transform.position -= push * a.inverse_mass();
            b.transform.position += push * b.inverse_mass();
        }
    }

    fn effective_mass_inverse(a: &RigidBody, b: &RigidBody, ra: Vec3, rb: Vec3, axis: Vec3) -> f32 {
        let angular = |inverse_inertia: Mat3, r: Vec3| {
            axis.dot((inverse_inertia * r.cross(axis)).cross(r))
        };
        a.inverse_mass()
            + b.inverse_mass()
            + angular(a.inverse_inertia_world(), ra)
            + angular(b.inverse_inertia_world(), rb)
    }

    fn apply_pair_impulse(a: &mut RigidBody, b: &mut RigidBody, impulse: Vec3, point: Vec3) {
        a.apply_impulse(-impulse, point);
        b.apply_impulse(impulse, point);
    }

    fn resolve_normal(a: &mut RigidBody, b: &mut RigidBody, contact: &mut ContactPoint) {
        let ra = contact.point - a.transform.position;
        let rb = contact.point - b.transform.position;
        let relative = b.velocity_at(contact.point) - a.velocity_at(contact.point);
        let normal_speed = relative.dot(contact.normal);

        let k = Self::effective_mass_inverse(a, b, ra, rb, contact.normal);
        if k <= 1e-9 {
            return;
        }

        let lambda = (contact.target_velocity - normal_speed) / k;
        let accumulated = (contact.normal_impulse + lambda).max(0.0);
        let delta = accumulated - contact.normal_impulse;
        contact.normal_impulse = accumulated;

        Self::apply_pair_impulse(a, b, contact.normal * delta, contact.point);
    }

    fn resolve_friction(
        a: &mut RigidBody,
        b: &mut RigidBody,
        contact: &mut ContactPoint,
        material: &ContactMaterial,
    ) {
        let max_friction = material.friction * contact.normal_impulse;
        if max_friction <= f32::EPSILON {
            contact.tangent_impulse = Vec3::ZERO;
            return;
        }

        let relative = b.velocity_at(contact.point) - a.velocity_at(contact.point);
        let tangent_velocity = relative - contact.normal * relative.dot(contact.normal);
        let slip = tangent_velocity.length();
        if slip < 1e-6 {
            return;
        }
        let tangent = tangent_velocity / slip;

        let ra = contact.point - a.transform.position;
        let rb = contact.point - b.transform.position;
        let k = Self::effective_mass_inverse(a, b, ra, rb, tangent);
        if k <= 1e-9 {
            return;
        }

        let mut accumulated = contact.tangent_impulse - tangent * (slip / k);
        if accumulated.length() > max_friction {
            accumulated = accumulated.normalize() * max_friction;
        }
        let delta = accumulated - contact.tangent_impulse;
        contact.tangent_impulse = accumulated;

        Self::apply_pair_impulse(a, b, delta, contact.point);
    }

    fn resolve_rolling(
        a: &mut RigidBody,
        b: &mut RigidBody,
        contact: &mut ContactPoint,
        material: &ContactMaterial,
    ) {
        let max_rolling = material.rolling_friction * contact.normal_impulse;
        if max_rolling <= f32::EPSILON {
            contact.rolling_impulse = Vec3::ZERO;
            return;
        }

        let relative_spin = b.velocity.angular - a.velocity.angular;
        let spin = relative_spin.length();
        if spin < 1e-6 {
            return;
        }
        let axis = relative_spin / spin;
        let k = axis.dot(a.inverse_inertia_world() * axis) + axis.dot(b.inverse_inertia_world() * axis);
        if k <= 1e-9 {
            return;
        }

        let mut accumulated = contact.rolling_impulse - axis * (spin / k);
        if accumulated.length() > max_rolling {
            accumulated = accumulated.normalize() * max_rolling;
        }
        let delta = accumulated - contact.rolling_impulse;
        contact.rolling_impulse = accumulated;

        a.apply_angular_impulse(-delta);
        b.apply_angular_impulse(delta);
    }

    fn resolve_joint(&self, a: &mut RigidBody, b: &mut RigidBody, joint: &Joint, dt: f32) {
        match joint {
            Joint::Distance {
                local_anchor_a,
                local_anchor_b,
                rest_length,
                ..
            } => {
                let anchor_a = a.transform.to_world(*local_anchor_a);
                let anchor_b = b.transform.to_world(*local_anchor_b);
                let offset = anchor_b - anchor_a;
                let length = offset.length();
                if length < 1e-6 {
                    return;
                }
                let axis = offset / length;

                let ra = anchor_a - a.transform.position;
                let rb = anchor_b - b.transform.position;
                let k = Self::effective_mass_inverse(a, b, ra, rb, axis);
                if k <= 1e-9 {
                    return;
                }

                let error = length - rest_length;
                let speed = (b.velocity_at(anchor_b) - a.velocity_at(anchor_a)).dot(axis);
                let bias = self.bias_factor * error / dt;
                let lambda = -(speed + bias) / k;

                a.apply_impulse(-axis * lambda, anchor_a);
                b.apply_impulse(axis * lambda, anchor_b);
            }
        }
    }
}
