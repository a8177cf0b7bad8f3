use glam::Vec3;

use crate::{
    collision::{broadphase::BroadPhase, contact::ContactManifold, narrowphase::NarrowPhase},
    config::PhysicsConfig,
    core::{constraints::Joint, rigidbody::RigidBody, types::Transform},
    dynamics::{
        integrator::Integrator,
        solver::{ContactSolver, SolverStepMetrics},
    },
    error::WorldError,
    utils::{
        allocator::{Arena, BodyId},
        logging::ScopedTimer,
    },
};

/// Global parameters mirrored to every subsystem that needs them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldInfo {
    pub gravity: Vec3,
}

/// Owns every rigid body and advances them with a fixed step.
pub struct DynamicsWorld {
    bodies: Arena<RigidBody>,
    joints: Vec<Joint>,
    gravity: Vec3,
    info: WorldInfo,
    internal_step: f32,
    broadphase: BroadPhase,
    solver: ContactSolver,
    integrator: Integrator,
    simulated_time: f64,
    advance_count: u64,
    last_metrics: SolverStepMetrics,
}

impl DynamicsWorld {
    /// Builds the collision pipeline, solver, and integrator and applies
    /// `config.gravity`. Every failure here is fatal for the caller.
    pub fn initialize(config: &PhysicsConfig) -> Result<Self, WorldError> {
        if !config.gravity.is_finite() {
            return Err(WorldError::InvalidGravity(config.gravity.to_array()));
        }
        if !(config.internal_step.is_finite() && config.internal_step > 0.0) {
            return Err(WorldError::InvalidTimeStep(config.internal_step));
        }
        if !(config.time_step.is_finite() && config.time_step > 0.0) {
            return Err(WorldError::InvalidTimeStep(config.time_step));
        }
        if config.max_substeps == 0 {
            return Err(WorldError::InvalidSubsteps);
        }
        if config.solver_iterations == 0 {
            return Err(WorldError::InvalidSolverIterations);
        }
        if !(config.broadphase_cell_size.is_finite() && config.broadphase_cell_size > 0.0) {
            return Err(WorldError::InvalidCellSize(config.broadphase_cell_size));
        }

        let mut world = Self {
            bodies: Arena::new(),
            joints: Vec::new(),
            gravity: Vec3::ZERO,
            info: WorldInfo {
                gravity: Vec3::ZERO,
            },
            internal_step: config.internal_step,
            broadphase: BroadPhase::new(config.broadphase_cell_size),
            solver: ContactSolver::new(config.solver_iterations),
            integrator: Integrator::new(),
            simulated_time: 0.0,
            advance_count: 0,
            last_metrics: SolverStepMetrics::default(),
        };
        world.set_gravity(config.gravity);
        log::debug!(
            "dynamics world initialized: gravity {:?}, internal step {:.5}s",
            config.gravity,
            config.internal_step
        );
        Ok(world)
    }

    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
        self.info.gravity = gravity;
    }

    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    pub fn world_info(&self) -> &WorldInfo {
        &self.info
    }

    pub fn set_parallel_enabled(&mut self, enabled: bool) {
        self.integrator.set_parallel(enabled);
    }

    pub fn parallel_enabled(&self) -> bool {
        self.integrator.parallel()
    }

    pub fn add_body(&mut self, body: RigidBody) -> BodyId {
        self.bodies.insert(body)
    }

    /// Deregisters a body and drops every joint it participates in.
    pub fn remove_body(&mut self, id: BodyId) -> Option<RigidBody> {
        let body = self.bodies.remove(id)?;
        self.joints.retain(|joint| !joint.involves(id));
        Some(body)
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.bodies.contains(id)
    }

    pub fn body(&self, id: BodyId) -> Option<&RigidBody> {
        self.bodies.get(id)
    }

    /// Current world transform of a body, if it is still registered.
    pub fn transform(&self, id: BodyId) -> Option<Transform> {
        self.bodies.get(id).map(|body| body.transform)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &RigidBody)> + '_ {
        self.bodies.iter()
    }

    /// Requests an impulse through the body's centre of mass. Returns false
    /// when the body no longer exists.
    pub fn apply_central_impulse(&mut self, id: BodyId, impulse: Vec3) -> bool {
        match self.bodies.get_mut(id) {
            Some(body) => {
                body.apply_central_impulse(impulse);
                true
            }
            None => false,
        }
    }

    pub fn apply_impulse(&mut self, id: BodyId, impulse: Vec3, point: Vec3) -> bool {
        match self.bodies.get_mut(id) {
            Some(body) => {
                body.apply_impulse(impulse, point);
                true
            }
            None => false,
        }
    }

    pub fn add_joint(&mut self, joint: Joint) -> bool {
        let (a, b) = joint.bodies();
        if a == b || !self.contains(a) || !self.contains(b) {
            return false;
        }
        self.joints.push(joint);
        true
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    /// Total simulated time advanced so far, in seconds.
    pub fn simulated_time(&self) -> f64 {
        self.simulated_time
    }

    pub fn advance_count(&self) -> u64 {
        self.advance_count
    }

    pub fn last_metrics(&self) -> &SolverStepMetrics {
        &self.last_metrics
    }

    /// Number of substeps `advance(delta, max_substeps)` will take.
    pub fn substeps_for(&self, delta: f32, max_substeps: u32) -> u32 {
        // Tolerance keeps exact multiples of the internal step from rounding up.
        let wanted = (delta / self.internal_step - 1e-4).ceil();
        (wanted as u32).clamp(1, max_substeps.max(1))
    }

    /// Integrates all dynamic bodies by exactly `delta` seconds, split into at
    /// most `max_substeps` equal substeps.
    pub fn advance(&mut self, delta: f32, max_substeps: u32) {
        if !(delta.is_finite() && delta > 0.0) {
            log::trace!("ignoring advance by non-positive delta {delta}");
            return;
        }

        let substeps = self.substeps_for(delta, max_substeps);
        let dt = delta / substeps as f32;
        let mut metrics = SolverStepMetrics::default();
        for _ in 0..substeps {
            let step = self.substep(dt);
            metrics.manifolds_solved += step.manifolds_solved;
            metrics.contacts_solved += step.contacts_solved;
            metrics.joints_solved += step.joints_solved;
            metrics.normal_impulse_sum += step.normal_impulse_sum;
        }

        self.last_metrics = metrics;
        self.simulated_time += f64::from(delta);
        self.advance_count += 1;
    }

    /// Collects contacts for the current state without advancing.
    pub fn collect_contacts(&mut self) -> Vec<ContactManifold> {
        self.generate_contacts()
    }

    fn substep(&mut self, dt: f32) -> SolverStepMetrics {
        {
            let _timer = ScopedTimer::new("integrator::velocities");
            self.integrator
                .integrate_velocities(&mut self.bodies, self.gravity, dt);
        }

        let mut manifolds = {
            let _timer = ScopedTimer::new("contacts::generate");
            self.generate_contacts()
        };

        let metrics = {
            let _timer = ScopedTimer::new("solver::velocity");
            self.solver.prepare(&self.bodies, &mut manifolds);
            self.solver
                .solve(&mut self.bodies, &mut manifolds, &self.joints, dt)
        };

        {
            let _timer = ScopedTimer::new("integrator::positions");
            self.integrator.integrate_positions(&mut self.bodies, dt);
        }

        {
            let _timer = ScopedTimer::new("solver::position");
            self.solver.correct_positions(&mut self.bodies, &manifolds);
        }

        metrics
    }

    fn generate_contacts(&mut self) -> Vec<ContactManifold> {
        if self.bodies.len() < 2 {
            return Vec::new();
        }

        self.broadphase
            .potential_pairs(&self.bodies)
            .into_iter()
            .filter_map(|(id_a, id_b)| {
                let body_a = self.bodies.get(id_a)?;
                let body_b = self.bodies.get(id_b)?;
                NarrowPhase::collide(id_a, body_a, id_b, body_b)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shape::Shape;

    fn world() -> DynamicsWorld {
        DynamicsWorld::initialize(&PhysicsConfig::default()).expect("default config is valid")
    }

    #[test]
    fn initialize_rejects_broken_configs() {
        let mut config = PhysicsConfig::default();
        config.gravity = Vec3::new(0.0, f32::NAN, 0.0);
        assert!(matches!(
            DynamicsWorld::initialize(&config),
            Err(WorldError::InvalidGravity(_))
        ));

        let mut config = PhysicsConfig::default();
        config.max_substeps = 0;
        assert_eq!(
            DynamicsWorld::initialize(&config).err(),
            Some(WorldError::InvalidSubsteps)
        );

        let mut config = PhysicsConfig::default();
        config.internal_step = 0.0;
        assert_eq!(
            DynamicsWorld::initialize(&config).err(),
            Some(WorldError::InvalidTimeStep(0.0))
        );
    }

    #[test]
    fn gravity_is_mirrored_into_world_info() {
        let mut world = world();
        assert_eq!(world.world_info().gravity, Vec3::new(0.0, -9.8, 0.0));
        world.set_gravity(Vec3::new(0.0, -1.6, 0.0));
        assert_eq!(world.world_info().gravity, world.gravity());
    }

    #[test]
    fn substeps_are_capped() {
        let world = world();
        assert_eq!(world.substeps_for(1.0 / 60.0, 10), 2);
        assert_eq!(world.substeps_for(1.0, 10), 10);
        assert_eq!(world.substeps_for(1e-6, 10), 1);
    }

    #[test]
    fn removing_a_body_releases_its_joints() {
        let mut world = world();
        let a = world.add_body(RigidBody::new(Shape::sphere(0.5), 1.0, Transform::default()));
        let b = world.add_body(RigidBody::new(
            Shape::sphere(0.5),
            1.0,
            Transform::from_position(Vec3::X * 3.0),
        ));
        assert!(world.add_joint(Joint::distance(a, b, 3.0)));
        assert_eq!(world.joints().len(), 1);

        assert!(world.remove_body(a).is_some());
        assert!(world.joints().is_empty());
        assert!(world.remove_body(a).is_none());
        assert!(!world.apply_central_impulse(a, Vec3::Y));
    }

    #[test]
    fn distance_joint_pulls_bodies_to_rest_length() {
        let config = PhysicsConfig {
            gravity: Vec3::ZERO,
            ..PhysicsConfig::default()
        };
        let mut world = DynamicsWorld::initialize(&config).expect("valid config");
        let a = world.add_body(RigidBody::new(Shape::sphere(0.25), 1.0, Transform::default()));
        let b = world.add_body(RigidBody::new(
            Shape::sphere(0.25),
            1.0,
            Transform::from_position(Vec3::X * 3.0),
        ));
        assert!(world.add_joint(Joint::distance(a, b, 2.0)));

        for _ in 0..120 {
            world.advance(1.0 / 60.0, 10);
        }
        let pa = world.transform(a).expect("a").position;
        let pb = world.transform(b).expect("b").position;
        approx::assert_abs_diff_eq!(pa.distance(pb), 2.0, epsilon = 1e-2);
        assert!(world.last_metrics().joints_solved > 0);
    }

    #[test]
    fn non_positive_delta_is_ignored() {
        let mut world = world();
        world.advance(0.0, 10);
        world.advance(-1.0, 10);
        assert_eq!(world.advance_count(), 0);
        assert_eq!(world.simulated_time(), 0.0);
    }
}
