use std::sync::{Arc, Mutex};
use std::thread;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use pinfall::*;

fn world() -> DynamicsWorld {
    DynamicsWorld::initialize(&PhysicsConfig::default()).expect("default physics is valid")
}

fn lane() -> RigidBody {
    RigidBody::new(
        Shape::cuboid(Vec3::new(30.0, 0.5, 3.0)),
        0.0,
        Transform::from_position(Vec3::new(0.0, -0.5, 0.0)),
    )
}

#[test]
fn simulated_time_tracks_advances() {
    let mut world = world();
    for _ in 0..90 {
        world.advance(1.0 / 60.0, 10);
    }
    assert_eq!(world.advance_count(), 90);
    assert_relative_eq!(world.simulated_time(), 1.5, epsilon = 1e-5);
}

#[test]
fn projectile_falls_straight_down_in_empty_world() {
    let mut world = world();
    let ball = world.add_body(RigidBody::new(
        Shape::sphere(0.6),
        5.0,
        Transform::from_position(Vec3::new(3.0, 10.0, -2.0)),
    ));

    let mut last_y = 10.0;
    for _ in 0..60 {
        world.advance(1.0 / 60.0, 10);
        let position = world.transform(ball).expect("ball exists").position;
        assert!(position.y < last_y, "ball should keep falling, y = {}", position.y);
        last_y = position.y;
        assert_eq!(position.x, 3.0);
        assert_eq!(position.z, -2.0);
    }
    // Free fall over one second: 10 - 4.9, give or take the integrator.
    assert_abs_diff_eq!(last_y, 5.1, epsilon = 0.1);
}

#[test]
fn ball_comes_to_rest_on_the_lane() {
    let mut world = world();
    world.add_body(lane());
    let ball = world.add_body(RigidBody::new(
        Shape::sphere(0.6),
        5.0,
        Transform::from_position(Vec3::new(0.0, 1.0, 0.0)),
    ));

    for _ in 0..180 {
        world.advance(1.0 / 60.0, 10);
    }
    let body = world.body(ball).expect("ball exists");
    assert_abs_diff_eq!(body.transform.position.y, 0.6, epsilon = 0.05);
    assert!(body.velocity.linear.length() < 0.2);
}

#[test]
fn static_bodies_never_move() {
    let mut world = world();
    let lane_id = world.add_body(lane());
    let before = world.transform(lane_id).expect("lane exists");
    world.add_body(RigidBody::new(
        Shape::sphere(0.6),
        5.0,
        Transform::from_position(Vec3::new(0.0, 0.7, 0.0)),
    ));
    world.apply_central_impulse(lane_id, Vec3::new(100.0, 0.0, 0.0));
    assert_eq!(world.body(lane_id).expect("lane exists").velocity.linear, Vec3::ZERO);

    for _ in 0..60 {
        world.advance(1.0 / 60.0, 10);
    }
    assert_eq!(world.transform(lane_id), Some(before));
}

#[test]
fn removed_bodies_are_forgotten() {
    let mut world = world();
    let id = world.add_body(RigidBody::new(Shape::sphere(1.0), 1.0, Transform::default()));
    assert!(world.remove_body(id).is_some());
    assert!(world.transform(id).is_none());
    assert!(world.remove_body(id).is_none());
    assert!(!world.apply_central_impulse(id, Vec3::Y));
}

#[test]
fn invalid_gravity_is_a_startup_failure() {
    let config = PhysicsConfig {
        gravity: Vec3::new(0.0, f32::NAN, 0.0),
        ..PhysicsConfig::default()
    };
    assert!(matches!(
        DynamicsWorld::initialize(&config),
        Err(WorldError::InvalidGravity(_))
    ));
}

#[test]
fn dynamics_world_is_sync_and_send() {
    fn assert_sync_send<T: Sync + Send>() {}
    assert_sync_send::<DynamicsWorld>();
}

#[test]
fn shared_world_across_threads() {
    let world = Arc::new(Mutex::new(world()));
    world
        .lock()
        .expect("lock")
        .add_body(RigidBody::new(Shape::sphere(0.5), 1.0, Transform::default()));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let world = Arc::clone(&world);
            thread::spawn(move || {
                world.lock().expect("lock").advance(1.0 / 60.0, 10);
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker panicked");
    }
    assert_eq!(world.lock().expect("lock").advance_count(), 4);
}

fn arena_after_one_throw(parallel: bool) -> Vec<(VisualId, Transform)> {
    let mut simulation = Simulation::new(SimulationConfig::default(), NullPresentation)
        .expect("default config starts");
    simulation.scene_mut().world.set_parallel_enabled(parallel);
    assert_eq!(simulation.scene().world.parallel_enabled(), parallel);
    simulation.handle_input(InputEvent::Fire);
    for _ in 0..120 {
        simulation.frame();
    }
    let registry = &simulation.scene().registry;
    registry
        .active_ids()
        .iter()
        .map(|id| (*id, registry.visual(*id).expect("active visual").transform))
        .collect()
}

#[test]
fn parallel_integration_matches_sequential() {
    let sequential = arena_after_one_throw(false);
    let parallel = arena_after_one_throw(true);
    assert_eq!(sequential.len(), 11);
    assert_eq!(sequential, parallel);
}
