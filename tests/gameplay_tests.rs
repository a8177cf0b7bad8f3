use pinfall::{scene::factory::FRAGMENT_MASS, *};

fn weightless() -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.physics.gravity = Vec3::ZERO;
    config
}

fn scene() -> Scene<RecordingPresentation> {
    Scene::new(&PhysicsConfig::default(), RecordingPresentation::new()).expect("valid physics")
}

#[test]
fn projectile_inside_radius_destroys_target_into_six_fragments() {
    let mut scene = scene();
    let factory = BodyFactory::default();
    let target_visual = factory.explosive_target(&mut scene, Vec3::new(25.0, 15.0, 0.0));
    let mut targets = [ExplosiveTarget::new(target_visual)];
    let detector = ImpactDetector::new(3.0);
    let mut effect = DestructionEffect::from_config(&GameplayConfig::default());
    let mut schedule = RemovalSchedule::new();

    let detonations = detector.check(Some(Vec3::new(25.0, 15.0, 2.5)), &mut targets, &scene.registry);
    assert_eq!(detonations.len(), 1);
    assert!(targets[0].is_destroyed());

    let fragments = effect.trigger(&mut scene, &factory, &detonations[0], &mut schedule, 0.0);
    assert_eq!(fragments.len(), 6);
    assert_eq!(schedule.len(), 6);
    assert!(!scene.presentation.contains(target_visual));
    for fragment in &fragments {
        assert!(scene.presentation.contains(*fragment));
        assert!(scene.registry.is_active(*fragment));
        let body = scene.registry.body_of(*fragment).expect("fragment body");
        let body = scene.world.body(body).expect("fragment in world");
        assert_eq!(body.mass(), FRAGMENT_MASS);
        assert_eq!(body.transform.position, Vec3::new(25.0, 15.0, 0.0));
        assert!(body.velocity.linear.y >= 0.0);
    }

    // Already destroyed: a second pass finds nothing.
    assert!(detector
        .check(Some(Vec3::new(25.0, 15.0, 2.5)), &mut targets, &scene.registry)
        .is_empty());
}

#[test]
fn projectile_far_away_triggers_nothing() {
    let mut scene = scene();
    let factory = BodyFactory::default();
    let target_visual = factory.explosive_target(&mut scene, Vec3::ZERO);
    let mut targets = [ExplosiveTarget::new(target_visual)];

    let detonations =
        ImpactDetector::new(3.0).check(Some(Vec3::new(10.0, 0.0, 0.0)), &mut targets, &scene.registry);
    assert!(detonations.is_empty());
    assert!(!targets[0].is_destroyed());
    assert!(scene.presentation.contains(target_visual));
    assert_eq!(scene.registry.len(), 1);
}

#[test]
fn resting_projectile_falls_without_drifting() {
    let mut simulation =
        Simulation::without_arena(SimulationConfig::default(), RecordingPresentation::new())
            .expect("config");
    *simulation.viewpoint_mut() = Viewpoint::looking_at(Vec3::new(0.0, 2.0, 10.0), Vec3::ZERO);

    let projectile = simulation.spawn_projectile();
    assert!(simulation.apply_projectile_impulse(Vec3::ZERO));
    let start = simulation.scene().registry.position_of(projectile).expect("projectile");

    for _ in 0..60 {
        simulation.frame();
    }
    let end = simulation.scene().registry.position_of(projectile).expect("projectile");
    assert!(end.y < start.y);
    assert_eq!(end.x, start.x);
    assert_eq!(end.z, start.z);
}

#[test]
fn trigger_radius_is_exclusive() {
    let mut scene = scene();
    let factory = BodyFactory::default();
    let target_visual = factory.explosive_target(&mut scene, Vec3::ZERO);
    let mut targets = [ExplosiveTarget::new(target_visual)];
    let detector = ImpactDetector::new(3.0);

    assert!(detector
        .check(Some(Vec3::new(3.0, 0.0, 0.0)), &mut targets, &scene.registry)
        .is_empty());
    assert_eq!(
        detector
            .check(Some(Vec3::new(2.99, 0.0, 0.0)), &mut targets, &scene.registry)
            .len(),
        1
    );
}

#[test]
fn no_target_fires_without_a_projectile() {
    let mut simulation = Simulation::new(SimulationConfig::default(), RecordingPresentation::new())
        .expect("default config");
    for _ in 0..60 {
        let report = simulation.frame();
        assert!(report.detonations.is_empty());
    }
    assert!(simulation.targets().iter().all(|target| !target.is_destroyed()));
    assert_eq!(simulation.tracked_projectile(), None);
}

#[test]
fn fired_projectile_destroys_target_and_fragments_expire() {
    let mut simulation =
        Simulation::without_arena(weightless(), RecordingPresentation::new()).expect("config");
    let target = simulation.add_explosive_target(Vec3::new(25.0, 15.0, 0.0));
    *simulation.viewpoint_mut() =
        Viewpoint::looking_at(Vec3::new(25.0, 15.0, -10.0), Vec3::new(25.0, 15.0, 0.0));

    simulation.handle_input(InputEvent::Fire);
    let projectile = simulation.tracked_projectile().expect("projectile spawned");

    let mut triggered = None;
    for _ in 0..20 {
        let report = simulation.frame();
        if !report.detonations.is_empty() {
            assert_eq!(report.detonations, vec![target]);
            assert_eq!(report.fragments_spawned, 6);
            triggered = Some((report.frame, report.simulated_time));
            break;
        }
    }
    let (trigger_frame, trigger_time) = triggered.expect("target triggered within 20 frames");
    assert!(simulation.targets()[0].is_destroyed());
    assert!(!simulation.presentation().contains(target));
    assert_eq!(simulation.pending_removals(), 6);
    assert!(simulation.presentation().contains(projectile));

    // Three seconds at 1/60 s per frame: nothing may go before frame +180.
    for _ in 1..180 {
        let report = simulation.frame();
        assert_eq!(
            report.fragments_expired, 0,
            "fragment removed early at frame {} ({:.4}s after trigger)",
            report.frame,
            report.simulated_time - trigger_time
        );
    }
    assert_eq!(simulation.scene().registry.active_count(), 7);

    let report = simulation.frame();
    assert_eq!(report.frame, trigger_frame + 180);
    assert_eq!(report.fragments_expired, 6);
    assert!(report.simulated_time - trigger_time >= 3.0);
    assert_eq!(simulation.pending_removals(), 0);
    // Only the projectile is left.
    assert_eq!(simulation.scene().world.body_count(), 1);
    assert_eq!(simulation.presentation().scene_len(), 1);
}

#[test]
fn projectile_spawns_ahead_and_flies_along_the_view() {
    let mut simulation =
        Simulation::without_arena(weightless(), RecordingPresentation::new()).expect("config");
    let start = simulation.viewpoint().position;
    let forward = simulation.viewpoint().forward();

    let projectile = simulation.fire();
    let spawn = simulation.scene().registry.position_of(projectile).expect("projectile");
    assert!(spawn.abs_diff_eq(start + forward * 2.0, 1e-5));

    simulation.frame();
    let body = simulation.scene().registry.body_of(projectile).expect("body");
    let velocity = simulation.scene().world.body(body).expect("in world").velocity.linear;
    // 300 impulse on a 5 kg ball.
    assert!(velocity.abs_diff_eq(forward * 60.0, 1e-3));
}

#[test]
fn superseded_projectiles_are_capped() {
    let mut config = weightless();
    config.gameplay.max_projectiles = 2;
    let mut simulation =
        Simulation::without_arena(config, RecordingPresentation::new()).expect("config");

    let first = simulation.fire();
    let first_body = simulation.scene().registry.body_of(first).expect("body");
    let second = simulation.fire();
    let third = simulation.fire();

    assert_eq!(simulation.live_projectiles(), 2);
    assert_eq!(simulation.tracked_projectile(), Some(third));
    assert!(!simulation.presentation().contains(first));
    assert!(!simulation.scene().world.contains(first_body));
    assert!(simulation.presentation().contains(second));
}

#[test]
fn resize_updates_projection_aspect() {
    let mut simulation =
        Simulation::without_arena(SimulationConfig::default(), NullPresentation).expect("config");
    simulation.handle_input(InputEvent::Resize {
        width: 1000,
        height: 500,
    });
    assert_eq!(simulation.projection().aspect, 2.0);
}

#[test]
fn every_frame_renders_once() {
    let mut simulation =
        Simulation::without_arena(SimulationConfig::default(), RecordingPresentation::new())
            .expect("config");
    for _ in 0..5 {
        simulation.frame();
    }
    assert_eq!(simulation.presentation().render_count(), 5);
    assert_eq!(simulation.frame_count(), 5);
}

#[test]
fn look_input_turns_the_view_only_when_locked() {
    let mut simulation =
        Simulation::without_arena(SimulationConfig::default(), NullPresentation).expect("config");
    let before = simulation.viewpoint().yaw;
    simulation.handle_input(InputEvent::Look { dx: 100.0, dy: 0.0 });
    assert_eq!(simulation.viewpoint().yaw, before);

    simulation.handle_input(InputEvent::Lock);
    simulation.handle_input(InputEvent::Look { dx: 100.0, dy: 0.0 });
    assert!((simulation.viewpoint().yaw - (before - 0.2)).abs() < 1e-5);
    assert_eq!(simulation.control_lock(), ControlLock::Locked);
}
