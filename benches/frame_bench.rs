use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use pinfall::*;
use std::hint::black_box;

const DT: f32 = 1.0 / 60.0;

fn prepare_world(ball_count: usize) -> DynamicsWorld {
    let mut world = DynamicsWorld::initialize(&PhysicsConfig::default()).expect("default physics");
    world.add_body(RigidBody::new(
        Shape::cuboid(Vec3::new(30.0, 0.5, 3.0)),
        0.0,
        Transform::from_position(Vec3::new(0.0, -0.5, 0.0)),
    ));
    for i in 0..ball_count {
        let x = (i % 40) as f32 * 1.3 - 26.0;
        let y = 1.0 + (i / 40) as f32 * 1.3;
        world.add_body(RigidBody::new(
            Shape::sphere(0.6),
            5.0,
            Transform::from_position(Vec3::new(x, y, 0.0)),
        ));
    }
    world
}

fn bench_world_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_advance");
    for &count in &[16usize, 128, 512] {
        group.bench_with_input(
            BenchmarkId::new("sequential", count),
            &count,
            |b, &count| {
                b.iter(|| {
                    let mut world = prepare_world(count);
                    world.set_parallel_enabled(false);
                    world.advance(black_box(DT), 10);
                })
            },
        );
        group.bench_with_input(BenchmarkId::new("parallel", count), &count, |b, &count| {
            b.iter(|| {
                let mut world = prepare_world(count);
                world.set_parallel_enabled(true);
                world.advance(black_box(DT), 10);
            })
        });
    }
    group.finish();
}

fn bench_arena_frame(c: &mut Criterion) {
    c.bench_function("arena_frame", |b| {
        let mut simulation =
            Simulation::new(SimulationConfig::default(), NullPresentation).expect("default config");
        simulation.handle_input(InputEvent::Fire);
        b.iter(|| black_box(simulation.frame()));
    });
}

criterion_group!(benches, bench_world_advance, bench_arena_frame);
criterion_main!(benches);
