//! Archetypes: lane, rails, pins, explosive targets, projectiles, fragments.

use glam::{Quat, Vec3};

use super::{
    presentation::{Appearance, Geometry, MaterialRef, Presentation, VisualId},
    registry::PairDesc,
    Scene,
};
use crate::{
    config::ArenaConfig,
    core::{shape::Shape, types::Transform},
};

pub const PIN_MASS: f32 = 1.0;
pub const PIN_RADIUS: f32 = 0.25;
pub const PIN_HALF_HEIGHT: f32 = 0.5;
pub const PROJECTILE_MASS: f32 = 5.0;
pub const PROJECTILE_RADIUS: f32 = 0.6;
pub const FRAGMENT_MASS: f32 = 1.0;
pub const FRAGMENT_HALF_EXTENT: f32 = 0.15;
pub const TARGET_HALF_EXTENT: f32 = 0.5;

const LANE_COLOR: MaterialRef = MaterialRef::color(0x705030);
const RAIL_COLOR: MaterialRef = MaterialRef::color(0x333333);
const PIN_COLOR: MaterialRef = MaterialRef::color(0xffffff);
const TARGET_COLOR: MaterialRef = MaterialRef::color(0xff0000);
const PROJECTILE_COLOR: MaterialRef = MaterialRef::color(0x0044ff);
const FRAGMENT_COLOR: MaterialRef = MaterialRef::color(0xff6666);

/// Builds every kind of entity the arena contains from an [`ArenaConfig`].
#[derive(Debug, Clone, Default)]
pub struct BodyFactory {
    arena: ArenaConfig,
}

impl BodyFactory {
    pub fn new(arena: ArenaConfig) -> Self {
        Self { arena }
    }

    pub fn arena(&self) -> &ArenaConfig {
        &self.arena
    }

    /// Static lane slab whose top face sits at y = 0.
    pub fn lane<P: Presentation>(&self, scene: &mut Scene<P>) -> VisualId {
        let arena = &self.arena;
        let size = Vec3::new(arena.lane_length, arena.lane_height, arena.lane_width);
        scene.create_pair(PairDesc::new(
            Appearance::new(Geometry::Box { size }, LANE_COLOR),
            Shape::cuboid(size * 0.5),
            0.0,
            Transform::from_position(Vec3::new(0.0, -arena.lane_height * 0.5, 0.0)),
        ))
    }

    /// Static guard rails on both long edges, each leaning slightly outward.
    pub fn rails<P: Presentation>(&self, scene: &mut Scene<P>) -> [VisualId; 2] {
        let arena = &self.arena;
        let size = Vec3::new(arena.lane_length, arena.rail_height, arena.rail_thickness);
        let y = arena.rail_height * 0.5 - arena.lane_height * 0.5;
        let z = arena.lane_width * 0.5 + arena.rail_thickness * 0.5;

        [-1.0_f32, 1.0].map(|side| {
            // Rotating about +X by a positive angle leans the +z rail toward +z.
            let rotation = Quat::from_rotation_x(side * arena.rail_tilt);
            scene.create_pair(PairDesc::new(
                Appearance::new(Geometry::Box { size }, RAIL_COLOR),
                Shape::cuboid(size * 0.5),
                0.0,
                Transform::from_position_rotation(Vec3::new(0.0, y, side * z), rotation),
            ))
        })
    }

    /// Centres of the ten pins: head pin nearest the bowler, rows of
    /// 1-2-3-4 receding toward the far end.
    pub fn pin_layout(&self) -> [Vec3; 10] {
        let spacing = self.arena.pin_spacing;
        let head = self.arena.lane_length * 0.5 - self.arena.pin_rack_offset;
        let row = |n: f32, z: f32| Vec3::new(head - spacing * n, PIN_HALF_HEIGHT, z * spacing);
        [
            row(0.0, 0.0),
            row(1.0, 0.5),
            row(1.0, -0.5),
            row(2.0, 1.0),
            row(2.0, 0.0),
            row(2.0, -1.0),
            row(3.0, 1.5),
            row(3.0, 0.5),
            row(3.0, -0.5),
            row(3.0, -1.5),
        ]
    }

    pub fn pin<P: Presentation>(&self, scene: &mut Scene<P>, position: Vec3) -> VisualId {
        scene.create_pair(PairDesc::new(
            Appearance::new(
                Geometry::Cylinder {
                    radius_top: PIN_RADIUS,
                    radius_bottom: 0.15,
                    height: PIN_HALF_HEIGHT * 2.0,
                    segments: 16,
                },
                PIN_COLOR,
            ),
            Shape::cylinder(PIN_RADIUS, PIN_HALF_HEIGHT),
            PIN_MASS,
            Transform::from_position(position),
        ))
    }

    pub fn pin_rack<P: Presentation>(&self, scene: &mut Scene<P>) -> Vec<VisualId> {
        self.pin_layout()
            .into_iter()
            .map(|position| self.pin(scene, position))
            .collect()
    }

    /// Static explosive target. The visual is a thin panel; the body is a
    /// unit cube.
    pub fn explosive_target<P: Presentation>(&self, scene: &mut Scene<P>, position: Vec3) -> VisualId {
        scene.create_pair(PairDesc::new(
            Appearance::new(
                Geometry::Box {
                    size: Vec3::new(0.5, 4.0, 4.0),
                },
                TARGET_COLOR,
            ),
            Shape::cuboid(Vec3::splat(TARGET_HALF_EXTENT)),
            0.0,
            Transform::from_position(position),
        ))
    }

    /// Projectile resting at `position`; the caller launches it.
    pub fn projectile<P: Presentation>(&self, scene: &mut Scene<P>, position: Vec3) -> VisualId {
        scene.create_pair(PairDesc::new(
            Appearance::new(
                Geometry::Sphere {
                    radius: PROJECTILE_RADIUS,
                    segments: 32,
                },
                PROJECTILE_COLOR,
            ),
            Shape::sphere(PROJECTILE_RADIUS),
            PROJECTILE_MASS,
            Transform::from_position(position),
        ))
    }

    /// Fragment at `position`, launched with `impulse` as soon as it exists.
    pub fn fragment<P: Presentation>(
        &self,
        scene: &mut Scene<P>,
        position: Vec3,
        impulse: Vec3,
    ) -> VisualId {
        let id = scene.create_pair(PairDesc::new(
            Appearance::new(
                Geometry::Box {
                    size: Vec3::splat(FRAGMENT_HALF_EXTENT * 2.0),
                },
                FRAGMENT_COLOR,
            ),
            Shape::cuboid(Vec3::splat(FRAGMENT_HALF_EXTENT)),
            FRAGMENT_MASS,
            Transform::from_position(position),
        ));
        if let Some(body) = scene.registry.body_of(id) {
            scene.world.apply_central_impulse(body, impulse);
        }
        id
    }
}
