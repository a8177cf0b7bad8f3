use glam::Vec3;

use super::contact::{ContactManifold, ContactPoint};
use crate::{
    core::{rigidbody::RigidBody, shape::Shape},
    utils::allocator::BodyId,
};

/// Narrow phase dispatcher turning a candidate pair into a contact manifold.
///
/// Sphere pairs are solved analytically. A sphere against any other shape
/// probes that shape's signed distance field at the sphere centre. Boxes and
/// cylinders probe each other's fields with their feature vertices (corners
/// and rim samples), in both directions.
pub struct NarrowPhase;

impl NarrowPhase {
    pub fn collide(
        id_a: BodyId,
        body_a: &RigidBody,
        id_b: BodyId,
        body_b: &RigidBody,
    ) -> Option<ContactManifold> {
        let mut manifold =
            ContactManifold::new(id_a, id_b, body_a.material.combine(&body_b.material));

        match (&body_a.shape, &body_b.shape) {
            (Shape::Sphere { radius: ra }, Shape::Sphere { radius: rb }) => {
                manifold.points.extend(Self::sphere_sphere(
                    body_a.transform.position,
                    *ra,
                    body_b.transform.position,
                    *rb,
                ));
            }
            (Shape::Sphere { radius }, _) => {
                // Field normal points out of B, i.e. toward A; flip to A→B.
                if let Some(mut contact) =
                    Self::sphere_field(body_a.transform.position, *radius, body_b)
                {
                    contact.normal = -contact.normal;
                    manifold.points.push(contact);
                }
            }
            (_, Shape::Sphere { radius }) => {
                manifold
                    .points
                    .extend(Self::sphere_field(body_b.transform.position, *radius, body_a));
            }
            _ => {
                // Vertices of B inside A: A's outward normal already points A→B.
                Self::probe_vertices(body_b, body_a, false, &mut manifold.points);
                // Vertices of A inside B: B's outward normal points B→A.
                Self::probe_vertices(body_a, body_b, true, &mut manifold.points);
            }
        }

        if manifold.is_empty() {
            None
        } else {
            Some(manifold)
        }
    }

    fn sphere_sphere(center_a: Vec3, ra: f32, center_b: Vec3, rb: f32) -> Option<ContactPoint> {
        let offset = center_b - center_a;
        let distance = offset.length();
        let depth = ra + rb - distance;
        if depth <= 0.0 {
            return None;
        }
        let normal = if distance > 1e-6 {
            offset / distance
        } else {
            Vec3::Y
        };
        let point = center_a + normal * (ra - depth * 0.5);
        Some(ContactPoint::new(point, normal, depth))
    }

    /// Contact between a sphere and `field`; the normal points out of `field`.
    fn sphere_field(center: Vec3, radius: f32, field: &RigidBody) -> Option<ContactPoint> {
        let local = field.transform.to_local(center);
        let (distance, local_normal) = field.shape.signed_distance(local);
        if distance >= radius {
            return None;
        }
        let normal = field.transform.rotation * local_normal;
        let depth = radius - distance;
        // Midway between the sphere surface and the field surface.
        let point = center - normal * (0.5 * (radius + distance));
        Some(ContactPoint::new(point, normal, depth))
    }

    fn probe_vertices(
        feature_body: &RigidBody,
        field_body: &RigidBody,
        flip: bool,
        out: &mut Vec<ContactPoint>,
    ) {
        for vertex in feature_body.shape.feature_points() {
            let world = feature_body.transform.to_world(vertex);
            let (distance, local_normal) = field_body
                .shape
                .signed_distance(field_body.transform.to_local(world));
            if distance >= 0.0 {
                continue;
            }
            let outward = field_body.transform.rotation * local_normal;
            let point = world - outward * (0.5 * distance);
            let normal = if flip { -outward } else { outward };
            out.push(ContactPoint::new(point, normal, -distance));
        }
    }
}
