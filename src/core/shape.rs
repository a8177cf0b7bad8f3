use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::types::Transform;
use crate::collision::sdf;
use crate::utils::math::{inertia_solid_box, inertia_solid_cylinder, inertia_solid_sphere};

/// Number of points sampled around each cylinder cap rim for contact generation.
pub const CYLINDER_RIM_SAMPLES: usize = 12;

/// Collision geometry of a rigid body, described in the body's local frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Sphere { radius: f32 },
    Cuboid { half_extents: Vec3 },
    /// Cylinder whose axis is the local Y axis.
    Cylinder { radius: f32, half_height: f32 },
}

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }
}

impl Shape {
    pub fn sphere(radius: f32) -> Self {
        Shape::Sphere { radius }
    }

    pub fn cuboid(half_extents: Vec3) -> Self {
        Shape::Cuboid { half_extents }
    }

    pub fn cylinder(radius: f32, half_height: f32) -> Self {
        Shape::Cylinder {
            radius,
            half_height,
        }
    }

    /// Body-space inertia tensor of a solid shape with the given mass.
    pub fn local_inertia(&self, mass: f32) -> Mat3 {
        match self {
            Shape::Sphere { radius } => inertia_solid_sphere(*radius, mass),
            Shape::Cuboid { half_extents } => inertia_solid_box(*half_extents, mass),
            Shape::Cylinder {
                radius,
                half_height,
            } => inertia_solid_cylinder(*radius, *half_height, mass),
        }
    }

    /// Tight world AABB of the shape under `transform`.
    pub fn aabb(&self, transform: &Transform) -> Aabb {
        let half = match self {
            Shape::Sphere { radius } => Vec3::splat(*radius),
            Shape::Cuboid { half_extents } => rotated_box_extents(*half_extents, transform.rotation),
            Shape::Cylinder {
                radius,
                half_height,
            } => {
                let axis = transform.rotation * Vec3::Y;
                let radial = |component: f32| radius * (1.0 - component * component).max(0.0).sqrt();
                Vec3::new(
                    axis.x.abs() * half_height + radial(axis.x),
                    axis.y.abs() * half_height + radial(axis.y),
                    axis.z.abs() * half_height + radial(axis.z),
                )
            }
        };
        Aabb::from_center_half_extents(transform.position, half)
    }

    /// Signed distance from a local-space point to the surface, with the
    /// outward surface direction at the closest feature.
    pub fn signed_distance(&self, local_point: Vec3) -> (f32, Vec3) {
        match self {
            Shape::Sphere { radius } => sdf::sd_sphere(local_point, *radius),
            Shape::Cuboid { half_extents } => sdf::sd_box(local_point, *half_extents),
            Shape::Cylinder {
                radius,
                half_height,
            } => sdf::sd_cylinder(local_point, *radius, *half_height),
        }
    }

    /// Local-space vertices probed against other shapes during contact generation.
    /// Spheres have none; they are handled through their centre.
    pub fn feature_points(&self) -> Vec<Vec3> {
        match self {
            Shape::Sphere { .. } => Vec::new(),
            Shape::Cuboid { half_extents } => {
                let mut corners = Vec::with_capacity(8);
                for &sx in &[-1.0, 1.0] {
                    for &sy in &[-1.0, 1.0] {
                        for &sz in &[-1.0, 1.0] {
                            corners.push(*half_extents * Vec3::new(sx, sy, sz));
                        }
                    }
                }
                corners
            }
            Shape::Cylinder {
                radius,
                half_height,
            } => {
                let mut rim = Vec::with_capacity(CYLINDER_RIM_SAMPLES * 2);
                for i in 0..CYLINDER_RIM_SAMPLES {
                    let angle = std::f32::consts::TAU * i as f32 / CYLINDER_RIM_SAMPLES as f32;
                    let (sin, cos) = angle.sin_cos();
                    rim.push(Vec3::new(cos * radius, *half_height, sin * radius));
                    rim.push(Vec3::new(cos * radius, -*half_height, sin * radius));
                }
                rim
            }
        }
    }
}

fn rotated_box_extents(half_extents: Vec3, rotation: Quat) -> Vec3 {
    let basis = Mat3::from_quat(rotation);
    let columns = [basis.x_axis, basis.y_axis, basis.z_axis];
    columns
        .iter()
        .zip([half_extents.x, half_extents.y, half_extents.z])
        .fold(Vec3::ZERO, |acc, (column, extent)| acc + column.abs() * extent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn upright_cylinder_aabb_matches_dimensions() {
        let shape = Shape::cylinder(0.25, 0.5);
        let aabb = shape.aabb(&Transform::from_position(Vec3::new(1.0, 2.0, 3.0)));
        assert!(aabb.min.abs_diff_eq(Vec3::new(0.75, 1.5, 2.75), 1e-5));
        assert!(aabb.max.abs_diff_eq(Vec3::new(1.25, 2.5, 3.25), 1e-5));
    }

    #[test]
    fn rotated_box_aabb_grows() {
        let shape = Shape::cuboid(Vec3::ONE);
        let transform = Transform::from_position_rotation(
            Vec3::ZERO,
            Quat::from_rotation_z(std::f32::consts::FRAC_PI_4),
        );
        let aabb = shape.aabb(&transform);
        assert_relative_eq!(aabb.max.x, 2.0_f32.sqrt(), epsilon = 1e-5);
        assert_relative_eq!(aabb.max.z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn feature_point_counts() {
        assert_eq!(Shape::cuboid(Vec3::splat(0.15)).feature_points().len(), 8);
        assert_eq!(
            Shape::cylinder(0.25, 0.5).feature_points().len(),
            CYLINDER_RIM_SAMPLES * 2
        );
        assert!(Shape::sphere(0.6).feature_points().is_empty());
    }
}
