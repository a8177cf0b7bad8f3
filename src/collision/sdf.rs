//! Signed distance functions for the primitive shapes.
//!
//! Every function takes a point in the shape's local frame and returns the
//! signed distance (negative inside) together with the outward direction of
//! the nearest surface feature.

use glam::Vec3;

#[inline]
pub fn sd_sphere(p: Vec3, radius: f32) -> (f32, Vec3) {
    let length = p.length();
    let normal = if length > 1e-6 { p / length } else { Vec3::Y };
    (length - radius, normal)
}

pub fn sd_box(p: Vec3, half_extents: Vec3) -> (f32, Vec3) {
    let q = p.abs() - half_extents;
    let outside = q.max(Vec3::ZERO);
    let outside_length = outside.length();
    if outside_length > 0.0 {
        return (outside_length, outside * p.signum() / outside_length);
    }

    // Inside: the nearest face is the one with the largest (least negative) q.
    let (axis, depth) = if q.x >= q.y && q.x >= q.z {
        (Vec3::X * sign(p.x), q.x)
    } else if q.y >= q.z {
        (Vec3::Y * sign(p.y), q.y)
    } else {
        (Vec3::Z * sign(p.z), q.z)
    };
    (depth, axis)
}

pub fn sd_cylinder(p: Vec3, radius: f32, half_height: f32) -> (f32, Vec3) {
    let radial_length = (p.x * p.x + p.z * p.z).sqrt();
    let radial_dir = if radial_length > 1e-6 {
        Vec3::new(p.x / radial_length, 0.0, p.z / radial_length)
    } else {
        Vec3::X
    };
    let axial_dir = Vec3::Y * sign(p.y);

    let dx = radial_length - radius;
    let dy = p.y.abs() - half_height;

    if dx > 0.0 || dy > 0.0 {
        let ox = dx.max(0.0);
        let oy = dy.max(0.0);
        let length = (ox * ox + oy * oy).sqrt();
        return (length, (radial_dir * ox + axial_dir * oy) / length);
    }

    if dx > dy {
        (dx, radial_dir)
    } else {
        (dy, axial_dir)
    }
}

#[inline]
fn sign(value: f32) -> f32 {
    if value < 0.0 {
        -1.0
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn box_distance_outside_face() {
        let (d, n) = sd_box(Vec3::new(0.0, 2.0, 0.0), Vec3::ONE);
        assert_relative_eq!(d, 1.0);
        assert!(n.abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn box_distance_inside_picks_nearest_face() {
        let (d, n) = sd_box(Vec3::new(0.0, 0.0, -0.9), Vec3::ONE);
        assert_relative_eq!(d, -0.1, epsilon = 1e-6);
        assert!(n.abs_diff_eq(-Vec3::Z, 1e-6));
    }

    #[test]
    fn box_distance_outside_corner() {
        let (d, n) = sd_box(Vec3::new(2.0, 2.0, 0.0), Vec3::ONE);
        assert_relative_eq!(d, 2.0_f32.sqrt(), epsilon = 1e-6);
        assert_relative_eq!(n.x, n.y, epsilon = 1e-6);
    }

    #[test]
    fn cylinder_side_and_cap() {
        let (side, side_normal) = sd_cylinder(Vec3::new(0.5, 0.0, 0.0), 0.25, 0.5);
        assert_relative_eq!(side, 0.25);
        assert!(side_normal.abs_diff_eq(Vec3::X, 1e-6));

        let (cap, cap_normal) = sd_cylinder(Vec3::new(0.0, -0.45, 0.0), 0.25, 0.5);
        assert_relative_eq!(cap, -0.05, epsilon = 1e-6);
        assert!(cap_normal.abs_diff_eq(-Vec3::Y, 1e-6));
    }

    #[test]
    fn sphere_distance() {
        let (d, n) = sd_sphere(Vec3::new(0.0, 0.0, 3.0), 1.0);
        assert_relative_eq!(d, 2.0);
        assert!(n.abs_diff_eq(Vec3::Z, 1e-6));
    }
}
