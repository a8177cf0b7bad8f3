//! Math helpers layered on top of `glam`.

use glam::{Mat3, Quat, Vec3};

/// Converts an angular velocity (radians/sec) into the rotation it sweeps in `dt`.
pub fn angular_velocity_to_quat(angular: Vec3, dt: f32) -> Quat {
    let angle = angular.length() * dt;
    if angle.abs() < 1e-6 {
        return Quat::IDENTITY;
    }
    Quat::from_axis_angle(angular.normalize(), angle)
}

/// Rotates a body-space inverse inertia tensor into world space.
pub fn world_inverse_inertia(local_inverse: Mat3, rotation: Quat) -> Mat3 {
    let basis = Mat3::from_quat(rotation);
    basis * local_inverse * basis.transpose()
}

pub fn inertia_solid_box(half_extents: Vec3, mass: f32) -> Mat3 {
    let size = half_extents * 2.0;
    let factor = mass / 12.0;
    Mat3::from_diagonal(Vec3::new(
        factor * (size.y * size.y + size.z * size.z),
        factor * (size.x * size.x + size.z * size.z),
        factor * (size.x * size.x + size.y * size.y),
    ))
}

pub fn inertia_solid_sphere(radius: f32, mass: f32) -> Mat3 {
    Mat3::from_diagonal(Vec3::splat(0.4 * mass * radius * radius))
}

/// Solid cylinder aligned with the local Y axis.
pub fn inertia_solid_cylinder(radius: f32, half_height: f32, mass: f32) -> Mat3 {
    let height = half_height * 2.0;
    let lateral = mass * (3.0 * radius * radius + height * height) / 12.0;
    Mat3::from_diagonal(Vec3::new(lateral, 0.5 * mass * radius * radius, lateral))
}

/// Inverts a diagonal inertia tensor, mapping zero entries to zero (locked axis).
pub fn invert_diagonal(inertia: Mat3) -> Mat3 {
    let diagonal = Vec3::new(inertia.x_axis.x, inertia.y_axis.y, inertia.z_axis.z);
    let inverse = Vec3::new(
        safe_recip(diagonal.x),
        safe_recip(diagonal.y),
        safe_recip(diagonal.z),
    );
    Mat3::from_diagonal(inverse)
}

fn safe_recip(value: f32) -> f32 {
    if value.abs() < f32::EPSILON {
        0.0
    } else {
        1.0 / value
    }
}
