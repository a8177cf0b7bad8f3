//! Viewport boundary: where the participant stands and looks from.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Pitch stays just short of straight up/down so `forward` never degenerates.
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// First-person viewpoint: a position plus yaw (about +Y) and pitch.
/// With zero yaw and pitch the view looks down -Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewpoint {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for Viewpoint {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
        }
    }
}

impl Viewpoint {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let mut viewpoint = Self::new(position);
        viewpoint.look_at(target);
        viewpoint
    }

    pub fn look_at(&mut self, target: Vec3) {
        let direction = (target - self.position).normalize_or_zero();
        if direction == Vec3::ZERO {
            return;
        }
        self.yaw = (-direction.x).atan2(-direction.z);
        self.pitch = direction.y.clamp(-1.0, 1.0).asin().clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn orientation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch)
    }

    /// Unit view direction.
    pub fn forward(&self) -> Vec3 {
        self.orientation() * Vec3::NEG_Z
    }

    /// Horizontal forward direction used for walking.
    pub fn walk_forward(&self) -> Vec3 {
        Quat::from_rotation_y(self.yaw) * Vec3::NEG_Z
    }

    /// Horizontal right-hand direction used for strafing.
    pub fn walk_right(&self) -> Vec3 {
        Quat::from_rotation_y(self.yaw) * Vec3::X
    }

    pub fn move_forward(&mut self, distance: f32) {
        self.position += self.walk_forward() * distance;
    }

    pub fn move_right(&mut self, distance: f32) {
        self.position += self.walk_right() * distance;
    }

    /// Applies a mouse-look delta in radians.
    pub fn rotate(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.yaw -= yaw_delta;
        self.pitch = (self.pitch - pitch_delta).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }
}

/// Perspective projection parameters, recomputed on resize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y_degrees: 60.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Projection {
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    pub fn matrix(&self) -> glam::Mat4 {
        glam::Mat4::perspective_rh(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far)
    }
}
