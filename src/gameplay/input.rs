//! Discrete input events and the physical key bindings that produce them.

use serde::{Deserialize, Serialize};

/// Directions of travel a held key can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    Forward,
    Back,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    Pressed(Intent),
    Released(Intent),
    /// Spawn and launch a projectile along the view direction.
    Fire,
    /// Engage pointer-lock style control.
    Lock,
    Unlock,
    /// Relative pointer motion in pixels.
    Look { dx: f32, dy: f32 },
    Resize { width: u32, height: u32 },
}

impl InputEvent {
    /// Maps a physical key code (`KeyW`, `Space`, ...) to an event. Fire
    /// only triggers on press; unknown keys map to nothing.
    pub fn from_key_code(code: &str, pressed: bool) -> Option<Self> {
        let intent = match code {
            "KeyW" => Intent::Forward,
            "KeyS" => Intent::Back,
            "KeyA" => Intent::Left,
            "KeyD" => Intent::Right,
            "Space" => return pressed.then_some(Self::Fire),
            _ => return None,
        };
        Some(if pressed {
            Self::Pressed(intent)
        } else {
            Self::Released(intent)
        })
    }
}
