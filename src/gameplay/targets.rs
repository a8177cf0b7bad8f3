//! Explosive targets and the proximity test that sets them off.

use glam::Vec3;

use crate::scene::{registry::BodyRegistry, VisualId};

/// A target that explodes once when a projectile comes close enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplosiveTarget {
    pub visual: VisualId,
    destroyed: bool,
}

impl ExplosiveTarget {
    pub fn new(visual: VisualId) -> Self {
        Self {
            visual,
            destroyed: false,
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Flips the flag; true only on the first call.
    pub fn mark_destroyed(&mut self) -> bool {
        !std::mem::replace(&mut self.destroyed, true)
    }
}

/// A target that has just been triggered and where it stood.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detonation {
    pub target: VisualId,
    pub position: Vec3,
}

/// Distance test between the tracked projectile and each live target.
#[derive(Debug, Clone, Copy)]
pub struct ImpactDetector {
    trigger_radius: f32,
}

impl ImpactDetector {
    pub fn new(trigger_radius: f32) -> Self {
        Self { trigger_radius }
    }

    pub fn trigger_radius(&self) -> f32 {
        self.trigger_radius
    }

    /// Marks every live target strictly within the trigger radius of
    /// `projectile` as destroyed and reports it. Without a projectile
    /// nothing happens.
    pub fn check(
        &self,
        projectile: Option<Vec3>,
        targets: &mut [ExplosiveTarget],
        registry: &BodyRegistry,
    ) -> Vec<Detonation> {
        let Some(projectile) = projectile else {
            return Vec::new();
        };
        let mut detonations = Vec::new();
        for target in targets.iter_mut().filter(|target| !target.destroyed) {
            let Some(position) = registry.position_of(target.visual) else {
                continue;
            };
            if projectile.distance(position) < self.trigger_radius && target.mark_destroyed() {
                log::info!("target {:?} triggered at {position}", target.visual);
                detonations.push(Detonation {
                    target: target.visual,
                    position,
                });
            }
        }
        detonations
    }
}
