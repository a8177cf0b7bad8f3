//! Presentation boundary: visual bodies and the scene they are drawn in.

use std::collections::BTreeMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::viewpoint::{Projection, Viewpoint};
use crate::core::types::Transform;

/// Identity of a visual body; the key of the registry's join table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VisualId(pub u64);

/// Renderable geometry, described independently of the collision shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Box {
        size: Vec3,
    },
    Sphere {
        radius: f32,
        segments: u32,
    },
    /// Tapered cylinder along Y.
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        segments: u32,
    },
}

/// Opaque reference to a material owned by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialRef {
    pub color: u32,
}

impl MaterialRef {
    pub const fn color(color: u32) -> Self {
        Self { color }
    }
}

/// Geometry plus material: everything about a visual except where it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Appearance {
    pub geometry: Geometry,
    pub material: MaterialRef,
}

impl Appearance {
    pub fn new(geometry: Geometry, material: MaterialRef) -> Self {
        Self { geometry, material }
    }
}

/// Presentation-side entity, owned by the body registry.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualBody {
    pub id: VisualId,
    pub appearance: Appearance,
    pub transform: Transform,
}

/// Collaborator that draws the scene. The simulation only ever adds,
/// removes, moves, and asks for a redraw; nothing flows back.
pub trait Presentation {
    fn add(&mut self, visual: &VisualBody);
    fn remove(&mut self, id: VisualId);
    fn update(&mut self, id: VisualId, transform: &Transform);
    fn render(&mut self, viewpoint: &Viewpoint, projection: &Projection);
}

/// Presentation that draws nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresentation;

impl Presentation for NullPresentation {
    fn add(&mut self, _visual: &VisualBody) {}
    fn remove(&mut self, _id: VisualId) {}
    fn update(&mut self, _id: VisualId, _transform: &Transform) {}
    fn render(&mut self, _viewpoint: &Viewpoint, _projection: &Projection) {}
}

/// Headless presentation that remembers what is in the scene.
#[derive(Debug, Default, Clone)]
pub struct RecordingPresentation {
    scene: BTreeMap<VisualId, Transform>,
    added: Vec<VisualId>,
    removed: Vec<VisualId>,
    updates: usize,
    renders: usize,
    last_viewpoint: Option<Viewpoint>,
}

impl RecordingPresentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: VisualId) -> bool {
        self.scene.contains_key(&id)
    }

    pub fn transform_of(&self, id: VisualId) -> Option<&Transform> {
        self.scene.get(&id)
    }

    pub fn scene_len(&self) -> usize {
        self.scene.len()
    }

    /// Every visual ever added, in order.
    pub fn added(&self) -> &[VisualId] {
        &self.added
    }

    /// Every visual ever removed, in order.
    pub fn removed(&self) -> &[VisualId] {
        &self.removed
    }

    pub fn update_count(&self) -> usize {
        self.updates
    }

    pub fn render_count(&self) -> usize {
        self.renders
    }

    pub fn last_viewpoint(&self) -> Option<&Viewpoint> {
        self.last_viewpoint.as_ref()
    }
}

impl Presentation for RecordingPresentation {
    fn add(&mut self, visual: &VisualBody) {
        self.scene.insert(visual.id, visual.transform);
        self.added.push(visual.id);
    }

    fn remove(&mut self, id: VisualId) {
        if self.scene.remove(&id).is_some() {
            self.removed.push(id);
        }
    }

    fn update(&mut self, id: VisualId, transform: &Transform) {
        if let Some(slot) = self.scene.get_mut(&id) {
            *slot = *transform;
            self.updates += 1;
        }
    }

    fn render(&mut self, viewpoint: &Viewpoint, _projection: &Projection) {
        self.renders += 1;
        self.last_viewpoint = Some(*viewpoint);
    }
}
