//! Join table between visual bodies and their rigid bodies.

use std::collections::BTreeMap;

use glam::Vec3;

use super::presentation::{Appearance, Presentation, VisualBody, VisualId};
use crate::{
    core::{rigidbody::RigidBody, shape::Shape, types::Material, types::Transform},
    utils::allocator::BodyId,
    world::DynamicsWorld,
};

/// Everything needed to create one visual/rigid-body pair.
#[derive(Debug, Clone, Copy)]
pub struct PairDesc {
    pub appearance: Appearance,
    pub shape: Shape,
    /// Zero or less makes the body static.
    pub mass: f32,
    pub transform: Transform,
    pub material: Material,
}

impl PairDesc {
    pub fn new(appearance: Appearance, shape: Shape, mass: f32, transform: Transform) -> Self {
        Self {
            appearance,
            shape,
            mass,
            transform,
            material: Material::default(),
        }
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }
}

/// A visual body joined to the rigid body that drives it.
#[derive(Debug, Clone)]
pub struct BodyHandle {
    visual: VisualBody,
    body: BodyId,
    dynamic: bool,
    in_scene: bool,
}

impl BodyHandle {
    pub fn visual(&self) -> &VisualBody {
        &self.visual
    }

    pub fn body(&self) -> BodyId {
        self.body
    }

    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    pub fn in_scene(&self) -> bool {
        self.in_scene
    }
}

/// Outcome of one [`BodyRegistry::sync_all`] pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncStats {
    pub synced: usize,
    pub skipped: usize,
}

/// Owns every [`BodyHandle`] and the list of dynamic visuals that are copied
/// from physics each frame. Static pairs are never synced.
#[derive(Debug, Default)]
pub struct BodyRegistry {
    next_visual: u64,
    handles: BTreeMap<VisualId, BodyHandle>,
    active: Vec<VisualId>,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the rigid body to the world and the visual to the presentation.
    /// Only pairs with positive mass join the sync set.
    pub fn create_pair(
        &mut self,
        world: &mut DynamicsWorld,
        presentation: &mut dyn Presentation,
        desc: PairDesc,
    ) -> VisualId {
        let id = VisualId(self.next_visual);
        self.next_visual += 1;

        let body = RigidBody::new(desc.shape, desc.mass, desc.transform).with_material(desc.material);
        let dynamic = !body.is_static();
        let body = world.add_body(body);

        let visual = VisualBody {
            id,
            appearance: desc.appearance,
            transform: desc.transform,
        };
        presentation.add(&visual);
        if dynamic {
            self.active.push(id);
        }
        self.handles.insert(
            id,
            BodyHandle {
                visual,
                body,
                dynamic,
                in_scene: true,
            },
        );
        log::debug!("created pair {id:?} -> {body:?} (dynamic: {dynamic})");
        id
    }

    /// Copies each synced rigid body's pose onto its visual. Handles whose
    /// body has left the world are skipped.
    pub fn sync_all(&mut self, world: &DynamicsWorld, presentation: &mut dyn Presentation) -> SyncStats {
        let mut stats = SyncStats::default();
        for id in &self.active {
            let Some(handle) = self.handles.get_mut(id) else {
                stats.skipped += 1;
                continue;
            };
            match world.transform(handle.body) {
                Some(transform) => {
                    handle.visual.transform = transform;
                    presentation.update(*id, &transform);
                    stats.synced += 1;
                }
                None => {
                    log::trace!("sync skipped {id:?}: body {:?} is gone", handle.body);
                    stats.skipped += 1;
                }
            }
        }
        stats
    }

    /// Takes the visual out of the scene and the sync set. The rigid body
    /// stays in the world; returns it so the caller can decide its fate.
    pub fn retire(&mut self, id: VisualId, presentation: &mut dyn Presentation) -> Option<BodyId> {
        let handle = self.handles.get_mut(&id)?;
        if handle.in_scene {
            presentation.remove(id);
            handle.in_scene = false;
        }
        self.active.retain(|active| *active != id);
        Some(handle.body)
    }

    /// Removes the pair entirely: visual, sync entry, handle, and rigid body.
    /// Returns false when the handle is unknown.
    pub fn dispose(
        &mut self,
        id: VisualId,
        world: &mut DynamicsWorld,
        presentation: &mut dyn Presentation,
    ) -> bool {
        let Some(handle) = self.handles.remove(&id) else {
            return false;
        };
        if handle.in_scene {
            presentation.remove(id);
        }
        self.active.retain(|active| *active != id);
        if world.remove_body(handle.body).is_none() {
            log::debug!("dispose {id:?}: body {:?} already left the world", handle.body);
        }
        true
    }

    pub fn handle(&self, id: VisualId) -> Option<&BodyHandle> {
        self.handles.get(&id)
    }

    pub fn visual(&self, id: VisualId) -> Option<&VisualBody> {
        self.handles.get(&id).map(BodyHandle::visual)
    }

    pub fn body_of(&self, id: VisualId) -> Option<BodyId> {
        self.handles.get(&id).map(BodyHandle::body)
    }

    /// Last synced position of the visual.
    pub fn position_of(&self, id: VisualId) -> Option<Vec3> {
        self.visual(id).map(|visual| visual.transform.position)
    }

    pub fn is_active(&self, id: VisualId) -> bool {
        self.active.contains(&id)
    }

    pub fn active_ids(&self) -> &[VisualId] {
        &self.active
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
