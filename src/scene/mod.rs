pub mod factory;
pub mod presentation;
pub mod registry;
pub mod viewpoint;

pub use factory::BodyFactory;
pub use presentation::{
    Appearance, Geometry, MaterialRef, NullPresentation, Presentation, RecordingPresentation,
    VisualBody, VisualId,
};
pub use registry::{BodyHandle, BodyRegistry, PairDesc, SyncStats};
pub use viewpoint::{Projection, Viewpoint};

use crate::{config::PhysicsConfig, error::WorldError, utils::allocator::BodyId, world::DynamicsWorld};

/// The dynamics world, the registry that joins it to visuals, and the
/// presentation those visuals live in.
pub struct Scene<P: Presentation> {
    pub world: DynamicsWorld,
    pub registry: BodyRegistry,
    pub presentation: P,
}

impl<P: Presentation> Scene<P> {
    pub fn new(physics: &PhysicsConfig, presentation: P) -> Result<Self, WorldError> {
        Ok(Self {
            world: DynamicsWorld::initialize(physics)?,
            registry: BodyRegistry::new(),
            presentation,
        })
    }

    pub fn create_pair(&mut self, desc: PairDesc) -> VisualId {
        self.registry
            .create_pair(&mut self.world, &mut self.presentation, desc)
    }

    pub fn sync_all(&mut self) -> SyncStats {
        self.registry.sync_all(&self.world, &mut self.presentation)
    }

    pub fn retire(&mut self, id: VisualId) -> Option<BodyId> {
        self.registry.retire(id, &mut self.presentation)
    }

    pub fn dispose(&mut self, id: VisualId) -> bool {
        self.registry
            .dispose(id, &mut self.world, &mut self.presentation)
    }
}
