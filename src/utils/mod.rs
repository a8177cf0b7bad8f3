//! Utility helpers: generational storage, math extensions, and logging.

pub mod allocator;
pub mod logging;
pub mod math;

pub use allocator::{Arena, BodyId};
pub use math::*;
