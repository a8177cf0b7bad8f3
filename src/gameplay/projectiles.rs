//! Bookkeeping for launched projectiles.

use std::collections::VecDeque;

use crate::scene::VisualId;

/// Tracks the newest projectile, which the impact check follows, and keeps
/// at most `capacity` projectiles alive.
#[derive(Debug, Clone)]
pub struct ProjectileTracker {
    live: VecDeque<VisualId>,
    capacity: usize,
}

impl ProjectileTracker {
    pub fn new(capacity: usize) -> Self {
        Self {
            live: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// The projectile impact detection follows.
    pub fn tracked(&self) -> Option<VisualId> {
        self.live.back().copied()
    }

    /// Makes `projectile` the tracked one. Returns the superseded
    /// projectiles that no longer fit and must be disposed.
    pub fn supersede(&mut self, projectile: VisualId) -> Vec<VisualId> {
        self.live.push_back(projectile);
        let excess = self.live.len().saturating_sub(self.capacity);
        self.live.drain(..excess).collect()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oldest_projectile_is_evicted_first() {
        let mut tracker = ProjectileTracker::new(2);
        assert!(tracker.supersede(VisualId(1)).is_empty());
        assert!(tracker.supersede(VisualId(2)).is_empty());
        assert_eq!(tracker.supersede(VisualId(3)), vec![VisualId(1)]);
        assert_eq!(tracker.tracked(), Some(VisualId(3)));
        assert_eq!(tracker.len(), 2);
    }
}
