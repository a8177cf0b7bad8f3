//! Target destruction: fragment burst and timed cleanup.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::targets::Detonation;
use crate::{
    config::GameplayConfig,
    scene::{BodyFactory, Presentation, Scene, VisualId},
};

#[derive(Debug, Clone, Copy)]
struct ScheduledRemoval {
    due: f64,
    sequence: u64,
    visual: VisualId,
}

impl PartialEq for ScheduledRemoval {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScheduledRemoval {}

impl PartialOrd for ScheduledRemoval {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledRemoval {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .total_cmp(&other.due)
            .then(self.sequence.cmp(&other.sequence))
    }
}

/// Visuals waiting to be removed, ordered by simulated expiry time.
#[derive(Debug, Default)]
pub struct RemovalSchedule {
    queue: BinaryHeap<Reverse<ScheduledRemoval>>,
    sequence: u64,
}

impl RemovalSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, visual: VisualId, due: f64) {
        self.queue.push(Reverse(ScheduledRemoval {
            due,
            sequence: self.sequence,
            visual,
        }));
        self.sequence += 1;
    }

    /// Pops every entry due at or before `now`, earliest first.
    pub fn drain_due(&mut self, now: f64) -> Vec<VisualId> {
        let mut due = Vec::new();
        while let Some(Reverse(next)) = self.queue.peek() {
            if next.due > now {
                break;
            }
            due.push(next.visual);
            self.queue.pop();
        }
        due
    }

    pub fn next_due(&self) -> Option<f64> {
        self.queue.peek().map(|Reverse(next)| next.due)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Replaces a triggered target with a burst of short-lived fragments.
pub struct DestructionEffect<R: Rng = Pcg32> {
    rng: R,
    fragment_count: usize,
    fragment_ttl: f64,
    lateral_impulse: f32,
    vertical_impulse: f32,
}

impl DestructionEffect<Pcg32> {
    pub fn from_config(config: &GameplayConfig) -> Self {
        Self::with_rng(config, Pcg32::seed_from_u64(config.rng_seed))
    }
}

impl<R: Rng> DestructionEffect<R> {
    pub fn with_rng(config: &GameplayConfig, rng: R) -> Self {
        Self {
            rng,
            fragment_count: config.fragment_count,
            fragment_ttl: config.fragment_ttl,
            lateral_impulse: config.fragment_lateral_impulse,
            vertical_impulse: config.fragment_vertical_impulse,
        }
    }

    pub fn fragment_ttl(&self) -> f64 {
        self.fragment_ttl
    }

    /// x and z in `[-lateral, lateral]`, y in `[0, vertical]`.
    pub fn random_impulse(&mut self) -> Vec3 {
        let lateral = self.lateral_impulse;
        let vertical = self.vertical_impulse;
        Vec3::new(
            self.rng.random_range(-lateral..=lateral),
            self.rng.random_range(0.0..=vertical),
            self.rng.random_range(-lateral..=lateral),
        )
    }

    /// Removes the target pair, spawns the fragments at its position, and
    /// schedules each one for removal `fragment_ttl` seconds after `now`.
    pub fn trigger<P: Presentation>(
        &mut self,
        scene: &mut Scene<P>,
        factory: &BodyFactory,
        detonation: &Detonation,
        schedule: &mut RemovalSchedule,
        now: f64,
    ) -> Vec<VisualId> {
        // The target body goes too, so fragments do not spawn inside it.
        scene.dispose(detonation.target);

        let due = now + self.fragment_ttl;
        let fragments: Vec<VisualId> = (0..self.fragment_count)
            .map(|_| {
                let impulse = self.random_impulse();
                let fragment = factory.fragment(scene, detonation.position, impulse);
                schedule.schedule(fragment, due);
                fragment
            })
            .collect();
        log::debug!(
            "target {:?} burst into {} fragments, expiring at {due:.3}s",
            detonation.target,
            fragments.len()
        );
        fragments
    }
}
