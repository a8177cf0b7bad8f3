use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Handle into an [`Arena`] with generation tracking so stale handles never
/// alias a slot that has been reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct BodyId {
    index: u32,
    generation: u32,
}

impl BodyId {
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Generational arena owning every value it hands out a [`BodyId`] for.
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: VecDeque<u32>,
    live: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: VecDeque::new(),
            live: 0,
        }
    }

    pub fn insert(&mut self, value: T) -> BodyId {
        self.live += 1;
        if let Some(index) = self.free.pop_front() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            return BodyId::new(index, slot.generation);
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        BodyId::new(index, 0)
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: BodyId) -> Option<&T> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut T> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    /// Mutable access to two distinct live values at once.
    pub fn get2_mut(&mut self, a: BodyId, b: BodyId) -> Option<(&mut T, &mut T)> {
        if a.index == b.index || !self.contains(a) || !self.contains(b) {
            return None;
        }

        let (low, high, flipped) = if a.index < b.index {
            (a, b, false)
        } else {
            (b, a, true)
        };
        let (left, right) = self.slots.split_at_mut(high.index());
        let first = left[low.index()].value.as_mut()?;
        let second = right[0].value.as_mut()?;

        if flipped {
            Some((second, first))
        } else {
            Some((first, second))
        }
    }

    /// Removes a value; the slot's generation is bumped so `id` goes stale.
    pub fn remove(&mut self, id: BodyId) -> Option<T> {
        let slot = self
            .slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)?;
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push_back(id.index);
        self.live -= 1;
        Some(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &T)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value
                .as_ref()
                .map(|value| (BodyId::new(index as u32, slot.generation), value))
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BodyId, &mut T)> + '_ {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.value
                .as_mut()
                .map(|value| (BodyId::new(index as u32, generation), value))
        })
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
}

#[cfg(feature = "parallel")]
impl<T: Send> Arena<T> {
    /// Visits every live value on the rayon pool.
    pub fn par_for_each_mut<F>(&mut self, op: F)
    where
        F: Fn(&mut T) + Sync + Send,
    {
        use rayon::prelude::*;

        self.slots
            .par_iter_mut()
            .filter_map(|slot| slot.value.as_mut())
            .for_each(op);
    }
}
