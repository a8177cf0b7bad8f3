use std::collections::{HashMap, HashSet};

use glam::Vec3;

use crate::{
    core::{rigidbody::RigidBody, shape::Aabb},
    utils::allocator::{Arena, BodyId},
};

/// AABBs spanning more cells than this along any axis skip the grid and are
/// tested against every other body instead.
const MAX_CELLS_PER_AXIS: i32 = 64;

type Cell = (i32, i32, i32);

/// Uniform grid spatial partitioning over world AABBs.
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<Cell, Vec<BodyId>>,
    oversized: Vec<BodyId>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
            oversized: Vec::new(),
        }
    }

    fn world_to_cell(&self, position: Vec3) -> Cell {
        (
            (position.x / self.cell_size).floor() as i32,
            (position.y / self.cell_size).floor() as i32,
            (position.z / self.cell_size).floor() as i32,
        )
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.oversized.clear();
    }

    pub fn insert(&mut self, id: BodyId, aabb: &Aabb) {
        let min = self.world_to_cell(aabb.min);
        let max = self.world_to_cell(aabb.max);
        let span = (max.0 - min.0).max(max.1 - min.1).max(max.2 - min.2);
        if span > MAX_CELLS_PER_AXIS {
            self.oversized.push(id);
            return;
        }

        for x in min.0..=max.0 {
            for y in min.1..=max.1 {
                for z in min.2..=max.2 {
                    self.cells.entry((x, y, z)).or_default().push(id);
                }
            }
        }
    }

    /// Unordered candidate pairs sharing at least one cell.
    fn candidates(&self, all: &[BodyId]) -> HashSet<(BodyId, BodyId)> {
        let mut pairs = HashSet::new();
        for occupants in self.cells.values() {
            for (i, &a) in occupants.iter().enumerate() {
                for &b in &occupants[i + 1..] {
                    pairs.insert(ordered(a, b));
                }
            }
        }
        for &big in &self.oversized {
            for &other in all {
                if big != other {
                    pairs.insert(ordered(big, other));
                }
            }
        }
        pairs
    }
}

fn ordered(a: BodyId, b: BodyId) -> (BodyId, BodyId) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Broad phase driver returning potentially colliding body pairs.
pub struct BroadPhase {
    grid: SpatialGrid,
}

impl BroadPhase {
    pub fn new(cell_size: f32) -> Self {
        Self {
            grid: SpatialGrid::new(cell_size),
        }
    }

    /// Sorted, deduplicated pairs whose AABBs overlap. Pairs of two static
    /// bodies are never reported.
    pub fn potential_pairs(&mut self, bodies: &Arena<RigidBody>) -> Vec<(BodyId, BodyId)> {
        self.grid.clear();

        let mut boxes = HashMap::with_capacity(bodies.len());
        let mut ids = Vec::with_capacity(bodies.len());
        for (id, body) in bodies.iter() {
            let aabb = body.aabb();
            self.grid.insert(id, &aabb);
            boxes.insert(id, (aabb, body.is_static()));
            ids.push(id);
        }

        let mut pairs: Vec<_> = self
            .grid
            .candidates(&ids)
            .into_iter()
            .filter(|(a, b)| match (boxes.get(a), boxes.get(b)) {
                (Some((box_a, static_a)), Some((box_b, static_b))) => {
                    !(*static_a && *static_b) && box_a.overlaps(box_b)
                }
                _ => false,
            })
            .collect();
        pairs.sort();
        pairs
    }
}
