//! Arena-addressed search nodes for the time-expanded A* search. Grounded on
//! `original_source/MS_Project/AStarNode.{h,cpp}` and `AStarNodeMultiMap.{h,cpp}`:
//! a node can have several parents (several time-indexed predecessors reach
//! the same `(coord, t)`), encoded as a 9-bit mask over the neighbour
//! offsets. Unlike the source's raw owning pointers, nodes live in a flat
//! arena addressed by index (`NodeId`) per SPEC_FULL.md §9 — this makes
//! tombstoning a one-bit flip and avoids dangling references across PCA*'s
//! edits to OPEN/CLOSED.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::agent::{Coord, Position};

pub(crate) type NodeId = usize;

/// All nine `(dx, dy)` moves, including the wait `(0, 0)`.
pub(crate) const MOVES: [(i32, i32); 9] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 0),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

pub(crate) fn bit_for(dx: i32, dy: i32) -> u16 {
    let idx = ((dx + 1) * 3 + (dy + 1)) as u16;
    1u16 << idx
}

#[derive(Debug, Clone)]
pub(crate) struct SearchNode {
    pub(crate) pos: Position,
    /// `g + h`: `g` is `pos.t`, `h` is Euclidean distance to the goal.
    pub(crate) cost: f64,
    /// Bitmask over [`MOVES`]; bit `i` set means a parent exists at
    /// `pos.coord - MOVES[i]`, time `pos.t - 1`.
    pub(crate) parents: u16,
    pub(crate) del_mark: bool,
}

impl SearchNode {
    pub(crate) fn parent_coords(&self) -> impl Iterator<Item = Coord> + '_ {
        let coord = self.pos.coord;
        (0..9).filter(move |i| self.parents & (1 << i) != 0).map(move |i| {
            let (dx, dy) = MOVES[i];
            Coord::new(
                (coord.x as i32 - dx) as u16,
                (coord.y as i32 - dy) as u16,
            )
        })
    }

    pub(crate) fn clear_parent(&mut self, dx: i32, dy: i32) {
        self.parents &= !bit_for(dx, dy);
    }

    pub(crate) fn add_parent(&mut self, dx: i32, dy: i32) {
        self.parents |= bit_for(dx, dy);
    }

    pub(crate) fn has_parents(&self) -> bool {
        self.parents != 0
    }
}

/// A `(cost, x, y, t)`-ordered heap entry. The tie-break on all four fields
/// is load-bearing per SPEC_FULL.md §4.2. An exact tie between two distinct
/// `id`s is not itself an error: PCA* can tombstone a position and the
/// search can later regenerate it with an identical cost, leaving a stale
/// ghost entry for the old `id` sitting in the heap alongside the live one —
/// harmless, since `AgentSearch::solve` discards any popped entry whose `id`
/// no longer matches what OPEN maps the position to.
#[derive(Debug, Clone, Copy)]
pub(crate) struct HeapEntry {
    pub(crate) cost: f64,
    pub(crate) pos: Position,
    pub(crate) id: NodeId,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp_key() == other.cmp_key()
    }
}
impl Eq for HeapEntry {}

impl HeapEntry {
    fn cmp_key(&self) -> (u64, u16, u16, u32) {
        (self.cost.to_bits(), self.pos.coord.x, self.pos.coord.y, self.pos.t)
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so that `BinaryHeap` (a max-heap) behaves as a min-heap.
        self.cost
            .partial_cmp(&other.cost)
            .expect("NaN cost is a programmer error")
            .then_with(|| self.pos.coord.x.cmp(&other.pos.coord.x))
            .then_with(|| self.pos.coord.y.cmp(&other.pos.coord.y))
            .then_with(|| self.pos.t.cmp(&other.pos.t))
            .reverse()
    }
}

/// `Position -> NodeId` mapping for one role (OPEN or CLOSED) of one agent
/// search. At most one entry per position, per SPEC_FULL.md invariant 2/3.
#[derive(Debug, Clone, Default)]
pub(crate) struct NodeStore {
    pub(crate) positions: HashMap<Position, NodeId>,
}

impl NodeStore {
    pub(crate) fn get(&self, pos: Position) -> Option<NodeId> {
        self.positions.get(&pos).copied()
    }

    pub(crate) fn insert(&mut self, pos: Position, id: NodeId) {
        self.positions.insert(pos, id);
    }

    pub(crate) fn remove(&mut self, pos: Position) -> Option<NodeId> {
        self.positions.remove(&pos)
    }
}

/// Owns every [`SearchNode`] ever created by one agent search. Nodes are
/// never physically removed — only tombstoned — so `NodeId`s stay valid for
/// the lifetime of the arena, matching the tombstone discipline in
/// SPEC_FULL.md §4.2/§4.3.
#[derive(Debug, Clone, Default)]
pub(crate) struct Arena {
    nodes: Vec<SearchNode>,
}

impl Arena {
    pub(crate) fn push(&mut self, node: SearchNode) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub(crate) fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id]
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id]
    }
}

pub(crate) type Heap = BinaryHeap<HeapEntry>;
