//! Time-expanded A* for one agent. Grounded on the teacher's
//! `algorithm/astar.rs` for the open-list-driven loop shape and `tracing`
//! instrumentation, generalized to the multi-parent, tombstone-aware node
//! model PCA* needs (SPEC_FULL.md §4.2).

use std::collections::HashSet;

use tracing::{instrument, trace};

use crate::agent::{Coord, Position};
use crate::error::{PlannerError, PlannerResult};
use crate::grid::Grid;
use crate::lowlevel::node::{Arena, Heap, HeapEntry, NodeStore, SearchNode, MOVES};

/// A single agent's time-expanded A* search, holding its own OPEN/CLOSED
/// node stores and the arena that owns their nodes. PCA* repair
/// (`pca_star.rs`) operates directly on this structure's fields.
#[derive(Debug, Clone)]
pub struct AgentSearch {
    pub(crate) agent_id: usize,
    pub(crate) start: Coord,
    pub(crate) goal: Coord,
    pub(crate) constraints: HashSet<Position>,
    pub(crate) depth_limit: u32,
    pub(crate) arena: Arena,
    pub(crate) open: NodeStore,
    pub(crate) closed: NodeStore,
    pub(crate) heap: Heap,
    pub(crate) goal_node: Option<crate::lowlevel::node::NodeId>,
}

fn heuristic(coord: Coord, goal: Coord) -> f64 {
    coord.euclidean_distance(goal)
}

impl AgentSearch {
    /// Builds a fresh search with only the root node on OPEN. Does not run
    /// the search; call [`AgentSearch::solve`] next.
    pub fn new(
        agent_id: usize,
        start: Coord,
        goal: Coord,
        constraints: HashSet<Position>,
        depth_limit: u32,
    ) -> Self {
        let mut arena = Arena::default();
        let mut open = NodeStore::default();
        let mut heap = Heap::default();

        let root_pos = Position::new(start, 0);
        let root = SearchNode {
            pos: root_pos,
            cost: heuristic(start, goal),
            parents: 0,
            del_mark: false,
        };
        let id = arena.push(root);
        open.insert(root_pos, id);
        heap.push(HeapEntry {
            cost: heuristic(start, goal),
            pos: root_pos,
            id,
        });

        AgentSearch {
            agent_id,
            start,
            goal,
            constraints,
            depth_limit,
            arena,
            open,
            closed: NodeStore::default(),
            heap,
            goal_node: None,
        }
    }

    /// Runs the search to completion: either the goal is found (`goal_node`
    /// is set) or an error is returned. Per SPEC_FULL.md §4.2, a node popped
    /// from the heap that is no longer present in the OPEN store (because it
    /// was tombstoned by PCA*, or superseded) is silently discarded.
    #[instrument(skip_all, name = "a_star_solve", fields(agent = self.agent_id), level = "debug")]
    pub fn solve(&mut self, grid: &Grid) -> PlannerResult<()> {
        loop {
            let Some(entry) = self.heap.pop() else {
                return Err(PlannerError::OutOfNodes {
                    agent_id: self.agent_id,
                });
            };

            // Invariant 4: a heap entry absent from (or tombstoned in) OPEN is stale.
            let Some(open_id) = self.open.get(entry.pos) else {
                continue;
            };
            if open_id != entry.id || self.arena.get(entry.id).del_mark {
                continue;
            }

            trace!(pos = ?entry.pos, cost = entry.cost, "expand node");

            if entry.pos.coord == self.goal {
                self.goal_node = Some(entry.id);
                // Push back so PCA* can later find and remove the goal entry.
                self.heap.push(entry);
                return Ok(());
            }

            if entry.pos.t + 1 > self.depth_limit {
                return Err(PlannerError::SearchDepthExceeded {
                    agent_id: self.agent_id,
                });
            }

            self.expand(grid, entry.pos);

            // Step 5: move OPEN -> CLOSED without touching the heap.
            self.open.remove(entry.pos);
            self.closed.insert(entry.pos, entry.id);
        }
    }

    fn expand(&mut self, grid: &Grid, pos: Position) {
        let t_next = pos.t + 1;
        for &(dx, dy) in &MOVES {
            let nx = pos.coord.x as i32 + dx;
            let ny = pos.coord.y as i32 + dy;
            if nx < 0 || ny < 0 {
                continue;
            }
            let coord = Coord::new(nx as u16, ny as u16);
            let next_pos = Position::new(coord, t_next);

            if !grid.passable(coord) {
                continue;
            }
            if !is_move_allowed(pos.coord, coord, t_next, &self.constraints) {
                continue;
            }

            if let Some(existing_open) = self.open.get(next_pos) {
                self.arena.get_mut(existing_open).add_parent(dx, dy);
                continue;
            }
            if let Some(existing_closed) = self.closed.get(next_pos) {
                self.arena.get_mut(existing_closed).add_parent(dx, dy);
                continue;
            }

            let mut node = SearchNode {
                pos: next_pos,
                cost: t_next as f64 + heuristic(coord, self.goal),
                parents: 0,
                del_mark: false,
            };
            node.add_parent(dx, dy);
            let cost = node.cost;
            let id = self.arena.push(node);
            self.open.insert(next_pos, id);
            self.heap.push(HeapEntry {
                cost,
                pos: next_pos,
                id,
            });
        }
    }

    /// Reconstructs the path from start to goal by walking parent chains
    /// backward from the goal node. Memoised by the caller (`CBSNode`).
    pub fn path(&self) -> Option<Vec<Coord>> {
        let goal_id = self.goal_node?;
        let mut pos = self.arena.get(goal_id).pos;
        let mut coords = vec![pos.coord];

        while pos.t > 0 {
            let id = self
                .closed
                .get(pos)
                .or_else(|| self.open.get(pos))
                .expect("path node must live in OPEN or CLOSED");
            let node = self.arena.get(id);
            let parent_coord = node
                .parent_coords()
                .next()
                .expect("non-root node must have at least one parent");
            coords.push(parent_coord);
            pos = Position::new(parent_coord, pos.t - 1);
        }

        coords.reverse();
        Some(coords)
    }

    pub fn cost(&self) -> Option<u32> {
        self.goal_node.map(|id| self.arena.get(id).pos.t)
    }
}

/// True iff moving from `from` to `to`, landing at time `to_time`, is legal:
/// passable, non-negative (checked by the caller via `i32` arithmetic), and
/// not constrained. A grid passability check is applied separately by the
/// caller, which also owns the grid reference; this helper only applies the
/// constraint-set check shared by A* and PCA*.
pub(crate) fn is_move_allowed(
    _from: Coord,
    to: Coord,
    to_time: u32,
    constraints: &HashSet<Position>,
) -> bool {
    !constraints.contains(&Position::new(to, to_time))
}
