//! Path-Clearing A* (PCA*): incremental repair of an [`AgentSearch`] after a
//! new constraint invalidates one of its positions. Grounded directly on
//! `original_source/MS_Project/PathClearAStar.{h,cpp}`: a sub-search rooted
//! at the newly constrained position walks forward, deleting the
//! (successor, parent) edge it contributed to each descendant, and only
//! recurses into a descendant once its last surviving parent edge is gone.
//!
//! One deliberate refinement versus the original: a node removed from OPEN
//! (never expanded) cannot have contributed a parent bit to anything, since
//! parent bits are only ever set by [`crate::lowlevel::astar::AgentSearch::solve`]'s
//! `expand` step, which only runs on nodes transitioning OPEN -> CLOSED. So a
//! node losing its last parent while still on OPEN is tombstoned and dropped
//! with nothing further to do; only a node losing its last parent while on
//! CLOSED (guaranteed to have generated successors already) is walked
//! further. Unlike the original's `remove_extra_open_nodes` reconciliation
//! sweep (needed because its priority-queue-ordered walk could miss
//! branches), this repair cascades through every removed CLOSED node to
//! exhaustion in one pass — no separate sweep is needed.

use std::collections::VecDeque;

use crate::agent::{Coord, Position};
use crate::error::{PlannerError, PlannerResult};
use crate::grid::Grid;
use crate::lowlevel::astar::{is_move_allowed, AgentSearch};
use crate::lowlevel::node::MOVES;

/// Produces a new `AgentSearch` behaving as if `parent` had been run from
/// scratch with `parent`'s constraints plus `new_constraint`, without
/// re-expanding nodes whose reachability is unaffected.
pub fn repair(
    parent: &AgentSearch,
    grid: &Grid,
    new_constraint: Position,
) -> PlannerResult<AgentSearch> {
    let mut child = parent.clone();
    child.constraints.insert(new_constraint);

    let is_goal_position = child
        .goal_node
        .map(|id| child.arena.get(id).pos == new_constraint)
        .unwrap_or(false);

    if is_goal_position {
        // Edge case (SPEC_FULL.md §4.3): the goal node was never expanded
        // (it stays on OPEN per the A* main loop), so it never contributed a
        // parent bit to anything. Pop its stale OPEN entry and stop; there is
        // nothing downstream to cascade through.
        child.open.remove(new_constraint);
        child.goal_node = None;
        return Ok(child);
    }

    let removed_id = child
        .closed
        .remove(new_constraint)
        .or_else(|| child.open.remove(new_constraint))
        .ok_or_else(|| {
            PlannerError::Internal(format!(
                "constrained position {new_constraint:?} not found in parent search"
            ))
        })?;
    let _ = removed_id;

    let mut frontier = VecDeque::new();
    frontier.push_back(new_constraint);

    while let Some(cur) = frontier.pop_front() {
        if cur.coord == child.goal {
            continue;
        }
        cascade_from(&mut child, grid, cur, &mut frontier)?;
    }

    Ok(child)
}

fn cascade_from(
    child: &mut AgentSearch,
    grid: &Grid,
    cur: Position,
    frontier: &mut VecDeque<Position>,
) -> PlannerResult<()> {
    let t_next = cur.t + 1;
    for &(dx, dy) in &MOVES {
        let nx = cur.coord.x as i32 + dx;
        let ny = cur.coord.y as i32 + dy;
        if nx < 0 || ny < 0 {
            continue;
        }
        let coord = Coord::new(nx as u16, ny as u16);
        if !grid.passable(coord) {
            continue;
        }
        if !is_move_allowed(cur.coord, coord, t_next, &child.constraints) {
            continue;
        }
        let succ_pos = Position::new(coord, t_next);

        if let Some(id) = child.open.get(succ_pos) {
            let node = child.arena.get_mut(id);
            node.clear_parent(dx, dy);
            if !node.has_parents() {
                // Never expanded, so it never contributed a parent bit to
                // anything: tombstone it and stop, nothing to cascade into.
                node.del_mark = true;
                child.open.remove(succ_pos);
            }
            continue;
        }
        if let Some(id) = child.closed.get(succ_pos) {
            let node = child.arena.get_mut(id);
            node.clear_parent(dx, dy);
            if !node.has_parents() {
                child.closed.remove(succ_pos);
                frontier.push_back(succ_pos);
            }
            continue;
        }

        return Err(PlannerError::Internal(format!(
            "attempted to delete edge ({cur:?} -> {succ_pos:?}) not present in either list"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::grid_file::parse_grid;
    use std::collections::HashSet;

    #[test]
    fn pca_repair_matches_classic_restart() {
        let grid = parse_grid("111\n111\n111").unwrap();
        let start = Coord::new(0, 0);
        let goal = Coord::new(2, 0);

        let mut search = AgentSearch::new(0, start, goal, HashSet::new(), 50);
        search.solve(&grid).unwrap();
        assert_eq!(search.cost(), Some(2));

        let new_constraint = Position::new(Coord::new(1, 0), 1);
        let repaired = repair(&search, &grid, new_constraint).unwrap();

        let mut classic_constraints = HashSet::new();
        classic_constraints.insert(new_constraint);
        let mut classic = AgentSearch::new(0, start, goal, classic_constraints, 50);
        classic.solve(&grid).unwrap();

        let mut repaired = repaired;
        repaired.solve(&grid).unwrap();

        assert_eq!(repaired.cost(), classic.cost());
    }
}
