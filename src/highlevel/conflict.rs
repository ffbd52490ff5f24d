//! Conflict detection over a set of per-agent paths. Grounded on the
//! teacher's `detect_conflicts` (`common/highlevel.rs`), simplified to the
//! two conflict kinds SPEC_FULL.md §4.4 asks for — no cardinal typing or MDD
//! singleton analysis, since this planner targets makespan optimality alone.

use std::collections::HashMap;

use crate::agent::Coord;

/// One half of a conflict: which agent, and the constraint it should gain to
/// avoid repeating it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConflictSide {
    pub agent_id: usize,
    pub coord: Coord,
    pub t: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    pub first: ConflictSide,
    pub second: ConflictSide,
}

/// Walks every agent's path from `t = 1` and returns the first vertex or
/// swap conflict in agent-id order. An agent whose path is shorter than the
/// longest one has already reached its goal and stops contributing to the
/// occupancy map — it does not hold its goal cell against later arrivals.
pub fn detect_conflict(paths: &[Vec<Coord>]) -> Option<Conflict> {
    let max_len = paths.iter().map(|p| p.len()).max().unwrap_or(0);
    if max_len == 0 {
        return None;
    }

    // occupancy[(coord, t)] = agent_id, built incrementally as we walk time
    // steps so that the swap check can look one coordinate back at `t - 1`.
    let mut occupancy: HashMap<(Coord, u32), usize> = HashMap::new();
    for (agent_id, path) in paths.iter().enumerate() {
        if let Some(&start) = path.first() {
            occupancy.insert((start, 0), agent_id);
        }
    }

    for t in 1..max_len as u32 {
        for (agent_id, path) in paths.iter().enumerate() {
            if t as usize >= path.len() {
                continue;
            }
            let prev = path[(t - 1) as usize];
            let curr = path[t as usize];

            if let Some(&other) = occupancy.get(&(curr, t)) {
                if other != agent_id {
                    return Some(Conflict {
                        first: ConflictSide {
                            agent_id,
                            coord: curr,
                            t,
                        },
                        second: ConflictSide {
                            agent_id: other,
                            coord: curr,
                            t,
                        },
                    });
                }
            }

            if let (Some(&holder_prev), Some(&holder_curr)) = (
                occupancy.get(&(prev, t)),
                occupancy.get(&(curr, t - 1)),
            ) {
                if holder_prev == holder_curr && holder_prev != agent_id {
                    return Some(Conflict {
                        first: ConflictSide {
                            agent_id,
                            coord: curr,
                            t,
                        },
                        second: ConflictSide {
                            agent_id: holder_prev,
                            coord: prev,
                            t,
                        },
                    });
                }
            }

            occupancy.insert((curr, t), agent_id);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_conflict_on_disjoint_paths() {
        let paths = vec![
            vec![Coord::new(0, 0), Coord::new(1, 0), Coord::new(2, 0)],
            vec![Coord::new(0, 2), Coord::new(1, 2), Coord::new(2, 2)],
        ];
        assert!(detect_conflict(&paths).is_none());
    }

    #[test]
    fn detects_vertex_conflict() {
        let paths = vec![
            vec![Coord::new(0, 0), Coord::new(1, 0)],
            vec![Coord::new(2, 0), Coord::new(1, 0)],
        ];
        let conflict = detect_conflict(&paths).unwrap();
        assert_eq!(conflict.first.coord, Coord::new(1, 0));
        assert_eq!(conflict.first.t, 1);
        assert_eq!(conflict.second.coord, Coord::new(1, 0));
    }

    #[test]
    fn detects_swap_conflict() {
        let paths = vec![
            vec![Coord::new(0, 0), Coord::new(1, 0)],
            vec![Coord::new(1, 0), Coord::new(0, 0)],
        ];
        let conflict = detect_conflict(&paths).unwrap();
        assert_eq!(conflict.first.t, 1);
        assert_ne!(conflict.first.coord, conflict.second.coord);
    }

    #[test]
    fn agent_that_already_reached_its_goal_does_not_block_later_arrivals() {
        // Agent 0 reaches its goal (1, 0) at t=1 and stops. Agent 1 doesn't
        // arrive at (1, 0) until t=2, well after agent 0 is gone.
        let paths = vec![
            vec![Coord::new(0, 0), Coord::new(1, 0)],
            vec![Coord::new(3, 0), Coord::new(2, 0), Coord::new(1, 0)],
        ];
        assert!(detect_conflict(&paths).is_none());
    }
}
