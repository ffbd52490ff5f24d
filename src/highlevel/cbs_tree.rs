//! The CBS best-first frontier. Grounded on the teacher's `solver/cbs.rs`
//! main loop (pop min, detect conflict, spawn two children, push survivors),
//! adapted to this crate's `Rc`-shared `CbsNode`s and single conflict type.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::{debug, instrument};

use crate::agent::{Agent, Position};
use crate::error::{PlannerError, PlannerResult};
use crate::grid::Grid;
use crate::highlevel::cbs_node::CbsNode;
use crate::highlevel::conflict::detect_conflict;

struct OpenEntry(Rc<CbsNode>);

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.0.cost == other.0.cost
    }
}
impl Eq for OpenEntry {}
impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cost.cmp(&other.0.cost)
    }
}

pub struct CbsTree {
    open: BinaryHeap<Reverse<OpenEntry>>,
    closed: Vec<Rc<CbsNode>>,
    grid: Grid,
    use_pca_star: bool,
    time_limit: Duration,
}

impl CbsTree {
    pub fn new(
        agents: &[Agent],
        grid: Grid,
        depth_limit: u32,
        use_pca_star: bool,
        time_limit: Duration,
    ) -> PlannerResult<Self> {
        let root = CbsNode::root(agents, &grid, depth_limit)?;
        let mut open = BinaryHeap::new();
        open.push(Reverse(OpenEntry(Rc::new(root))));
        Ok(CbsTree {
            open,
            closed: Vec::new(),
            grid,
            use_pca_star,
            time_limit,
        })
    }

    /// Runs the best-first split-on-conflict loop to completion per
    /// SPEC_FULL.md §4.6.
    #[instrument(skip_all)]
    pub fn solve(mut self) -> PlannerResult<Rc<CbsNode>> {
        let started = Instant::now();

        loop {
            if started.elapsed() > self.time_limit {
                return Err(PlannerError::TimeLimitExceeded);
            }

            let Some(Reverse(OpenEntry(node))) = self.open.pop() else {
                return Err(PlannerError::NoSolution);
            };

            let paths = node.paths();
            let conflict = match detect_conflict(&paths) {
                None => return Ok(node),
                Some(c) => c,
            };
            debug!(?conflict, cost = node.cost, "splitting on conflict");

            for side in [conflict.first, conflict.second] {
                let constraint = Position::new(side.coord, side.t);
                match node.child(&self.grid, side.agent_id, constraint, self.use_pca_star) {
                    Ok(child) => self.open.push(Reverse(OpenEntry(Rc::new(child)))),
                    Err(PlannerError::OutOfNodes { .. })
                    | Err(PlannerError::SearchDepthExceeded { .. }) => continue,
                    Err(e) => return Err(e),
                }
            }

            self.closed.push(node);
        }
    }
}
