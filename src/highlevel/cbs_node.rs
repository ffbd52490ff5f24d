//! A single node of the CBS constraint tree: one `AgentSearch` per agent plus
//! the makespan cost over them. Grounded on the teacher's `HighLevelOpenNode`
//! (`common/highlevel.rs`), stripped of the focal-search/MDD/cardinal-typing
//! fields that only the bounded-suboptimal solver variants need.

use std::collections::HashSet;
use std::rc::Rc;

use crate::agent::{Agent, Coord, Position};
use crate::error::PlannerResult;
use crate::grid::Grid;
use crate::lowlevel::astar::AgentSearch;
use crate::lowlevel::pca_star;

#[derive(Debug, Clone)]
pub struct CbsNode {
    /// One search per agent, indexed by agent id. Per SPEC_FULL.md §4.5, a
    /// node only *owns* the search it produced (`new_agent_id`); the rest are
    /// `Rc`-shared with its parent, so cloning this vector is cheap.
    pub searches: Vec<Rc<AgentSearch>>,
    pub new_agent_id: Option<usize>,
    pub cost: u32,
}

impl CbsNode {
    /// Builds the root node: one fresh, unconstrained A* search per agent.
    pub fn root(agents: &[Agent], grid: &Grid, depth_limit: u32) -> PlannerResult<Self> {
        let mut searches = Vec::with_capacity(agents.len());
        for agent in agents {
            let mut search =
                AgentSearch::new(agent.id, agent.start, agent.goal, HashSet::new(), depth_limit);
            search.solve(grid)?;
            searches.push(Rc::new(search));
        }
        let cost = makespan(&searches);
        Ok(CbsNode {
            searches,
            new_agent_id: None,
            cost,
        })
    }

    /// Builds a child node: `agent_id`'s search gains `new_constraint`, via
    /// PCA* repair or a classic from-scratch restart, and every other
    /// agent's search is shared unchanged with `self`.
    pub fn child(
        &self,
        grid: &Grid,
        agent_id: usize,
        new_constraint: Position,
        use_pca_star: bool,
    ) -> PlannerResult<Self> {
        let parent_search = &self.searches[agent_id];

        let mut new_search = if use_pca_star {
            pca_star::repair(parent_search, grid, new_constraint)?
        } else {
            let mut constraints = parent_search.constraints.clone();
            constraints.insert(new_constraint);
            AgentSearch::new(
                agent_id,
                parent_search.start,
                parent_search.goal,
                constraints,
                parent_search.depth_limit,
            )
        };
        new_search.solve(grid)?;

        let mut searches = self.searches.clone();
        searches[agent_id] = Rc::new(new_search);
        let cost = makespan(&searches);

        Ok(CbsNode {
            searches,
            new_agent_id: Some(agent_id),
            cost,
        })
    }

    pub fn paths(&self) -> Vec<Vec<Coord>> {
        self.searches
            .iter()
            .map(|s| {
                s.path()
                    .expect("a CbsNode's searches have all reached their goal")
            })
            .collect()
    }
}

fn makespan(searches: &[Rc<AgentSearch>]) -> u32 {
    searches
        .iter()
        .map(|s| {
            s.cost()
                .expect("a CbsNode's searches have all reached their goal")
        })
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::grid_file::parse_grid;

    #[test]
    fn root_makespan_is_max_over_agents() {
        let grid = parse_grid("1111\n1111").unwrap();
        let agents = vec![
            Agent {
                id: 0,
                name: "a".to_string(),
                start: Coord::new(0, 0),
                goal: Coord::new(3, 0),
            },
            Agent {
                id: 1,
                name: "b".to_string(),
                start: Coord::new(0, 1),
                goal: Coord::new(1, 1),
            },
        ];
        let root = CbsNode::root(&agents, &grid, 50).unwrap();
        assert_eq!(root.cost, 3);
    }

    #[test]
    fn child_node_shares_unaffected_agent_searches() {
        let grid = parse_grid("1111\n1111").unwrap();
        let agents = vec![
            Agent {
                id: 0,
                name: "a".to_string(),
                start: Coord::new(0, 0),
                goal: Coord::new(3, 0),
            },
            Agent {
                id: 1,
                name: "b".to_string(),
                start: Coord::new(0, 1),
                goal: Coord::new(1, 1),
            },
        ];
        let root = CbsNode::root(&agents, &grid, 50).unwrap();
        let child = root
            .child(&grid, 0, Position::new(Coord::new(1, 0), 1), false)
            .unwrap();

        assert!(Rc::ptr_eq(&root.searches[1], &child.searches[1]));
        assert!(!Rc::ptr_eq(&root.searches[0], &child.searches[0]));
    }
}
