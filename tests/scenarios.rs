//! End-to-end planner scenarios, one file per agent-set/grid combination.
//! Grounded on SPEC_FULL.md §8's testable properties: collision freedom,
//! optimality on small instances, determinism, and PCA*/classic parity.

use std::time::Duration;

use cbs_mapf::agent::{Agent, Coord};
use cbs_mapf::error::PlannerError;
use cbs_mapf::highlevel::cbs_tree::CbsTree;
use cbs_mapf::io::grid_file::parse_grid;

fn agent(id: usize, name: &str, start: (u16, u16), goal: (u16, u16)) -> Agent {
    Agent {
        id,
        name: name.to_string(),
        start: Coord::new(start.0, start.1),
        goal: Coord::new(goal.0, goal.1),
    }
}

fn solve(grid_text: &str, agents: &[Agent], use_pca_star: bool) -> Vec<Vec<Coord>> {
    let grid = parse_grid(grid_text).unwrap();
    let tree = CbsTree::new(agents, grid, 200, use_pca_star, Duration::from_secs(10)).unwrap();
    let solution = tree.solve().unwrap();
    solution.paths()
}

fn assert_collision_free(paths: &[Vec<Coord>]) {
    assert!(cbs_mapf::highlevel::conflict::detect_conflict(paths).is_none());
}

#[test]
fn single_agent_straight_line() {
    let agents = vec![agent(0, "a", (0, 0), (4, 0))];
    let paths = solve("11111\n11111", &agents, true);
    assert_collision_free(&paths);
    assert_eq!(paths[0].last(), Some(&Coord::new(4, 0)));
}

#[test]
fn constrained_detour_around_a_wall() {
    // Row 0 has a wall at x=2, forcing a detour through the clear row 1.
    let grid_text = "11011\n11111";
    let agents = vec![agent(0, "a", (0, 0), (4, 0))];
    let paths = solve(grid_text, &agents, true);
    assert_collision_free(&paths);
    assert_eq!(paths[0].last(), Some(&Coord::new(4, 0)));
    assert!(paths[0].iter().any(|c| c.y == 1));
}

#[test]
fn single_agent_waits_out_an_explicit_constraint() {
    // spec.md §8 scenario 2: a 1x3 corridor, one agent (0,0) -> (2,0), with
    // an explicit constraint forbidding (1,0) at t=1. The only way through
    // is to wait a tick at the start before proceeding.
    let grid = parse_grid("111").unwrap();
    let agents = vec![agent(0, "a", (0, 0), (2, 0))];
    let root = cbs_mapf::highlevel::cbs_node::CbsNode::root(&agents, &grid, 50).unwrap();
    let child = root
        .child(
            &grid,
            0,
            cbs_mapf::agent::Position::new(Coord::new(1, 0), 1),
            true,
        )
        .unwrap();
    assert_eq!(
        child.paths()[0],
        vec![
            Coord::new(0, 0),
            Coord::new(0, 0),
            Coord::new(1, 0),
            Coord::new(2, 0),
        ]
    );
}

#[test]
fn head_on_swap_is_resolved() {
    let agents = vec![
        agent(0, "a", (0, 0), (2, 0)),
        agent(1, "b", (2, 0), (0, 0)),
    ];
    let paths = solve("111\n111", &agents, true);
    assert_collision_free(&paths);
    assert_eq!(paths[0].last(), Some(&Coord::new(2, 0)));
    assert_eq!(paths[1].last(), Some(&Coord::new(0, 0)));
}

#[test]
fn three_agent_crossing_is_resolved() {
    let agents = vec![
        agent(0, "a", (0, 1), (2, 1)),
        agent(1, "b", (1, 0), (1, 2)),
        agent(2, "c", (2, 1), (0, 1)),
    ];
    let paths = solve("111\n111\n111", &agents, true);
    assert_collision_free(&paths);
}

#[test]
fn infeasible_instance_reports_no_solution() {
    // The goal cell is walled off entirely; no path exists under any
    // constraint set, so even building the root CBS node fails.
    let grid_text = "101\n101\n101";
    let agents = vec![agent(0, "a", (0, 0), (2, 0))];
    let grid = parse_grid(grid_text).unwrap();
    let result = CbsTree::new(&agents, grid, 50, true, Duration::from_secs(5));
    assert!(result.is_err());
}

#[test]
fn frontier_exhaustion_during_solve_reports_no_solution() {
    // A bare 1x2 corridor offers no cell to wait in, so a head-on swap
    // between two agents can never be resolved by adding constraints: every
    // child CBS node eventually fails, and the frontier empties inside
    // `solve()` itself (the root node, unconstrained, builds fine).
    let grid = parse_grid("11").unwrap();
    let agents = vec![
        agent(0, "a", (0, 0), (1, 0)),
        agent(1, "b", (1, 0), (0, 0)),
    ];
    let tree = CbsTree::new(&agents, grid, 3, true, Duration::from_secs(5)).unwrap();
    let result = tree.solve();
    assert!(matches!(result, Err(PlannerError::NoSolution)));
}

#[test]
fn determinism_same_input_same_output() {
    let agents = vec![
        agent(0, "a", (0, 1), (2, 1)),
        agent(1, "b", (1, 0), (1, 2)),
        agent(2, "c", (2, 1), (0, 1)),
    ];
    let first = solve("111\n111\n111", &agents, true);
    let second = solve("111\n111\n111", &agents, true);
    assert_eq!(first, second);
}

#[test]
fn pca_star_and_classic_restart_agree_on_makespan() {
    let agents = vec![
        agent(0, "a", (0, 1), (2, 1)),
        agent(1, "b", (1, 0), (1, 2)),
        agent(2, "c", (2, 1), (0, 1)),
    ];
    let grid_text = "111\n111\n111";

    let pca_paths = solve(grid_text, &agents, true);
    let classic_paths = solve(grid_text, &agents, false);

    let pca_makespan = pca_paths.iter().map(|p| p.len()).max();
    let classic_makespan = classic_paths.iter().map(|p| p.len()).max();
    assert_eq!(pca_makespan, classic_makespan);
}
