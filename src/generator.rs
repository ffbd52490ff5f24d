//! Random grid/agent-set generator for benchmark mode. Grounded on
//! `original_source/MS_Project/TestGenerator.{h,cpp}`: each cell is an
//! obstacle independently with probability `obstacle_probability`, then
//! agents are placed on free cells with distinct, non-colliding start/goal
//! pairs, the way the teacher's `scenario.rs` draws agents with `rand`.

use rand::Rng;
use std::collections::HashSet;

use crate::agent::{Agent, Coord};
use crate::grid::Grid;

/// One generated benchmark case: a grid plus its agent set.
pub struct GeneratedCase {
    pub grid: Grid,
    pub agents: Vec<Agent>,
}

pub fn generate_case<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    obstacle_probability: f64,
    num_agents: usize,
    rng: &mut R,
) -> GeneratedCase {
    let mut grid = Grid::new(cols, rows);
    for y in 0..rows {
        for x in 0..cols {
            let free = rng.gen_range(0.0..1.0) >= obstacle_probability;
            grid.set_passable(x, y, free);
        }
    }

    let mut occupied: HashSet<Coord> = HashSet::new();
    let mut agents = Vec::with_capacity(num_agents);
    for i in 0..num_agents {
        let start = gen_free_coord(&grid, &occupied, rng);
        occupied.insert(start);
        let goal = loop {
            let candidate = gen_free_coord(&grid, &occupied, rng);
            if candidate != start {
                break candidate;
            }
        };
        occupied.insert(goal);

        agents.push(Agent {
            id: i,
            name: format!("Agent_{i}"),
            start,
            goal,
        });
    }

    GeneratedCase { grid, agents }
}

/// Draws a passable, not-yet-occupied coordinate, retrying on collision.
fn gen_free_coord<R: Rng + ?Sized>(grid: &Grid, occupied: &HashSet<Coord>, rng: &mut R) -> Coord {
    loop {
        let x = rng.gen_range(0..grid.width()) as u16;
        let y = rng.gen_range(0..grid.height()) as u16;
        let coord = Coord::new(x, y);
        if grid.passable(coord) && !occupied.contains(&coord) {
            return coord;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn generated_agents_have_distinct_free_start_and_goal() {
        let mut rng = StdRng::seed_from_u64(42);
        let case = generate_case(10, 10, 0.2, 5, &mut rng);
        assert_eq!(case.agents.len(), 5);
        for agent in &case.agents {
            assert_ne!(agent.start, agent.goal);
            assert!(case.grid.passable(agent.start));
            assert!(case.grid.passable(agent.goal));
        }
    }

    #[test]
    fn agent_starts_and_goals_do_not_collide() {
        let mut rng = StdRng::seed_from_u64(7);
        let case = generate_case(15, 15, 0.1, 10, &mut rng);
        let mut seen = HashSet::new();
        for agent in &case.agents {
            assert!(seen.insert(agent.start));
            assert!(seen.insert(agent.goal));
        }
    }
}
