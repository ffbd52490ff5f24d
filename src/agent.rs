//! Coordinates, time-indexed positions, and agent descriptors.

use serde::{Deserialize, Serialize};

/// A grid cell. Non-negative by construction (`u16`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: u16,
    pub y: u16,
}

impl Coord {
    pub fn new(x: u16, y: u16) -> Self {
        Coord { x, y }
    }

    /// Euclidean distance to `other`, used as the admissible A* heuristic.
    pub fn euclidean_distance(&self, other: Coord) -> f64 {
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A vertex of the time-expanded graph: a coordinate plus a time step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub coord: Coord,
    pub t: u32,
}

impl Position {
    pub fn new(coord: Coord, t: u32) -> Self {
        Position { coord, t }
    }
}

/// One participant in the MAPF instance: a distinct start and goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    pub id: usize,
    pub name: String,
    pub start: Coord,
    pub goal: Coord,
}
