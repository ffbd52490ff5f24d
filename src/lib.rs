//! Conflict-Based Search planner for multi-agent pathfinding on a 2D grid.
//!
//! The two-level structure: [`highlevel::cbs_tree`] drives a best-first
//! search over [`highlevel::cbs_node`]s, splitting on the first conflict
//! [`highlevel::conflict`] finds between any two agents' paths; each split
//! produces a child whose one changed agent is re-solved by
//! [`lowlevel::astar`], either from scratch or repaired in place by
//! [`lowlevel::pca_star`].

pub mod agent;
pub mod config;
pub mod error;
pub mod generator;
pub mod grid;
pub mod highlevel;
pub mod io;
pub mod lowlevel;
pub mod stat;

pub use agent::{Agent, Coord, Position};
pub use error::{PlannerError, PlannerResult};
pub use grid::Grid;
