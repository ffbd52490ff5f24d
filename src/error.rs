//! Error taxonomy for the planner. Mirrors the failure modes a CBS/A*
//! implementation actually has: malformed input, a search running out of
//! frontier, a search hitting the configured depth cap, a cooperative
//! time-limit check tripping, or an invariant violation that indicates a
//! defect rather than a legitimate planning failure.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("input error: {0}")]
    InputError(String),

    #[error("search depth exceeded at agent {agent_id}")]
    SearchDepthExceeded { agent_id: usize },

    #[error("agent {agent_id} ran out of nodes to expand")]
    OutOfNodes { agent_id: usize },

    #[error("time limit exceeded")]
    TimeLimitExceeded,

    #[error("no solution exists: CBS frontier exhausted")]
    NoSolution,

    #[error("internal invariant violated: {0}")]
    Internal(String),
}

pub type PlannerResult<T> = Result<T, PlannerError>;
