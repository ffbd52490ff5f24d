//! Agent file parser. Format per SPEC_FULL.md §6.2:
//! `<name> (<sx>,<sy>) (<gx>,<gy>)`, one agent per line, `#`-prefixed lines
//! ignored, malformed lines fatal.

use std::fs;
use std::path::Path;

use crate::agent::{Agent, Coord};
use crate::error::{PlannerError, PlannerResult};

pub fn load_agents(path: impl AsRef<Path>) -> PlannerResult<Vec<Agent>> {
    let text = fs::read_to_string(path.as_ref())
        .map_err(|e| PlannerError::InputError(format!("cannot read agent file: {e}")))?;
    parse_agents(&text)
}

pub fn parse_agents(text: &str) -> PlannerResult<Vec<Agent>> {
    let mut agents = Vec::new();
    for line in text.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split(' ');
        let name = fields
            .next()
            .ok_or_else(|| PlannerError::InputError(format!("malformed agent line: {line}")))?;
        let start_str = fields
            .next()
            .ok_or_else(|| PlannerError::InputError(format!("malformed agent line: {line}")))?;
        let goal_str = fields
            .next()
            .ok_or_else(|| PlannerError::InputError(format!("malformed agent line: {line}")))?;

        let start = parse_coord(start_str)?;
        let goal = parse_coord(goal_str)?;

        agents.push(Agent {
            id: agents.len(),
            name: name.to_string(),
            start,
            goal,
        });
    }
    Ok(agents)
}

fn parse_coord(field: &str) -> PlannerResult<Coord> {
    let inner = field
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| PlannerError::InputError(format!("malformed coordinate: {field}")))?;

    let (x_str, y_str) = inner
        .split_once(',')
        .ok_or_else(|| PlannerError::InputError(format!("malformed coordinate: {field}")))?;

    let x = x_str
        .parse::<u16>()
        .map_err(|_| PlannerError::InputError(format!("malformed coordinate: {field}")))?;
    let y = y_str
        .parse::<u16>()
        .map_err(|_| PlannerError::InputError(format!("malformed coordinate: {field}")))?;

    Ok(Coord::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_agent() {
        let agents = parse_agents("robot0 (0,0) (2,0)\n").unwrap();
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].name, "robot0");
        assert_eq!(agents[0].start, Coord::new(0, 0));
        assert_eq!(agents[0].goal, Coord::new(2, 0));
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let agents = parse_agents("# comment\n\nrobot0 (0,0) (1,1)\n").unwrap();
        assert_eq!(agents.len(), 1);
    }

    #[test]
    fn malformed_line_is_fatal() {
        assert!(parse_agents("robot0 (0,0)\n").is_err());
        assert!(parse_agents("robot0 0,0 1,1\n").is_err());
    }
}
