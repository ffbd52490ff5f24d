//! Solution file writer/reader. Format per SPEC_FULL.md §6.3: a banner line
//! of asterisks, the agent name, another banner, then one `(x,y)` per line
//! of the path, a blank line, CRLF line endings throughout.

use std::fs;
use std::path::Path;

use crate::agent::{Agent, Coord};
use crate::error::{PlannerError, PlannerResult};

const BANNER: &str = "*********************";

pub fn write_solution(
    path: impl AsRef<Path>,
    agents: &[Agent],
    paths: &[Vec<Coord>],
) -> PlannerResult<()> {
    let mut out = String::new();
    for (agent, path) in agents.iter().zip(paths) {
        out.push_str(BANNER);
        out.push_str("\r\n");
        out.push_str(&agent.name);
        out.push_str("\r\n");
        out.push_str(BANNER);
        out.push_str("\r\n");
        for coord in path {
            out.push_str(&format!("({},{})\r\n", coord.x, coord.y));
        }
        out.push_str("\r\n");
    }
    fs::write(path.as_ref(), out)
        .map_err(|e| PlannerError::InputError(format!("cannot write solution file: {e}")))
}

/// Parses a solution file back into per-agent coordinate sequences, in file
/// order. Used by the round-trip test in SPEC_FULL.md §8.
pub fn parse_solution(text: &str) -> PlannerResult<Vec<(String, Vec<Coord>)>> {
    let mut result = Vec::new();
    let mut lines = text.lines().map(|l| l.strip_suffix('\r').unwrap_or(l));

    while let Some(line) = lines.next() {
        if line != BANNER {
            continue;
        }
        let name = lines
            .next()
            .ok_or_else(|| PlannerError::InputError("truncated solution file".to_string()))?;
        let banner2 = lines
            .next()
            .ok_or_else(|| PlannerError::InputError("truncated solution file".to_string()))?;
        if banner2 != BANNER {
            return Err(PlannerError::InputError(
                "malformed solution file banner".to_string(),
            ));
        }

        let mut path = Vec::new();
        for coord_line in lines.by_ref() {
            if coord_line.is_empty() {
                break;
            }
            let inner = coord_line
                .strip_prefix('(')
                .and_then(|s| s.strip_suffix(')'))
                .ok_or_else(|| {
                    PlannerError::InputError(format!("malformed coordinate line: {coord_line}"))
                })?;
            let (x_str, y_str) = inner.split_once(',').ok_or_else(|| {
                PlannerError::InputError(format!("malformed coordinate line: {coord_line}"))
            })?;
            let x = x_str
                .parse::<u16>()
                .map_err(|_| PlannerError::InputError(format!("bad coordinate: {coord_line}")))?;
            let y = y_str
                .parse::<u16>()
                .map_err(|_| PlannerError::InputError(format!("bad coordinate: {coord_line}")))?;
            path.push(Coord::new(x, y));
        }

        result.push((name.to_string(), path));
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_parse() {
        let agents = vec![Agent {
            id: 0,
            name: "robot0".to_string(),
            start: Coord::new(0, 0),
            goal: Coord::new(2, 0),
        }];
        let paths = vec![vec![Coord::new(0, 0), Coord::new(1, 0), Coord::new(2, 0)]];

        let dir = std::env::temp_dir().join(format!("cbs_mapf_test_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join("solution.txt");

        write_solution(&file, &agents, &paths).unwrap();
        let text = fs::read_to_string(&file).unwrap();
        assert!(text.contains("\r\n"));

        let parsed = parse_solution(&text).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].0, "robot0");
        assert_eq!(parsed[0].1, paths[0]);
    }
}
