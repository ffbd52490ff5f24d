//! Grid file parser and writer. Format per SPEC_FULL.md §6.1: each line is a
//! row of `'0'` (blocked) / `'1'` (passable) characters, trailing CR
//! tolerated, ragged rows right-padded with blocked cells, empty file and
//! stray characters are fatal `InputError`s. The writer is the inverse,
//! grounded on `original_source/MS_Project/World.cpp`'s `print_world`.

use std::fs;
use std::path::Path;

use crate::agent::Coord;
use crate::error::{PlannerError, PlannerResult};
use crate::grid::Grid;

pub fn load_grid(path: impl AsRef<Path>) -> PlannerResult<Grid> {
    let text = fs::read_to_string(path.as_ref())
        .map_err(|e| PlannerError::InputError(format!("cannot read grid file: {e}")))?;
    parse_grid(&text)
}

pub fn save_grid(path: impl AsRef<Path>, grid: &Grid) -> PlannerResult<()> {
    fs::write(path.as_ref(), write_grid(grid))
        .map_err(|e| PlannerError::InputError(format!("cannot write grid file: {e}")))
}

/// Renders `grid` back into the same `'0'`/`'1'` text format `parse_grid`
/// reads, one row per line, no trailing blank line.
pub fn write_grid(grid: &Grid) -> String {
    let mut text = String::with_capacity(grid.width() * grid.height() + grid.height());
    for y in 0..grid.height() {
        if y > 0 {
            text.push('\n');
        }
        for x in 0..grid.width() {
            let coord = Coord::new(x as u16, y as u16);
            text.push(if grid.passable(coord) { '1' } else { '0' });
        }
    }
    text
}

pub fn parse_grid(text: &str) -> PlannerResult<Grid> {
    let rows: Vec<&str> = text
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    if rows.is_empty() || rows.iter().all(|r| r.is_empty()) {
        return Err(PlannerError::InputError("grid file is empty".to_string()));
    }

    let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    let height = rows.len();
    let mut grid = Grid::new(width, height);

    for (y, row) in rows.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            match ch {
                '1' => grid.set_passable(x, y, true),
                '0' => grid.set_passable(x, y, false),
                other => {
                    return Err(PlannerError::InputError(format!(
                        "invalid grid character '{other}' at row {y}, column {x}"
                    )))
                }
            }
        }
        // Rows shorter than `width` are already blocked by Grid::new's default.
    }

    Ok(grid)
}
