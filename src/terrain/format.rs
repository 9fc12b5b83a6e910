//! Plain-text terrain format
//!
//! One row per line, space-separated tile values in {0, 1, 2, 3}. The number
//! of rows is the height and the number of values per row is the width.

use std::fmt::Write as _;
use std::path::Path;

use crate::core::error::{GameError, Result};
use crate::terrain::grid::TileGrid;
use crate::terrain::tile::TileType;

/// Parse terrain text into a new grid
///
/// Lines and columns in errors are 1-based. Trailing blank lines are ignored;
/// a blank line between rows is an error.
pub fn parse(content: &str, tile_size: u32) -> Result<TileGrid> {
    let lines: Vec<&str> = content.trim_end().lines().collect();
    if lines.is_empty() || lines.iter().all(|l| l.trim().is_empty()) {
        return Err(parse_error(1, 1, "terrain file is empty"));
    }

    let mut rows = Vec::with_capacity(lines.len());
    let mut width = None;

    for (line_idx, line) in lines.iter().enumerate() {
        let mut row = Vec::new();
        for (col_idx, token) in line.split_whitespace().enumerate() {
            let value: i32 = token.parse().map_err(|_| {
                parse_error(line_idx + 1, col_idx + 1, format!("'{}' is not an integer", token))
            })?;
            let tile = TileType::from_value(value).map_err(|_| {
                parse_error(line_idx + 1, col_idx + 1, format!("{} is not a tile type", value))
            })?;
            row.push(tile);
        }

        if row.is_empty() {
            return Err(parse_error(line_idx + 1, 1, "empty row"));
        }
        match width {
            None => width = Some(row.len()),
            Some(w) if w != row.len() => {
                return Err(parse_error(
                    line_idx + 1,
                    row.len().min(w) + 1,
                    format!("row has {} tiles, expected {}", row.len(), w),
                ));
            }
            Some(_) => {}
        }
        rows.push(row);
    }

    TileGrid::from_rows(rows, tile_size)
}

/// Render a grid in the text format
pub fn to_text(grid: &TileGrid) -> String {
    let mut out = String::with_capacity((grid.width() as usize * 2) * grid.height() as usize);
    for row in grid.rows() {
        let line: Vec<String> = row.iter().map(|t| t.value().to_string()).collect();
        // Writing to a String cannot fail
        let _ = writeln!(out, "{}", line.join(" "));
    }
    out
}

/// Read a terrain file from disk
pub fn read_file(path: &Path, tile_size: u32) -> Result<TileGrid> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => GameError::NotFound(path.to_path_buf()),
        _ => GameError::Io(e),
    })?;
    parse(&content, tile_size)
}

/// Write a terrain file to disk
pub fn write_file(grid: &TileGrid, path: &Path) -> Result<()> {
    std::fs::write(path, to_text(grid))?;
    Ok(())
}

fn parse_error(line: usize, column: usize, message: impl Into<String>) -> GameError {
    GameError::ParseError {
        line,
        column,
        message: message.into(),
    }
}
