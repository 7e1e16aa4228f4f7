//! Square sliding-tile grid with a single blank cell.

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};

/// Smallest supported side length.
pub const MIN_SIZE: usize = 2;
/// Largest supported side length (tiles are stored as `u8`).
pub const MAX_SIZE: usize = 15;

/// A square sliding-tile grid, row-major, with `0` as the blank.
///
/// Grids are immutable snapshots: [`Grid::apply`] builds a new grid rather
/// than mutating the receiver, so search nodes never alias state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    size: usize,
    cells: Vec<u8>,
    blank: usize,
}

/// A single tile slide, named for the direction the tile travels.
///
/// `Up` slides the tile *below* the blank upward, moving the blank one row
/// down. Likewise `Left` slides the tile to the blank's right leftward.
/// The generator and the scorer share this one convention; regression
/// tests in this module pin it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// All four moves in a fixed expansion order.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Row/column displacement of the blank for this move.
    fn blank_delta(self) -> (isize, isize) {
        match self {
            Move::Up => (1, 0),
            Move::Down => (-1, 0),
            Move::Left => (0, 1),
            Move::Right => (0, -1),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Move {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "up" => Ok(Move::Up),
            "down" => Ok(Move::Down),
            "left" => Ok(Move::Left),
            "right" => Ok(Move::Right),
            other => bail!("unknown move {:?}", other),
        }
    }
}

/// Join a move path with `-`, the dataset reference encoding.
pub fn format_path(path: &[Move]) -> String {
    path.iter()
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join("-")
}

/// Parse a `-`-joined move path. The empty string is the empty path.
pub fn parse_path(text: &str) -> Result<Vec<Move>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    text.split('-').map(|token| token.trim().parse()).collect()
}

impl Grid {
    /// Build a grid from rows, validating the tile set.
    ///
    /// Rows must form a square of side `MIN_SIZE..=MAX_SIZE` holding each
    /// value in `0..n²` exactly once (which guarantees a single blank).
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self> {
        let size = rows.len();
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            bail!("grid side must be {MIN_SIZE}..={MAX_SIZE}, got {size}");
        }
        let mut cells = Vec::with_capacity(size * size);
        for row in rows {
            if row.len() != size {
                bail!("grid must be square: row of {} cells in a {size}x{size} grid", row.len());
            }
            cells.extend_from_slice(row);
        }
        let mut seen = vec![false; size * size];
        for &cell in &cells {
            let value = cell as usize;
            if value >= size * size {
                bail!("tile {value} out of range for a {size}x{size} grid");
            }
            if seen[value] {
                bail!("duplicate tile {value}");
            }
            seen[value] = true;
        }
        let blank = cells
            .iter()
            .position(|&cell| cell == 0)
            .expect("validated grid contains a blank");
        Ok(Self { size, cells, blank })
    }

    /// The solved layout: tiles `1..n²-1` in order, blank at bottom-right.
    pub fn canonical(size: usize) -> Result<Self> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            bail!("grid side must be {MIN_SIZE}..={MAX_SIZE}, got {size}");
        }
        let mut cells: Vec<u8> = (1..(size * size) as u8).collect();
        cells.push(0);
        let blank = cells.len() - 1;
        Ok(Self { size, cells, blank })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// The grid as owned rows, for serialization into dataset records.
    pub fn rows(&self) -> Vec<Vec<u8>> {
        self.cells.chunks(self.size).map(<[u8]>::to_vec).collect()
    }

    /// Canonical dedup key: `#`-joined flattened values.
    ///
    /// Two grids with equal keys are the same search node.
    pub fn state_key(&self) -> String {
        self.cells
            .iter()
            .map(u8::to_string)
            .collect::<Vec<_>>()
            .join("#")
    }

    /// `(row, col)` of every tile value, indexed by value.
    pub fn tile_positions(&self) -> Vec<(usize, usize)> {
        let mut positions = vec![(0, 0); self.size * self.size];
        for (idx, &cell) in self.cells.iter().enumerate() {
            positions[cell as usize] = (idx / self.size, idx % self.size);
        }
        positions
    }

    /// Where the blank lands after `mv`, if it stays in bounds.
    fn blank_after(&self, mv: Move) -> Option<usize> {
        let (dr, dc) = mv.blank_delta();
        let row = (self.blank / self.size).checked_add_signed(dr)?;
        let col = (self.blank % self.size).checked_add_signed(dc)?;
        (row < self.size && col < self.size).then_some(row * self.size + col)
    }

    /// Apply a move, producing the successor grid.
    ///
    /// Returns `None` when the move would take the blank out of bounds.
    pub fn apply(&self, mv: Move) -> Option<Grid> {
        let target = self.blank_after(mv)?;
        let mut cells = self.cells.clone();
        cells.swap(self.blank, target);
        Some(Grid {
            size: self.size,
            cells,
            blank: target,
        })
    }

    /// The bounds-checked subset of the four moves.
    pub fn legal_moves(&self) -> impl Iterator<Item = Move> + '_ {
        Move::ALL
            .into_iter()
            .filter(|&mv| self.blank_after(mv).is_some())
    }
}

impl fmt::Display for Grid {
    /// Bracketed rows, the layout used in instruction prompts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, row) in self.cells.chunks(self.size).enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            let joined = row.iter().map(u8::to_string).collect::<Vec<_>>().join(" ");
            write!(f, "[{joined}]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[u8]]) -> Grid {
        let rows: Vec<Vec<u8>> = rows.iter().map(|row| row.to_vec()).collect();
        Grid::from_rows(&rows).expect("valid grid")
    }

    #[test]
    fn canonical_places_blank_bottom_right() {
        let g = Grid::canonical(3).expect("canonical");
        assert_eq!(g.rows(), vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 0]]);
        assert_eq!(g.state_key(), "1#2#3#4#5#6#7#8#0");
    }

    #[test]
    fn from_rows_rejects_bad_grids() {
        assert!(Grid::from_rows(&[vec![1, 2], vec![3, 0], vec![4, 5]]).is_err());
        assert!(Grid::from_rows(&[vec![1, 2], vec![3, 4]]).is_err()); // no blank
        assert!(Grid::from_rows(&[vec![0, 0], vec![1, 2]]).is_err()); // duplicate
        assert!(Grid::from_rows(&[vec![0, 9], vec![1, 2]]).is_err()); // out of range
        assert!(Grid::from_rows(&[vec![0]]).is_err()); // too small
    }

    /// Pins the direction convention: a move names the tile's travel
    /// direction, so the blank moves the opposite way.
    #[test]
    fn move_convention_is_tile_travel_direction() {
        let start = grid(&[&[1, 2, 3], &[4, 0, 6], &[7, 5, 8]]);

        let up = start.apply(Move::Up).expect("up");
        assert_eq!(up.rows(), vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 0, 8]]);

        let down = start.apply(Move::Down).expect("down");
        assert_eq!(down.rows(), vec![vec![1, 0, 3], vec![4, 2, 6], vec![7, 5, 8]]);

        let left = start.apply(Move::Left).expect("left");
        assert_eq!(left.rows(), vec![vec![1, 2, 3], vec![4, 6, 0], vec![7, 5, 8]]);

        let right = start.apply(Move::Right).expect("right");
        assert_eq!(right.rows(), vec![vec![1, 2, 3], vec![0, 4, 6], vec![7, 5, 8]]);
    }

    /// The documented worked example: `left-left` solves this grid.
    #[test]
    fn left_left_solves_the_prompt_example() {
        let start = grid(&[&[1, 2, 3], &[4, 5, 6], &[0, 7, 8]]);
        let once = start.apply(Move::Left).expect("first left");
        let twice = once.apply(Move::Left).expect("second left");
        assert_eq!(twice, Grid::canonical(3).expect("canonical"));
    }

    #[test]
    fn apply_out_of_bounds_is_none() {
        let solved = Grid::canonical(2).expect("canonical");
        // Blank is bottom-right; no tile below or to its right.
        assert!(solved.apply(Move::Up).is_none());
        assert!(solved.apply(Move::Left).is_none());
        assert!(solved.apply(Move::Down).is_some());
        assert!(solved.apply(Move::Right).is_some());
    }

    #[test]
    fn legal_moves_match_apply() {
        let corner = Grid::canonical(3).expect("canonical");
        let legal: Vec<Move> = corner.legal_moves().collect();
        assert_eq!(legal, vec![Move::Down, Move::Right]);
    }

    #[test]
    fn path_round_trips_through_text() {
        let path = vec![Move::Up, Move::Left, Move::Down, Move::Right];
        let text = format_path(&path);
        assert_eq!(text, "up-left-down-right");
        assert_eq!(parse_path(&text).expect("parse"), path);
        assert!(parse_path("").expect("empty").is_empty());
        assert!(parse_path("up-sideways").is_err());
    }

    #[test]
    fn display_matches_prompt_layout() {
        let g = Grid::canonical(2).expect("canonical");
        assert_eq!(g.to_string(), "[1 2]\n[3 0]");
    }
}
