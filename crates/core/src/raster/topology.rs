//! 8-connected grid topology
//!
//! Directions are indexed `0..8` counter-clockwise from east, 45° apart:
//!
//! ```text
//!   3  2  1        NW  N  NE
//!   4  .  0   =    W   .  E
//!   5  6  7        SW  S  SE
//! ```
//!
//! Row offsets grow southward, so north is `dy = -1`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of neighbours around an interior cell
pub const NEIGHBORS: usize = 8;

/// Row offsets for directions E, NE, N, NW, W, SW, S, SE
pub const DY: [isize; NEIGHBORS] = [0, -1, -1, -1, 0, 1, 1, 1];

/// Column offsets for directions E, NE, N, NW, W, SW, S, SE
pub const DX: [isize; NEIGHBORS] = [1, 1, 0, -1, -1, -1, 0, 1];

/// `(row, col)` offsets for directions E, NE, N, NW, W, SW, S, SE
pub const OFFSETS: [(isize, isize); NEIGHBORS] = [
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Effective contour width toward each neighbour, as a fraction of the cell size
pub const CONTOUR_LENGTH: [f64; NEIGHBORS] = [0.5, 0.354, 0.5, 0.354, 0.5, 0.354, 0.5, 0.354];

/// Short labels used in logs and debug output
pub const LABELS: [&str; NEIGHBORS] = ["E", "NE", "N", "NW", "W", "SW", "S", "SE"];

/// Direction pointing back at the sender
#[inline]
pub const fn opposite(dir: usize) -> usize {
    (dir + 4) % NEIGHBORS
}

/// Odd directions are diagonals
#[inline]
pub const fn is_diagonal(dir: usize) -> bool {
    dir % 2 == 1
}

/// Centre-to-centre distance toward `dir` on a grid of square cells
#[inline]
pub fn distance(dir: usize, resolution: f64) -> f64 {
    if is_diagonal(dir) {
        resolution * std::f64::consts::SQRT_2
    } else {
        resolution
    }
}

/// Azimuth of `dir` in radians, counter-clockwise from east
#[inline]
pub fn angle(dir: usize) -> f64 {
    dir as f64 * std::f64::consts::FRAC_PI_4
}

/// Whether signed candidate coordinates fall on a `rows x cols` grid
#[inline]
pub fn in_bounds(row: isize, col: isize, rows: usize, cols: usize) -> bool {
    row >= 0 && col >= 0 && (row as usize) < rows && (col as usize) < cols
}

/// The cell one step from `(row, col)` toward `dir`, if it exists
#[inline]
pub fn neighbor(row: usize, col: usize, dir: usize, rows: usize, cols: usize) -> Option<CellIndex> {
    let (dy, dx) = OFFSETS[dir];
    let r = row as isize + dy;
    let c = col as isize + dx;
    in_bounds(r, c, rows, cols).then(|| CellIndex::new(r as usize, c as usize))
}

/// A cell location on a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellIndex {
    pub row: usize,
    pub col: usize,
}

impl CellIndex {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn in_bounds(&self, rows: usize, cols: usize) -> bool {
        self.row < rows && self.col < cols
    }

    /// The neighbour toward `dir`, or `None` when it falls off a `rows x cols` grid
    pub fn neighbor(&self, dir: usize, rows: usize, cols: usize) -> Option<CellIndex> {
        neighbor(self.row, self.col, dir, rows, cols)
    }

    /// All in-bounds neighbours with their direction index
    pub fn neighbors(
        &self,
        rows: usize,
        cols: usize,
    ) -> impl Iterator<Item = (usize, CellIndex)> + '_ {
        (0..NEIGHBORS).filter_map(move |k| self.neighbor(k, rows, cols).map(|n| (k, n)))
    }

    /// Row-major linear offset
    pub fn linear(&self, cols: usize) -> usize {
        self.row * cols + self.col
    }
}

impl From<(usize, usize)> for CellIndex {
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}

impl fmt::Display for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
