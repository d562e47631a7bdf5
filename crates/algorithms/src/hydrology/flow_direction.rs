//! D8 flow direction
//!
//! Sends all of a cell's water to its steepest downslope neighbour.
//!
//! Reference:
//! O'Callaghan, J.F. & Mark, D.M. (1984). The extraction of drainage networks
//! from digital elevation data. *Computer Vision, Graphics and Image
//! Processing*, 28, 323–344.

use super::partition::{ElevationWindow, FlowPartition, Outflow};

/// Deterministic eight-neighbour flow direction
#[derive(Debug, Clone, Copy, Default)]
pub struct D8;

impl FlowPartition for D8 {
    fn partition(&self, window: &ElevationWindow, resolution: f64) -> Outflow {
        match steepest_descent(window, resolution) {
            Some(dir) => Outflow::single(dir),
            None => Outflow::sink(),
        }
    }
}

/// Direction of the maximum strictly positive gradient.
///
/// Ties keep the first direction in E, NE, N, ... order. `None` for a pit or
/// a flat.
pub fn steepest_descent(window: &ElevationWindow, resolution: f64) -> Option<usize> {
    let mut max_drop = 0.0_f64;
    let mut best = None;

    for k in 0..8 {
        if let Some(drop) = window.gradient(k, resolution) {
            if drop > max_drop {
                max_drop = drop;
                best = Some(k);
            }
        }
    }

    best
}
