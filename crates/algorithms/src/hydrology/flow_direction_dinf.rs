//! D-infinity (D∞) flow direction
//!
//! A continuous downslope angle is taken from the 3×3 Horn gradient. The
//! angle falls in one 45° sector, and the cell's water is split between the
//! sector's two bounding neighbours in proportion to angular proximity.
//!
//! Falls back to [`D8`](super::flow_direction::D8) when the angle is
//! undefined (flat stencil), when the stencil is incomplete, or when a
//! receiving neighbour is not strictly below the cell.
//!
//! Reference:
//! Tarboton, D.G. (1997). A new method for the determination of flow
//! directions and upslope areas in grid digital elevation models.
//! *Water Resources Research*, 33(2), 309–319.

use super::flow_direction::D8;
use super::partition::{ElevationWindow, FlowPartition, Outflow};
use std::f64::consts::{FRAC_PI_4, TAU};

/// Tarboton's D∞ partition
#[derive(Debug, Clone, Copy, Default)]
pub struct DInf;

impl FlowPartition for DInf {
    fn partition(&self, window: &ElevationWindow, resolution: f64) -> Outflow {
        match sector_split(window, resolution) {
            Some(out) => out,
            None => D8.partition(window, resolution),
        }
    }
}

/// Downslope azimuth in radians, counter-clockwise from east, in `[0, 2π)`.
///
/// `None` when a neighbour is missing or the stencil is flat.
pub fn downslope_angle(window: &ElevationWindow, resolution: f64) -> Option<f64> {
    let mut e = [0.0; 8];
    for (slot, z) in e.iter_mut().zip(window.neighbors) {
        *slot = z?;
    }
    let [east, ne, north, nw, west, sw, south, se] = e;

    let dzdx = ((ne + 2.0 * east + se) - (nw + 2.0 * west + sw)) / (8.0 * resolution);
    let dzdy = ((nw + 2.0 * north + ne) - (sw + 2.0 * south + se)) / (8.0 * resolution);

    if dzdx == 0.0 && dzdy == 0.0 {
        return None;
    }

    Some((-dzdy).atan2(-dzdx).rem_euclid(TAU))
}

fn sector_split(window: &ElevationWindow, resolution: f64) -> Option<Outflow> {
    let angle = downslope_angle(window, resolution)?;

    // rem_euclid can round up to exactly 2π for tiny negative angles
    let k = ((angle / FRAC_PI_4).floor() as usize).min(7);
    let frac = ((angle - k as f64 * FRAC_PI_4) / FRAC_PI_4).clamp(0.0, 1.0);
    let kk = (k + 1) % 8;

    let mut portion = [0.0; 8];
    portion[k] = 1.0 - frac;
    portion[kk] += frac;

    let receivers_lower = (0..8).all(|d| portion[d] <= 0.0 || window.is_lower(d));
    receivers_lower.then_some(Outflow { portion })
}
