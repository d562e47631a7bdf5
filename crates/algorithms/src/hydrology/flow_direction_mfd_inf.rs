//! Triangular multiple flow direction (MFD-∞)
//!
//! The neighbourhood is cut into eight triangular facets, each spanned by the
//! centre and two adjacent neighbours `(k, k+1)`. A facet's slope and aspect
//! come from the normal of the plane through its three vertices:
//!
//! ```text
//!   v_k = (dx_k · l, -dy_k · l, z_k - z0)
//!   n   = v_k × v_{k+1}
//!   s   = |n_xy| / n_z,   aspect = atan2(n_y, n_x)
//! ```
//!
//! Facet weights `s^p` are normalised over the cell, and each facet's share is
//! split linearly between its two bounding directions by where the aspect
//! falls inside the 45° wedge. A facet whose aspect leaves the wedge, or
//! points at a neighbour that is not below the cell, drains along its steeper
//! bounding edge instead.
//!
//! Reference:
//! Seibert, J. & McGlynn, B.L. (2007). A new triangular multiple flow
//! direction algorithm for computing upslope areas from gridded digital
//! elevation models. *Water Resources Research*, 43, W04501.

use super::flow_direction_mfd::DEFAULT_CONVERGENCE;
use super::partition::{ElevationWindow, FlowPartition, Outflow};
use flowrouting_core::raster::topology::{distance, DX, DY};
use std::f64::consts::{FRAC_PI_4, TAU};

/// Parameters for triangular MFD
#[derive(Debug, Clone, Copy)]
pub struct MfdInfParams {
    /// Convergence exponent applied to facet slopes
    pub exponent: f64,
}

impl Default for MfdInfParams {
    fn default() -> Self {
        Self {
            exponent: DEFAULT_CONVERGENCE,
        }
    }
}

/// Slope and position of one facet's drainage line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Facet {
    /// Tangent of the facet slope along its drainage line
    pub slope: f64,
    /// Angle from direction `k` toward `k+1`, within [0, π/4]
    pub offset: f64,
}

impl FlowPartition for MfdInfParams {
    fn partition(&self, window: &ElevationWindow, resolution: f64) -> Outflow {
        let mut portion = [0.0; 8];

        let facets: [Option<Facet>; 8] = std::array::from_fn(|k| facet(window, k, resolution));

        for (k, f) in facets.iter().enumerate() {
            let Some(f) = f else { continue };
            let w = f.slope.powf(self.exponent);
            let to_next = f.offset / FRAC_PI_4;
            portion[k] += w * (1.0 - to_next);
            portion[(k + 1) % 8] += w * to_next;
        }

        Outflow::normalized(portion)
    }
}

/// Drainage line of facet `(k, k+1)`, `None` when the facet carries no water
pub fn facet(window: &ElevationWindow, k: usize, resolution: f64) -> Option<Facet> {
    let kk = (k + 1) % 8;
    let z0 = window.center;

    let edge = |dir: usize, offset: f64| {
        let slope = window.gradient(dir, resolution)?;
        (slope > 0.0).then_some(Facet { slope, offset })
    };

    let (zk, zkk) = match (window.neighbors[k], window.neighbors[kk]) {
        (Some(a), Some(b)) => (a, b),
        // Only one bounding neighbour on the grid: drain along it if lower
        (Some(_), None) => return edge(k, 0.0),
        (None, Some(_)) => return edge(kk, FRAC_PI_4),
        (None, None) => return None,
    };

    if !(z0 > zk || z0 > zkk) {
        return None;
    }

    let (x1, y1, z1) = (DX[k] as f64 * resolution, -DY[k] as f64 * resolution, zk - z0);
    let (x2, y2, z2) = (DX[kk] as f64 * resolution, -DY[kk] as f64 * resolution, zkk - z0);

    let nx = y1 * z2 - z1 * y2;
    let ny = z1 * x2 - x1 * z2;
    let nz = x1 * y2 - y1 * x2;

    let aspect = ny.atan2(nx).rem_euclid(TAU);
    let offset = (aspect - k as f64 * FRAC_PI_4).rem_euclid(TAU);
    let inside = offset <= FRAC_PI_4;

    if inside && z0 > zk && z0 > zkk {
        let slope = (nx * nx + ny * ny).sqrt() / nz;
        return (slope > 0.0).then_some(Facet { slope, offset });
    }

    // Pin to the steeper bounding edge
    let dz1 = (z0 - zk) / distance(k, resolution);
    let dz2 = (z0 - zkk) / distance(kk, resolution);
    if dz1 > dz2 {
        edge(k, 0.0)
    } else {
        edge(kk, FRAC_PI_4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plane(a: f64, b: f64, res: f64) -> ElevationWindow {
        let n: [f64; 8] =
            std::array::from_fn(|k| 100.0 + a * DX[k] as f64 * res - b * DY[k] as f64 * res);
        ElevationWindow::full(100.0, n)
    }

    #[test]
    fn test_facet_normal_on_plane() {
        // Downslope toward 30°: facet 0 (E-NE) holds the aspect
        let t = 30f64.to_radians();
        let w = plane(-t.cos(), -t.sin(), 10.0);
        let f = facet(&w, 0, 10.0).unwrap();

        assert!((f.slope - 1.0).abs() < 1e-9, "slope {}", f.slope);
        assert!((f.offset - t).abs() < 1e-9);
    }

    #[test]
    fn test_plane_favours_aspect_neighbors() {
        let t = 30f64.to_radians();
        let w = plane(-t.cos(), -t.sin(), 1.0);
        let out = MfdInfParams::default().partition(&w, 1.0);

        assert!((out.total() - 1.0).abs() < 1e-9);
        // NE and E collect most of the water, NE more
        assert!(out.portion[1] > out.portion[0]);
        assert!(out.portion[0] > out.portion[2]);
        for (d, _) in out.edges() {
            assert!(w.is_lower(d));
        }
    }

    #[test]
    fn test_flat_and_pit_are_sinks() {
        let p = MfdInfParams::default();
        assert!(p.partition(&ElevationWindow::full(5.0, [5.0; 8]), 1.0).is_sink());
        assert!(p.partition(&ElevationWindow::full(1.0, [3.0; 8]), 1.0).is_sink());
    }

    #[test]
    fn test_missing_neighbor_drains_single_edge() {
        let mut n = [Some(12.0); 8];
        n[0] = Some(9.0);
        n[1] = None;
        let w = ElevationWindow::new(10.0, n);

        let f = facet(&w, 0, 1.0).unwrap();
        assert_eq!(f.offset, 0.0);
        assert!((f.slope - 1.0).abs() < 1e-12);

        let out = MfdInfParams::default().partition(&w, 1.0);
        assert_eq!(out, Outflow::single(0));
    }

    #[test]
    fn test_upslope_bound_pins_to_edge() {
        // Only E is lower; the E-NE facet must not send water to NE
        let w = ElevationWindow::full(10.0, [9.0, 10.5, 11.0, 11.0, 11.0, 11.0, 11.0, 10.2]);
        let out = MfdInfParams::default().partition(&w, 1.0);

        assert!((out.total() - 1.0).abs() < 1e-9);
        assert_eq!(out.portion[1], 0.0);
        assert_eq!(out.portion[7], 0.0);
        assert!((out.portion[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_only_lower_neighbors_receive() {
        let w = ElevationWindow::full(10.0, [9.0, 7.0, 8.0, 13.0, 12.0, 14.0, 11.0, 6.0]);
        let out = MfdInfParams { exponent: 1.0 }.partition(&w, 10.0);

        assert!((out.total() - 1.0).abs() < 1e-9);
        for (d, _) in out.edges() {
            assert!(w.is_lower(d));
        }
    }
}
