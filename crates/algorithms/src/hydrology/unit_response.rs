//! Unit response densities for travel-time distributions
//!
//! Both are inverse-Gaussian forms of the advection–dispersion equation.
//! The flow-path response describes the arrival-time density at an outlet
//! of water released at an upstream cell, given the mean `μ` and variance
//! `σ²` of its travel time:
//!
//! ```text
//!   U(t) = 1 / (σ √(2π t³ / μ³)) · exp(-(t - μ)² / (2 σ² t / μ))
//! ```
//!
//! The cell-outlet response releases water held in one cell of side `l`:
//!
//! ```text
//!   u(t) = l / (2 √(π σ² t³)) · exp(-(μ t - l)² / (4 σ² t))
//! ```
//!
//! Here `μ` is a celerity and `σ²` a dispersion coefficient.
//!
//! Reference:
//! Liu, Y.B. et al. (2003). A diffusive transport approach for flow routing
//! in GIS-based flood modeling. *Journal of Hydrology*, 283, 91–106.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Travel-time moments along one flow path
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TravelStats {
    pub mean: f64,
    pub variance: f64,
}

/// Flow-path density at time `t`; zero for `t ≤ 0`.
///
/// `variance` must be positive.
pub fn flow_path_density(mean: f64, variance: f64, t: f64) -> f64 {
    debug_assert!(variance > 0.0, "flow-path variance must be positive");
    if t <= 0.0 {
        return 0.0;
    }
    let sigma = variance.sqrt();
    let norm = 1.0 / (sigma * (2.0 * PI * t.powi(3) / mean.powi(3)).sqrt());
    norm * (-(t - mean).powi(2) / (2.0 * variance * t / mean)).exp()
}

/// Cell-outlet density at time `t` for a cell of side `length`; zero for `t ≤ 0`.
///
/// `variance` must be positive.
pub fn cell_outlet_density(mean: f64, variance: f64, length: f64, t: f64) -> f64 {
    debug_assert!(variance > 0.0, "cell-outlet dispersion must be positive");
    if t <= 0.0 {
        return 0.0;
    }
    let norm = length / (2.0 * (PI * variance * t.powi(3)).sqrt());
    norm * (-(mean * t - length).powi(2) / (4.0 * variance * t)).exp()
}

/// [`flow_path_density`] at integer time step `t`
pub fn flow_path_response(stats: TravelStats, t: usize) -> f64 {
    flow_path_density(stats.mean, stats.variance, t as f64)
}

/// [`cell_outlet_density`] at integer time step `t`
pub fn cell_outlet_response(stats: TravelStats, length: f64, t: usize) -> f64 {
    cell_outlet_density(stats.mean, stats.variance, length, t as f64)
}
