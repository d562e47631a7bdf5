//! Adaptive MFD (Qin et al. 2007), "MFD-md"
//!
//! Same weighting as [`MfdParams`](super::flow_direction_mfd::MfdParams),
//! but the convergence exponent is chosen per cell from the maximum
//! downslope gradient:
//!
//! ```text
//!   p = min(8.9 · tanMax + 1.1, 10)    tanMax < 1
//!   p = 10                              otherwise
//! ```
//!
//! Gentle terrain disperses, steep terrain concentrates.
//!
//! Reference:
//! Qin, C. et al. (2007). An adaptive approach to selecting a flow-partition
//! exponent for a multiple-flow-direction algorithm. *International Journal
//! of Geographical Information Science*, 21(4), 443–458.

use super::flow_direction_mfd::contour_weighted;
use super::partition::{ElevationWindow, FlowPartition, Outflow};

/// Parameters for adaptive MFD
#[derive(Debug, Clone, Copy)]
pub struct AdaptiveMfdParams {
    /// Slope of the exponent in the maximum gradient. Default: 8.9
    pub scale_factor: f64,
    /// Exponent at zero gradient. Default: 1.1
    pub offset: f64,
    /// Exponent cap, also used once the maximum gradient reaches 1. Default: 10.0
    pub max_exponent: f64,
}

impl Default for AdaptiveMfdParams {
    fn default() -> Self {
        Self {
            scale_factor: 8.9,
            offset: 1.1,
            max_exponent: 10.0,
        }
    }
}

impl AdaptiveMfdParams {
    /// Exponent for a cell whose steepest downslope gradient is `max_gradient`
    pub fn exponent(&self, max_gradient: f64) -> f64 {
        if max_gradient < 1.0 {
            (self.scale_factor * max_gradient + self.offset).min(self.max_exponent)
        } else {
            self.max_exponent
        }
    }
}

impl FlowPartition for AdaptiveMfdParams {
    fn partition(&self, window: &ElevationWindow, resolution: f64) -> Outflow {
        let gradients = window.downslope_gradients(resolution);
        let max_gradient = gradients.iter().copied().fold(0.0_f64, f64::max);
        contour_weighted(&gradients, self.exponent(max_gradient))
    }
}
