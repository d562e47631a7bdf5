//! # flowrouting algorithms
//!
//! Lateral flow routing on raster elevation grids.
//!
//! ## Pipeline
//!
//! - **hydrology::partition**: per-cell outflow partition behind the [`FlowAlgorithm`](config::FlowAlgorithm) choice
//! - **hydrology::DrainageGraph**: inbound edges of every cell, built once
//! - **hydrology::delineate_basin / delineate_all**: contributing cells with travel-time moments and response kernels
//! - **hydrology::routing**: convolution of excess-water series into lateral inflow and outflow
//! - **numeric**: trapezoid, Simpson and Romberg quadrature
//! - **queue**: the bounded FIFO used by basin traversal

pub mod config;
pub mod hydrology;
pub(crate) mod maybe_rayon;
pub mod numeric;
pub mod queue;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{FlowAlgorithm, RoutingConfig, RoutingMethod};
    pub use crate::hydrology::{
        convolve, delineate_all, delineate_basin, lateral_inflow, lateral_outflow, Basin,
        BasinSet, ContributingCell, DrainageGraph, ElevationWindow, FlowPartition, Outflow,
        TravelStats,
    };
    pub use crate::numeric::{qromb, qsimp, qtrap};
    pub use crate::queue::BoundedQueue;
    pub use flowrouting_core::prelude::*;
}
