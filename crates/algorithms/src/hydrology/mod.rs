//! Hydrological routing on an elevation grid
//!
//! - Flow direction: D8, D∞, MFD8, MFDmd and MFD∞ partitions of each cell's outflow
//! - Drainage graph: receiver-side inbound edges built once per grid
//! - Basin: upstream traversal accumulating travel-time moments per channel
//! - Unit response: inverse-Gaussian arrival densities
//! - Routing: convolution of excess-water series through those responses

pub mod partition;

mod basin;
mod drainage_graph;
mod flow_direction;
mod flow_direction_dinf;
mod flow_direction_mfd;
mod flow_direction_mfd_adaptive;
mod flow_direction_mfd_inf;
mod routing;
mod unit_response;

pub use basin::{
    celerity, delineate_all, delineate_basin, Basin, BasinSet, ChannelState, ContributingCell,
    SURFACE_CELERITY_FACTOR,
};
pub use drainage_graph::{CellLinks, DrainageGraph};
pub use flow_direction::{steepest_descent, D8};
pub use flow_direction_dinf::{downslope_angle, DInf};
pub use flow_direction_mfd::{MfdParams, DEFAULT_CONVERGENCE};
pub use flow_direction_mfd_adaptive::AdaptiveMfdParams;
pub use flow_direction_mfd_inf::{facet, Facet, MfdInfParams};
pub use partition::{ElevationWindow, FlowPartition, Outflow};
pub use routing::{convolve, lateral_inflow, lateral_outflow};
pub use unit_response::{
    cell_outlet_density, cell_outlet_response, flow_path_density, flow_path_response, TravelStats,
};
