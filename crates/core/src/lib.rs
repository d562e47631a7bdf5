//! # flowrouting core
//!
//! Core types and I/O for the flowrouting workspace.
//!
//! This crate provides:
//! - `Raster<T>`: generic raster grid with a no-data sentinel
//! - `topology`: the 8-connected neighbourhood shared by every algorithm
//! - `Channel` / `PerChannel`: the surface and subsurface flow processes
//! - `ParameterStore`: random-access per-cell landscape parameters
//! - Native GeoTIFF reading and writing

pub mod channel;
pub mod error;
pub mod io;
pub mod params;
pub mod raster;

pub use channel::{Channel, PerChannel};
pub use error::{Error, Result};
pub use params::{CellParameters, Layer, ParameterGrid, ParameterLayers, ParameterStore};
pub use raster::{CellIndex, GeoTransform, Raster, RasterElement};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::channel::{Channel, PerChannel};
    pub use crate::error::{Error, Result};
    pub use crate::params::{CellParameters, Layer, ParameterGrid, ParameterLayers, ParameterStore};
    pub use crate::raster::topology;
    pub use crate::raster::{CellIndex, GeoTransform, Raster, RasterElement};
}
