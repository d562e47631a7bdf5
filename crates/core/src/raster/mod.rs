//! Raster data structures and grid topology

mod element;
mod geotransform;
mod grid;
pub mod topology;

pub use element::RasterElement;
pub use geotransform::GeoTransform;
pub use grid::{Raster, RasterStatistics};
pub use topology::CellIndex;
