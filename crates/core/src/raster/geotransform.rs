//! North-up georeferencing for rasters

use serde::{Deserialize, Serialize};

/// Origin and pixel size of a north-up grid.
///
/// ```text
/// x = origin_x + col * pixel_width
/// y = origin_y + row * pixel_height
/// ```
///
/// `pixel_height` is negative for the usual top-down row order. The routing
/// code only consumes [`GeoTransform::cell_size`], which is the grid
/// resolution used for inter-cell distances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    pub origin_x: f64,
    pub origin_y: f64,
    pub pixel_width: f64,
    pub pixel_height: f64,
}

impl GeoTransform {
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
        }
    }

    /// Square cells of side `resolution` anchored at the origin
    pub fn with_resolution(resolution: f64) -> Self {
        Self::new(0.0, 0.0, resolution, -resolution)
    }

    /// Cell size (assumes square cells)
    pub fn cell_size(&self) -> f64 {
        self.pixel_width.abs()
    }

    /// Centre of a cell in map coordinates
    pub fn cell_center(&self, row: usize, col: usize) -> (f64, f64) {
        (
            self.origin_x + (col as f64 + 0.5) * self.pixel_width,
            self.origin_y + (row as f64 + 0.5) * self.pixel_height,
        )
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::with_resolution(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_size_ignores_sign() {
        let gt = GeoTransform::new(100.0, 200.0, 25.0, -25.0);
        assert_eq!(gt.cell_size(), 25.0);
    }

    #[test]
    fn test_cell_center() {
        let gt = GeoTransform::new(0.0, 100.0, 10.0, -10.0);
        assert_eq!(gt.cell_center(0, 0), (5.0, 95.0));
        assert_eq!(gt.cell_center(2, 3), (35.0, 75.0));
    }
}
