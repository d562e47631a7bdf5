//! Per-cell landscape parameters
//!
//! Routing reads elevation to build the drainage graph, and per-channel flow
//! speed and dispersion during basin delineation. The soil fields are carried
//! for the water-balance consumer downstream and are not interpreted here.

use crate::channel::PerChannel;
use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Raster};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Landscape state of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CellParameters {
    pub elevation: f64,
    pub slope_tangent: f64,
    pub depth: f64,
    pub saturation: f64,
    pub field_capacity: f64,
    pub wilting_point: f64,
    pub max_available_water: f64,
    pub saturated_conductivity: f64,
    /// Flow speed [m/s] per channel
    pub flow_speed: PerChannel<f64>,
    /// Dispersion coefficient [m²/s] per channel
    pub flow_dispersion: PerChannel<f64>,
}

/// Random-access store of [`CellParameters`] keyed by grid coordinate.
///
/// `get` returns `Ok(None)` for a null cell and an error for coordinates
/// outside the grid.
pub trait ParameterStore {
    /// (rows, cols)
    fn shape(&self) -> (usize, usize);

    /// Side of a square cell in map units
    fn resolution(&self) -> f64;

    fn get(&self, row: usize, col: usize) -> Result<Option<CellParameters>>;

    fn put(&mut self, row: usize, col: usize, params: CellParameters) -> Result<()>;

    fn rows(&self) -> usize {
        self.shape().0
    }

    fn cols(&self) -> usize {
        self.shape().1
    }

    /// Elevation of a cell, `None` when null or off the grid
    fn elevation(&self, row: usize, col: usize) -> Option<f64> {
        self.get(row, col).ok().flatten().map(|p| p.elevation)
    }
}

/// In-memory [`ParameterStore`] over a dense array
#[derive(Debug, Clone)]
pub struct ParameterGrid {
    cells: Array2<Option<CellParameters>>,
    transform: GeoTransform,
}

impl ParameterGrid {
    pub fn new(cells: Array2<Option<CellParameters>>, transform: GeoTransform) -> Self {
        Self { cells, transform }
    }

    /// Every non-null elevation cell gets `template` with its own elevation
    pub fn from_elevation(dem: &Raster<f64>, template: CellParameters) -> Self {
        let cells = dem.data().mapv(|z| {
            (!dem.is_nodata(z)).then_some(CellParameters {
                elevation: z,
                ..template
            })
        });
        Self::new(cells, *dem.transform())
    }

    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    /// Number of non-null cells
    pub fn valid_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Project one field into a raster, NaN for null cells
    pub fn to_raster(&self, field: impl Fn(&CellParameters) -> f64) -> Raster<f64> {
        let data = self
            .cells
            .map(|c| c.as_ref().map_or(f64::NAN, &field));
        let mut raster = Raster::from_array(data);
        raster.set_transform(self.transform);
        raster
    }

    fn check(&self, row: usize, col: usize) -> Result<()> {
        let (rows, cols) = self.cells.dim();
        if row >= rows || col >= cols {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows,
                cols,
            });
        }
        Ok(())
    }
}

impl ParameterStore for ParameterGrid {
    fn shape(&self) -> (usize, usize) {
        self.cells.dim()
    }

    fn resolution(&self) -> f64 {
        self.transform.cell_size()
    }

    fn get(&self, row: usize, col: usize) -> Result<Option<CellParameters>> {
        self.check(row, col)?;
        Ok(self.cells[[row, col]])
    }

    fn put(&mut self, row: usize, col: usize, params: CellParameters) -> Result<()> {
        self.check(row, col)?;
        self.cells[[row, col]] = Some(params);
        Ok(())
    }
}

/// Source of one parameter field: a uniform value or a raster
#[derive(Debug, Clone)]
pub enum Layer {
    Constant(f64),
    Raster(Raster<f64>),
}

impl Layer {
    /// Null raster cells read as NaN
    fn at(&self, row: usize, col: usize) -> f64 {
        match self {
            Layer::Constant(v) => *v,
            Layer::Raster(r) => r.value(row, col).unwrap_or(f64::NAN),
        }
    }

    fn check_shape(&self, dem: &Raster<f64>) -> Result<()> {
        match self {
            Layer::Constant(_) => Ok(()),
            Layer::Raster(r) => dem.check_shape(r),
        }
    }
}

impl From<f64> for Layer {
    fn from(v: f64) -> Self {
        Layer::Constant(v)
    }
}

impl From<Raster<f64>> for Layer {
    fn from(r: Raster<f64>) -> Self {
        Layer::Raster(r)
    }
}

/// Assembles a [`ParameterGrid`] from an elevation raster plus one layer per field.
///
/// Unset fields are zero. The grid takes its georeferencing and null mask
/// from the elevation raster.
#[derive(Debug, Clone)]
pub struct ParameterLayers {
    elevation: Raster<f64>,
    slope_tangent: Layer,
    depth: Layer,
    saturation: Layer,
    field_capacity: Layer,
    wilting_point: Layer,
    max_available_water: Layer,
    saturated_conductivity: Layer,
    flow_speed: PerChannel<Layer>,
    flow_dispersion: PerChannel<Layer>,
}

macro_rules! layer_setter {
    ($($name:ident => $field:ident),* $(,)?) => {$(
        pub fn $name(mut self, layer: impl Into<Layer>) -> Self {
            self.$field = layer.into();
            self
        }
    )*};
}

impl ParameterLayers {
    pub fn new(elevation: Raster<f64>) -> Self {
        let zero = || Layer::Constant(0.0);
        Self {
            elevation,
            slope_tangent: zero(),
            depth: zero(),
            saturation: zero(),
            field_capacity: zero(),
            wilting_point: zero(),
            max_available_water: zero(),
            saturated_conductivity: zero(),
            flow_speed: PerChannel::new(zero(), zero()),
            flow_dispersion: PerChannel::new(zero(), zero()),
        }
    }

    layer_setter! {
        slope_tangent => slope_tangent,
        depth => depth,
        saturation => saturation,
        field_capacity => field_capacity,
        wilting_point => wilting_point,
        max_available_water => max_available_water,
        saturated_conductivity => saturated_conductivity,
    }

    pub fn flow_speed(mut self, channel: crate::Channel, layer: impl Into<Layer>) -> Self {
        self.flow_speed[channel] = layer.into();
        self
    }

    pub fn flow_dispersion(mut self, channel: crate::Channel, layer: impl Into<Layer>) -> Self {
        self.flow_dispersion[channel] = layer.into();
        self
    }

    pub fn build(self) -> Result<ParameterGrid> {
        let dem = &self.elevation;
        for layer in [
            &self.slope_tangent,
            &self.depth,
            &self.saturation,
            &self.field_capacity,
            &self.wilting_point,
            &self.max_available_water,
            &self.saturated_conductivity,
        ]
        .into_iter()
        .chain(self.flow_speed.0.iter())
        .chain(self.flow_dispersion.0.iter())
        {
            layer.check_shape(dem)?;
        }

        let (rows, cols) = dem.shape();
        let cells = Array2::from_shape_fn((rows, cols), |(row, col)| {
            let elevation = dem.value(row, col)?;
            Some(CellParameters {
                elevation,
                slope_tangent: self.slope_tangent.at(row, col),
                depth: self.depth.at(row, col),
                saturation: self.saturation.at(row, col),
                field_capacity: self.field_capacity.at(row, col),
                wilting_point: self.wilting_point.at(row, col),
                max_available_water: self.max_available_water.at(row, col),
                saturated_conductivity: self.saturated_conductivity.at(row, col),
                flow_speed: PerChannel::new(
                    self.flow_speed.0[0].at(row, col),
                    self.flow_speed.0[1].at(row, col),
                ),
                flow_dispersion: PerChannel::new(
                    self.flow_dispersion.0[0].at(row, col),
                    self.flow_dispersion.0[1].at(row, col),
                ),
            })
        });

        Ok(ParameterGrid::new(cells, *dem.transform()))
    }
}
