//! Shared types for flow-direction algorithms
//!
//! Every algorithm sees a cell through its [`ElevationWindow`] and answers
//! with an [`Outflow`]: the fraction of the cell's water sent toward each of
//! the eight neighbours, in the direction order of
//! [`flowrouting_core::raster::topology`].

use flowrouting_core::raster::topology::{self, NEIGHBORS};
use flowrouting_core::{ParameterStore, Result};

/// Elevations of a cell and its 3×3 neighbourhood.
///
/// A neighbour is `None` when it lies off the grid or is a null cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationWindow {
    pub center: f64,
    pub neighbors: [Option<f64>; NEIGHBORS],
}

impl ElevationWindow {
    pub fn new(center: f64, neighbors: [Option<f64>; NEIGHBORS]) -> Self {
        Self { center, neighbors }
    }

    /// Window of an interior cell with all neighbours known
    pub fn full(center: f64, neighbors: [f64; NEIGHBORS]) -> Self {
        Self::new(center, neighbors.map(Some))
    }

    /// Read the window around `(row, col)`; `None` when the cell itself is null
    pub fn from_store<S: ParameterStore + ?Sized>(
        store: &S,
        row: usize,
        col: usize,
    ) -> Result<Option<Self>> {
        let Some(center) = store.get(row, col)?.map(|p| p.elevation) else {
            return Ok(None);
        };
        let (rows, cols) = store.shape();
        let mut neighbors = [None; NEIGHBORS];
        for (k, slot) in neighbors.iter_mut().enumerate() {
            *slot = topology::neighbor(row, col, k, rows, cols)
                .and_then(|n| store.elevation(n.row, n.col));
        }
        Ok(Some(Self { center, neighbors }))
    }

    /// Downslope gradient `(z0 - zk) / distance(k)`, `None` for a missing neighbour
    #[inline]
    pub fn gradient(&self, dir: usize, resolution: f64) -> Option<f64> {
        self.neighbors[dir].map(|z| (self.center - z) / topology::distance(dir, resolution))
    }

    /// Neighbour `dir` exists and is strictly lower than the centre
    #[inline]
    pub fn is_lower(&self, dir: usize) -> bool {
        self.neighbors[dir].is_some_and(|z| z < self.center)
    }

    /// Strictly positive gradients, zero elsewhere
    pub fn downslope_gradients(&self, resolution: f64) -> [f64; NEIGHBORS] {
        std::array::from_fn(|k| {
            self.gradient(k, resolution)
                .filter(|g| *g > 0.0)
                .unwrap_or(0.0)
        })
    }

    pub fn is_complete(&self) -> bool {
        self.neighbors.iter().all(Option::is_some)
    }
}

/// Fraction of a cell's outflow sent toward each neighbour.
///
/// Either all zeros (a sink) or non-negative and summing to one.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Outflow {
    pub portion: [f64; NEIGHBORS],
}

impl Outflow {
    /// No outgoing edge
    pub fn sink() -> Self {
        Self::default()
    }

    /// All water toward `dir`
    pub fn single(dir: usize) -> Self {
        let mut portion = [0.0; NEIGHBORS];
        portion[dir] = 1.0;
        Self { portion }
    }

    /// Scale non-negative weights to sum to one; all-zero weights give a sink
    pub fn normalized(weights: [f64; NEIGHBORS]) -> Self {
        let sum: f64 = weights.iter().sum();
        if sum <= 0.0 || !sum.is_finite() {
            return Self::sink();
        }
        Self {
            portion: weights.map(|w| w / sum),
        }
    }

    pub fn is_sink(&self) -> bool {
        self.portion.iter().all(|&p| p <= 0.0)
    }

    pub fn total(&self) -> f64 {
        self.portion.iter().sum()
    }

    /// Directions carrying a strictly positive portion
    pub fn edges(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.portion
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, p)| p > 0.0)
    }
}

/// A rule splitting a cell's outflow among its neighbours
pub trait FlowPartition {
    fn partition(&self, window: &ElevationWindow, resolution: f64) -> Outflow;
}
