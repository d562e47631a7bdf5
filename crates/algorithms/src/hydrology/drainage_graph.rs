//! Weighted 8-connected drainage graph
//!
//! Built once from the elevation field and read-only afterwards. Edges are
//! stored on the *receiving* cell: when cell X sends a portion `w` toward its
//! neighbour N in direction `k`, N records
//!
//! ```text
//!   N.portion[opposite(k)]  = w
//!   N.upstream[opposite(k)] = X
//! ```
//!
//! so a traversal standing at N finds every upstream cell and its edge weight
//! without searching. Every edge points to a strictly lower cell, so the graph
//! is acyclic.

use crate::config::FlowAlgorithm;
use crate::hydrology::partition::ElevationWindow;
use flowrouting_core::raster::topology::{self, NEIGHBORS};
use flowrouting_core::{CellIndex, Error, GeoTransform, ParameterStore, Raster, Result};
use ndarray::Array2;
use tracing::{debug, info};

/// Inbound edges of one cell
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CellLinks {
    /// `portion[k]`: fraction of the outflow of the cell at direction `k`
    /// that this cell receives
    pub portion: [f64; NEIGHBORS],
    /// `upstream[k]`: the cell at direction `k`, when it drains into this one
    pub upstream: [Option<CellIndex>; NEIGHBORS],
}

impl CellLinks {
    /// `(direction, upstream cell, portion)` for every inbound edge
    pub fn upstream_edges(&self) -> impl Iterator<Item = (usize, CellIndex, f64)> + '_ {
        self.upstream
            .iter()
            .enumerate()
            .filter_map(|(k, up)| up.map(|cell| (k, cell, self.portion[k])))
    }

    pub fn upstream_count(&self) -> usize {
        self.upstream.iter().filter(|u| u.is_some()).count()
    }
}

/// Arena of [`CellLinks`] addressed by grid coordinate
#[derive(Debug, Clone)]
pub struct DrainageGraph {
    links: Array2<CellLinks>,
    transform: GeoTransform,
    algorithm: FlowAlgorithm,
}

impl DrainageGraph {
    /// Sweep the grid row-major once and register every positive portion on
    /// its receiving neighbour.
    ///
    /// Null cells neither send nor receive. `convergence` is the exponent
    /// for MFD8 and MFDInf and is ignored by the other algorithms.
    pub fn build<S: ParameterStore + ?Sized>(
        store: &S,
        algorithm: FlowAlgorithm,
        convergence: f64,
    ) -> Result<Self> {
        let (rows, cols) = store.shape();
        let resolution = store.resolution();
        if resolution.is_nan() || resolution <= 0.0 {
            return Err(Error::invalid_parameter(
                "resolution",
                resolution,
                "cell size must be positive",
            ));
        }

        let partitioner = algorithm.partitioner(convergence);
        let mut links = Array2::from_elem((rows, cols), CellLinks::default());
        let mut edges = 0usize;
        let mut sinks = 0usize;

        for row in 0..rows {
            for col in 0..cols {
                let Some(window) = ElevationWindow::from_store(store, row, col)? else {
                    continue;
                };

                let outflow = partitioner.partition(&window, resolution);
                if outflow.is_sink() {
                    sinks += 1;
                    continue;
                }

                let source = CellIndex::new(row, col);
                for (k, w) in outflow.edges() {
                    // Partitions only send to neighbours present in the window
                    let Some(n) = topology::neighbor(row, col, k, rows, cols) else {
                        continue;
                    };
                    let back = topology::opposite(k);
                    let target = &mut links[[n.row, n.col]];
                    target.portion[back] = w;
                    target.upstream[back] = Some(source);
                    edges += 1;
                }
            }
        }

        info!(
            "Drainage graph ({}): {}x{} cells, {} edges, {} sinks",
            algorithm, rows, cols, edges, sinks
        );
        debug!(resolution, convergence, "graph parameters");

        Ok(Self {
            links,
            transform: GeoTransform::with_resolution(resolution),
            algorithm,
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        self.links.dim()
    }

    pub fn resolution(&self) -> f64 {
        self.transform.cell_size()
    }

    pub fn algorithm(&self) -> FlowAlgorithm {
        self.algorithm
    }

    /// Inbound edges of a cell, `None` off the grid
    pub fn links(&self, row: usize, col: usize) -> Option<&CellLinks> {
        self.links.get((row, col))
    }

    /// Portions this cell sends toward each direction, rebuilt from its
    /// neighbours' inbound records
    pub fn outflow(&self, row: usize, col: usize) -> [f64; NEIGHBORS] {
        let (rows, cols) = self.shape();
        let me = CellIndex::new(row, col);
        std::array::from_fn(|k| {
            topology::neighbor(row, col, k, rows, cols)
                .and_then(|n| self.links.get((n.row, n.col)))
                .filter(|l| l.upstream[topology::opposite(k)] == Some(me))
                .map_or(0.0, |l| l.portion[topology::opposite(k)])
        })
    }

    /// Number of cells draining directly into `(row, col)`
    pub fn upstream_count(&self, row: usize, col: usize) -> usize {
        self.links(row, col).map_or(0, CellLinks::upstream_count)
    }

    pub fn edge_count(&self) -> usize {
        self.links.iter().map(CellLinks::upstream_count).sum()
    }

    /// Direct upstream neighbour counts as a raster
    pub fn upstream_count_raster(&self) -> Raster<f64> {
        let mut out = Raster::from_array(self.links.map(|l| l.upstream_count() as f64));
        out.set_transform(self.transform);
        out
    }

    pub fn set_transform(&mut self, transform: GeoTransform) {
        self.transform = transform;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowrouting_core::{CellParameters, ParameterGrid};

    fn grid(rows: usize, cols: usize, z: impl Fn(usize, usize) -> f64) -> ParameterGrid {
        let mut dem = Raster::new(rows, cols);
        dem.set_transform(GeoTransform::with_resolution(10.0));
        for r in 0..rows {
            for c in 0..cols {
                dem.set(r, c, z(r, c)).unwrap();
            }
        }
        ParameterGrid::from_elevation(&dem, CellParameters::default())
    }

    #[test]
    fn test_receiver_side_storage() {
        // Slopes down to the east
        let store = grid(3, 3, |_, c| 10.0 - c as f64);
        let g = DrainageGraph::build(&store, FlowAlgorithm::D8, 5.0).unwrap();

        // (1,1) sends east to (1,2); (1,2) holds it in its W slot
        let links = g.links(1, 2).unwrap();
        assert_eq!(links.upstream[4], Some(CellIndex::new(1, 1)));
        assert_eq!(links.portion[4], 1.0);

        let out = g.outflow(1, 1);
        assert_eq!(out[0], 1.0);
        assert_eq!(out.iter().sum::<f64>(), 1.0);
    }

    #[test]
    fn test_flat_grid_has_no_edges() {
        let store = grid(4, 4, |_, _| 7.0);
        for algorithm in FlowAlgorithm::ALL {
            let g = DrainageGraph::build(&store, algorithm, 5.0).unwrap();
            assert_eq!(g.edge_count(), 0, "{} built edges on a flat", algorithm);
        }
    }

    #[test]
    fn test_outflow_sums_to_one() {
        let store = grid(6, 6, |r, c| {
            let (x, y) = (c as f64 - 2.3, r as f64 - 3.1);
            100.0 + 0.4 * x * x + 0.7 * y * y + 0.3 * x
        });
        for algorithm in FlowAlgorithm::ALL {
            let g = DrainageGraph::build(&store, algorithm, 5.0).unwrap();
            for r in 0..6 {
                for c in 0..6 {
                    let total: f64 = g.outflow(r, c).iter().sum();
                    assert!(
                        total == 0.0 || (total - 1.0).abs() < 1e-9,
                        "{} at ({}, {}) sends {}",
                        algorithm,
                        r,
                        c,
                        total
                    );
                }
            }
        }
    }

    #[test]
    fn test_edges_point_downhill() {
        let store = grid(5, 5, |r, c| ((r * 7 + c * 3) % 5) as f64 + 0.1 * r as f64);
        for algorithm in FlowAlgorithm::ALL {
            let g = DrainageGraph::build(&store, algorithm, 3.0).unwrap();
            for r in 0..5 {
                for c in 0..5 {
                    let z = store.elevation(r, c).unwrap();
                    for (_, up, _) in g.links(r, c).unwrap().upstream_edges() {
                        assert!(store.elevation(up.row, up.col).unwrap() > z);
                    }
                }
            }
        }
    }

    #[test]
    fn test_null_cells_are_isolated() {
        let mut dem = Raster::from_vec(vec![3.0, 2.0, 1.0, 3.0, f64::NAN, 1.0], 2, 3).unwrap();
        dem.set_transform(GeoTransform::with_resolution(1.0));
        let store = ParameterGrid::from_elevation(&dem, CellParameters::default());

        let g = DrainageGraph::build(&store, FlowAlgorithm::MFD8, 5.0).unwrap();
        assert_eq!(g.upstream_count(1, 1), 0);
        assert_eq!(g.outflow(1, 1), [0.0; 8]);
        assert!(g.upstream_count(0, 2) > 0);
    }
}
