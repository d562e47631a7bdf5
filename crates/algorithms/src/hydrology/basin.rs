//! Basin delineation and travel-time accumulation
//!
//! For an outlet cell, a breadth-first traversal follows the drainage graph's
//! inbound edges upstream and records, for every contributing cell and each
//! routed channel, the travel time to the outlet together with the mean and
//! variance of the travel-time distribution. Per hop of length `d` from a
//! downstream node with speed `v` and dispersion `D`:
//!
//! ```text
//!   t'  = t  + d / v
//!   μ'  = μ  + d / c
//!   σ²' = σ² + 2 D d / c³
//! ```
//!
//! where the celerity `c` is `5/3 · v` on the surface (kinematic wave) and
//! `v` below it. A channel stops at its drainage-time horizon.
//!
//! A cell reached again by a strictly faster path takes the new moments for
//! that channel. The improvement is not pushed further upstream to cells
//! already discovered through it.

use crate::config::RoutingConfig;
use crate::hydrology::drainage_graph::DrainageGraph;
use crate::hydrology::unit_response::{flow_path_density, flow_path_response, TravelStats};
use crate::maybe_rayon::*;
use crate::numeric::qromb;
use crate::queue::BoundedQueue;
use flowrouting_core::raster::topology;
use flowrouting_core::{
    CellIndex, Channel, Error, GeoTransform, ParameterStore, PerChannel, Raster, Result,
};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// Kinematic-wave ratio of surface celerity to flow speed
pub const SURFACE_CELERITY_FACTOR: f64 = 5.0 / 3.0;

/// Wave celerity for a flow speed on `channel`
pub fn celerity(channel: Channel, speed: f64) -> f64 {
    match channel {
        Channel::Surface => SURFACE_CELERITY_FACTOR * speed,
        Channel::Subsurface => speed,
    }
}

/// Path state of one cell on one channel
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChannelState {
    pub visited: bool,
    /// Travel time to the outlet along the recorded path [s]
    pub travel_time: f64,
    /// Mean of the travel-time distribution [s]
    pub mean: f64,
    /// Variance of the travel-time distribution [s²]
    pub variance: f64,
    /// Fraction of this cell's outflow entering the recorded path
    pub portion: f64,
}

impl ChannelState {
    pub fn stats(&self) -> TravelStats {
        TravelStats {
            mean: self.mean,
            variance: self.variance,
        }
    }
}

/// One cell draining into an outlet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContributingCell {
    pub cell: CellIndex,
    /// Edges on the path behind the most recently relaxed channel state
    pub hops: usize,
    pub channels: PerChannel<ChannelState>,
}

impl ContributingCell {
    pub fn visited(&self, channel: Channel) -> bool {
        self.channels[channel].visited
    }

    /// Arrival density at the outlet at time step `t`, zero when not visited
    pub fn response(&self, channel: Channel, t: usize) -> f64 {
        let state = &self.channels[channel];
        if !state.visited {
            return 0.0;
        }
        flow_path_response(state.stats(), t)
    }

    /// Share of a unit release that has reached the outlet by `until`
    pub fn response_mass(&self, channel: Channel, until: f64) -> Result<f64> {
        let state = &self.channels[channel];
        if !state.visited || until <= 0.0 {
            return Ok(0.0);
        }
        qromb(
            |t| flow_path_density(state.mean, state.variance, t),
            0.0,
            until,
        )
    }
}

/// Contributing cells and response kernels of one outlet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Basin {
    pub outlet: CellIndex,
    /// Contributing cells in discovery order, outlet excluded
    pub contributing: Vec<ContributingCell>,
    pub contributing_counts: PerChannel<usize>,
    /// Sum of the contributing cells' portions
    pub drained_area: PerChannel<f64>,
    /// `kernel[c][i]` is the area-weighted unit response at time step `i + 1`
    pub kernel: PerChannel<Vec<f64>>,
}

impl Basin {
    /// Kernel value at time step `t` (1-based), zero outside the kernel
    pub fn kernel_at(&self, channel: Channel, t: usize) -> f64 {
        t.checked_sub(1)
            .and_then(|i| self.kernel[channel].get(i))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn cells(&self, channel: Channel) -> impl Iterator<Item = &ContributingCell> {
        self.contributing.iter().filter(move |c| c.visited(channel))
    }
}

#[derive(Debug, Clone, Copy)]
struct TraversalNode {
    cell: CellIndex,
    hops: usize,
    channels: PerChannel<ChannelState>,
}

/// Per-hop coefficients read at the downstream cell
#[derive(Debug, Clone, Copy, Default)]
struct HopRates {
    speed: f64,
    celerity: f64,
    dispersion: f64,
}

fn hop_rates<S: ParameterStore + ?Sized>(
    store: &S,
    node: &TraversalNode,
    config: &RoutingConfig,
) -> Result<Option<PerChannel<HopRates>>> {
    let Some(params) = store.get(node.cell.row, node.cell.col)? else {
        return Ok(None);
    };

    let mut rates = PerChannel::splat(HopRates::default());
    for channel in config.method.channels() {
        if !node.channels[channel].visited {
            continue;
        }
        let speed = params.flow_speed[channel];
        let dispersion = params.flow_dispersion[channel];
        if speed.is_nan() || speed <= 0.0 {
            return Err(Error::invalid_parameter(
                "flow_speed",
                speed,
                format!("{} speed at {} must be positive", channel, node.cell),
            ));
        }
        if dispersion.is_nan() || dispersion <= 0.0 {
            return Err(Error::invalid_parameter(
                "flow_dispersion",
                dispersion,
                format!("{} dispersion at {} must be positive", channel, node.cell),
            ));
        }
        rates[channel] = HopRates {
            speed,
            celerity: celerity(channel, speed),
            dispersion,
        };
    }
    Ok(Some(rates))
}

/// Delineate the basin draining into `outlet`.
///
/// Fails on a non-positive speed or dispersion met on a routed channel, or
/// when the traversal frontier outgrows `config.queue_capacity`.
pub fn delineate_basin<S: ParameterStore + ?Sized>(
    graph: &DrainageGraph,
    store: &S,
    outlet: CellIndex,
    config: &RoutingConfig,
) -> Result<Basin> {
    let (rows, cols) = graph.shape();
    if !outlet.in_bounds(rows, cols) {
        return Err(Error::IndexOutOfBounds {
            row: outlet.row,
            col: outlet.col,
            rows,
            cols,
        });
    }

    let resolution = graph.resolution();

    let mut root = TraversalNode {
        cell: outlet,
        hops: 0,
        channels: PerChannel::splat(ChannelState::default()),
    };
    for channel in config.method.channels() {
        root.channels[channel] = ChannelState {
            visited: true,
            portion: 1.0,
            ..Default::default()
        };
    }

    let mut arena = vec![root];
    let mut discovered: HashMap<CellIndex, usize> = HashMap::from([(outlet, 0)]);
    let mut queue = BoundedQueue::new(config.queue_capacity);
    let mut order = Vec::new();
    queue.enqueue(0)?;

    while !queue.is_empty() {
        let current = queue.dequeue()?;
        order.push(current);
        let node = arena[current];

        let Some(links) = graph.links(node.cell.row, node.cell.col) else {
            continue;
        };
        if links.upstream_count() == 0 {
            continue;
        }
        let Some(rates) = hop_rates(store, &node, config)? else {
            continue;
        };

        for (k, upstream, portion) in links.upstream_edges() {
            let d = topology::distance(k, resolution);

            let mut candidate = PerChannel::splat(ChannelState::default());
            let mut reaches = false;
            for channel in config.method.channels() {
                let here = &node.channels[channel];
                if !here.visited {
                    continue;
                }
                let r = rates[channel];
                let travel_time = here.travel_time + d / r.speed;
                if travel_time > config.drainage_times[channel] {
                    continue;
                }
                candidate[channel] = ChannelState {
                    visited: true,
                    travel_time,
                    mean: here.mean + d / r.celerity,
                    variance: here.variance + 2.0 * r.dispersion * d / r.celerity.powi(3),
                    portion,
                };
                reaches = true;
            }
            if !reaches {
                continue;
            }

            match discovered.get(&upstream) {
                None => {
                    let index = arena.len();
                    arena.push(TraversalNode {
                        cell: upstream,
                        hops: node.hops + 1,
                        channels: candidate,
                    });
                    discovered.insert(upstream, index);
                    queue.enqueue(index)?;
                }
                Some(&index) => {
                    let existing = &mut arena[index];
                    let mut relaxed = false;
                    for channel in config.method.channels() {
                        let found = candidate[channel];
                        let known = &mut existing.channels[channel];
                        if found.visited && (!known.visited || found.travel_time < known.travel_time)
                        {
                            *known = found;
                            relaxed = true;
                        }
                    }
                    if relaxed {
                        existing.hops = node.hops + 1;
                    }
                }
            }
        }
    }

    let contributing: Vec<ContributingCell> = order
        .into_iter()
        .skip(1)
        .map(|i| arena[i])
        .filter(|n| Channel::ALL.iter().any(|&c| n.channels[c].visited))
        .map(|n| ContributingCell {
            cell: n.cell,
            hops: n.hops,
            channels: n.channels,
        })
        .collect();

    let mut contributing_counts = PerChannel::splat(0usize);
    let mut drained_area = PerChannel::splat(0.0);
    for cell in &contributing {
        for channel in Channel::ALL {
            if cell.visited(channel) {
                contributing_counts[channel] += 1;
                drained_area[channel] += cell.channels[channel].portion;
            }
        }
    }

    let kernel = PerChannel::new(
        response_kernel(&contributing, Channel::Surface, drained_area, config.time_steps),
        response_kernel(&contributing, Channel::Subsurface, drained_area, config.time_steps),
    );

    debug!(
        "Basin {}: {} surface / {} subsurface cells",
        outlet,
        contributing_counts[Channel::Surface],
        contributing_counts[Channel::Subsurface]
    );

    Ok(Basin {
        outlet,
        contributing,
        contributing_counts,
        drained_area,
        kernel,
    })
}

fn response_kernel(
    cells: &[ContributingCell],
    channel: Channel,
    drained_area: PerChannel<f64>,
    time_steps: usize,
) -> Vec<f64> {
    let area = drained_area[channel];
    if area <= 0.0 {
        return vec![0.0; time_steps];
    }
    (1..=time_steps)
        .map(|t| {
            cells
                .iter()
                .filter(|c| c.visited(channel))
                .map(|c| c.channels[channel].portion * c.response(channel, t))
                .sum::<f64>()
                / area
        })
        .collect()
}

/// Basins of every cell of a grid
#[derive(Debug, Clone)]
pub struct BasinSet {
    shape: (usize, usize),
    transform: GeoTransform,
    time_steps: usize,
    basins: Vec<Option<Basin>>,
}

impl BasinSet {
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    pub fn time_steps(&self) -> usize {
        self.time_steps
    }

    /// Basin of `(row, col)`, `None` for a null cell or off the grid
    pub fn get(&self, row: usize, col: usize) -> Option<&Basin> {
        let (rows, cols) = self.shape;
        if row >= rows || col >= cols {
            return None;
        }
        self.basins[row * cols + col].as_ref()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Basin> {
        self.basins.iter().flatten()
    }

    pub fn set_transform(&mut self, transform: GeoTransform) {
        self.transform = transform;
    }

    fn to_raster(&self, value: impl Fn(&Basin) -> f64) -> Raster<f64> {
        let (rows, cols) = self.shape;
        let data = Array2::from_shape_fn((rows, cols), |(row, col)| {
            self.basins[row * cols + col]
                .as_ref()
                .map_or(f64::NAN, &value)
        });
        let mut raster = Raster::from_array(data);
        raster.set_transform(self.transform);
        raster.set_nodata(Some(f64::NAN));
        raster
    }

    /// Number of contributing cells per outlet on `channel`; NaN for null cells
    pub fn contributing_count_raster(&self, channel: Channel) -> Raster<f64> {
        self.to_raster(|b| b.contributing_counts[channel] as f64)
    }

    /// Kernel value at time step `t` (1-based) per outlet
    pub fn kernel_raster(&self, channel: Channel, t: usize) -> Result<Raster<f64>> {
        if t == 0 || t > self.time_steps {
            return Err(Error::invalid_parameter(
                "time step",
                t,
                format!("must lie in [1, {}]", self.time_steps),
            ));
        }
        Ok(self.to_raster(|b| b.kernel_at(channel, t)))
    }
}

/// Delineate the basin of every non-null cell.
///
/// Basins are independent, so with the `parallel` feature they are computed
/// on the rayon pool; the first error aborts the run.
pub fn delineate_all<S: ParameterStore + Sync + ?Sized>(
    graph: &DrainageGraph,
    store: &S,
    config: &RoutingConfig,
) -> Result<BasinSet> {
    config.validate()?;
    let (rows, cols) = graph.shape();
    if store.shape() != (rows, cols) {
        let (ar, ac) = store.shape();
        return Err(Error::SizeMismatch {
            er: rows,
            ec: cols,
            ar,
            ac,
        });
    }

    let basins: Vec<Option<Basin>> = (0..rows * cols)
        .into_par_iter()
        .map(|i| {
            let (row, col) = (i / cols, i % cols);
            if store.get(row, col)?.is_none() {
                return Ok(None);
            }
            delineate_basin(graph, store, CellIndex::new(row, col), config).map(Some)
        })
        .collect::<Result<Vec<_>>>()?;

    let (surface, subsurface) = basins.iter().flatten().fold((0, 0), |(s, ss), b| {
        (
            s + b.contributing_counts[Channel::Surface],
            ss + b.contributing_counts[Channel::Subsurface],
        )
    });
    info!(
        "Delineated {} basins ({}): {} surface and {} subsurface contributions",
        basins.iter().flatten().count(),
        config.method,
        surface,
        subsurface
    );

    Ok(BasinSet {
        shape: (rows, cols),
        transform: GeoTransform::with_resolution(graph.resolution()),
        time_steps: config.time_steps,
        basins,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FlowAlgorithm, RoutingMethod};
    use flowrouting_core::{CellParameters, ParameterGrid, ParameterLayers};

    fn store(z: &[f64], rows: usize, cols: usize, speed: f64, dispersion: f64) -> ParameterGrid {
        let mut dem = Raster::from_vec(z.to_vec(), rows, cols).unwrap();
        dem.set_transform(GeoTransform::with_resolution(10.0));
        ParameterGrid::from_elevation(
            &dem,
            CellParameters {
                flow_speed: PerChannel::splat(speed),
                flow_dispersion: PerChannel::splat(dispersion),
                ..Default::default()
            },
        )
    }

    fn config(method: RoutingMethod) -> RoutingConfig {
        RoutingConfig {
            algorithm: FlowAlgorithm::D8,
            method,
            time_steps: 5,
            ..Default::default()
        }
    }

    #[test]
    fn test_line_accumulates_per_hop() {
        let s = store(&[1.0, 2.0, 3.0, 4.0], 1, 4, 0.5, 2.0);
        let g = DrainageGraph::build(&s, FlowAlgorithm::D8, 5.0).unwrap();
        let basin = delineate_basin(
            &g,
            &s,
            CellIndex::new(0, 0),
            &config(RoutingMethod::SubsurfaceAccount),
        )
        .unwrap();

        assert_eq!(basin.contributing.len(), 3);
        assert_eq!(basin.contributing_counts[Channel::Subsurface], 3);
        assert_eq!(basin.contributing_counts[Channel::Surface], 0);

        let far = basin.contributing[2];
        assert_eq!(far.cell, CellIndex::new(0, 3));
        assert_eq!(far.hops, 3);
        let st = far.channels[Channel::Subsurface];
        assert!((st.travel_time - 60.0).abs() < 1e-9);
        assert!((st.mean - 60.0).abs() < 1e-9);
        assert!((st.variance - 3.0 * 2.0 * 2.0 * 10.0 / 0.125).abs() < 1e-9);
    }

    #[test]
    fn test_surface_uses_kinematic_celerity() {
        let s = store(&[1.0, 2.0], 1, 2, 0.3, 1.0);
        let g = DrainageGraph::build(&s, FlowAlgorithm::D8, 5.0).unwrap();
        let basin =
            delineate_basin(&g, &s, CellIndex::new(0, 0), &config(RoutingMethod::SurfaceAccount))
                .unwrap();

        let st = basin.contributing[0].channels[Channel::Surface];
        let c = 0.5;
        assert!((st.travel_time - 10.0 / 0.3).abs() < 1e-9);
        assert!((st.mean - 10.0 / c).abs() < 1e-9);
        assert!((st.variance - 2.0 * 10.0 / (c * c * c)).abs() < 1e-9);
    }

    #[test]
    fn test_outlet_excluded_and_kernel_normalised() {
        let s = store(&[1.0, 2.0, 3.0, 4.0], 1, 4, 1.0, 1.0);
        let g = DrainageGraph::build(&s, FlowAlgorithm::D8, 5.0).unwrap();
        let basin = delineate_basin(
            &g,
            &s,
            CellIndex::new(0, 0),
            &config(RoutingMethod::FullAccount),
        )
        .unwrap();

        assert!(basin.contributing.iter().all(|c| c.cell != basin.outlet));
        assert_eq!(basin.drained_area[Channel::Surface], 3.0);
        assert_eq!(basin.kernel[Channel::Surface].len(), 5);

        let manual: f64 = basin
            .contributing
            .iter()
            .map(|c| c.response(Channel::Surface, 2))
            .sum::<f64>()
            / 3.0;
        assert!((basin.kernel_at(Channel::Surface, 2) - manual).abs() < 1e-12);
        assert_eq!(basin.kernel_at(Channel::Surface, 0), 0.0);
        assert_eq!(basin.kernel_at(Channel::Surface, 6), 0.0);
    }

    #[test]
    fn test_headwater_has_empty_basin() {
        let s = store(&[1.0, 2.0, 3.0], 1, 3, 1.0, 1.0);
        let g = DrainageGraph::build(&s, FlowAlgorithm::D8, 5.0).unwrap();
        let basin = delineate_basin(
            &g,
            &s,
            CellIndex::new(0, 2),
            &config(RoutingMethod::FullAccount),
        )
        .unwrap();

        assert!(basin.contributing.is_empty());
        assert_eq!(basin.kernel[Channel::Subsurface], vec![0.0; 5]);
    }

    #[test]
    fn test_zero_speed_is_rejected() {
        let s = store(&[1.0, 2.0], 1, 2, 0.0, 1.0);
        let g = DrainageGraph::build(&s, FlowAlgorithm::D8, 5.0).unwrap();
        let err = delineate_basin(
            &g,
            &s,
            CellIndex::new(0, 0),
            &config(RoutingMethod::FullAccount),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "flow_speed", .. }));
    }

    #[test]
    fn test_queue_too_small() {
        // Pit in the middle: eight upstream cells in one frontier
        let mut z = vec![5.0; 9];
        z[4] = 1.0;
        let s = store(&z, 3, 3, 1.0, 1.0);
        let g = DrainageGraph::build(&s, FlowAlgorithm::D8, 5.0).unwrap();
        let cfg = RoutingConfig {
            queue_capacity: 4,
            ..config(RoutingMethod::FullAccount)
        };
        let err = delineate_basin(&g, &s, CellIndex::new(1, 1), &cfg).unwrap_err();
        assert!(matches!(err, Error::QueueOverflow { capacity: 4 }));
    }

    #[test]
    fn test_response_mass_approaches_one() {
        let s = store(&[1.0, 2.0, 3.0], 1, 3, 1.0, 1.0);
        let g = DrainageGraph::build(&s, FlowAlgorithm::D8, 5.0).unwrap();
        let basin = delineate_basin(
            &g,
            &s,
            CellIndex::new(0, 0),
            &config(RoutingMethod::SubsurfaceAccount),
        )
        .unwrap();

        let far = basin.contributing[1];
        let mass = far.response_mass(Channel::Subsurface, 400.0).unwrap();
        assert!((mass - 1.0).abs() < 1e-3, "mass {}", mass);
        assert_eq!(far.response_mass(Channel::Surface, 400.0).unwrap(), 0.0);
    }

    #[test]
    fn test_delineate_all_rasters() {
        let s = store(&[1.0, 2.0, 3.0, 4.0], 1, 4, 1.0, 1.0);
        let g = DrainageGraph::build(&s, FlowAlgorithm::D8, 5.0).unwrap();
        let set = delineate_all(&g, &s, &config(RoutingMethod::FullAccount)).unwrap();

        let counts = set.contributing_count_raster(Channel::Surface);
        let values: Vec<f64> = (0..4).map(|c| counts.get(0, c).unwrap()).collect();
        assert_eq!(values, vec![3.0, 2.0, 1.0, 0.0]);

        assert!(set.kernel_raster(Channel::Surface, 1).is_ok());
        assert!(set.kernel_raster(Channel::Surface, 6).is_err());
        assert_eq!(set.get(0, 1).unwrap().contributing.len(), 2);
        assert!(set.get(0, 4).is_none());
    }

    /// 2x2 slope draining to (1,1), subsurface speed given per cell
    fn corner_store(speed: [f64; 4]) -> ParameterGrid {
        let mut dem = Raster::from_vec(vec![3.0, 2.0, 2.0, 1.0], 2, 2).unwrap();
        dem.set_transform(GeoTransform::with_resolution(10.0));
        let mut speeds = Raster::from_vec(speed.to_vec(), 2, 2).unwrap();
        speeds.set_transform(GeoTransform::with_resolution(10.0));
        ParameterLayers::new(dem)
            .flow_speed(Channel::Surface, 1.0)
            .flow_speed(Channel::Subsurface, speeds)
            .flow_dispersion(Channel::Surface, 1.0)
            .flow_dispersion(Channel::Subsurface, 1.0)
            .build()
            .unwrap()
    }

    fn portion_from(graph: &DrainageGraph, receiver: CellIndex, sender: CellIndex) -> f64 {
        let links = graph.links(receiver.row, receiver.col).unwrap();
        let k = (0..8).find(|&k| links.upstream[k] == Some(sender)).unwrap();
        links.portion[k]
    }

    fn corner_basin(speed: [f64; 4]) -> (DrainageGraph, ContributingCell) {
        let s = corner_store(speed);
        let g = DrainageGraph::build(&s, FlowAlgorithm::MFD8, 1.1).unwrap();
        let cfg = RoutingConfig {
            algorithm: FlowAlgorithm::MFD8,
            ..config(RoutingMethod::SubsurfaceAccount)
        };
        let basin = delineate_basin(&g, &s, CellIndex::new(1, 1), &cfg).unwrap();
        assert_eq!(basin.contributing.len(), 3);
        let corner = *basin
            .contributing
            .iter()
            .find(|c| c.cell == CellIndex::new(0, 0))
            .unwrap();
        (g, corner)
    }

    #[test]
    fn test_faster_detour_replaces_first_discovery() {
        // Slow outlet: the diagonal hop costs 10√2 / 0.1 ≈ 141, while the
        // detour through the fast (0,1) costs 10 / 0.1 + 10 / 10 = 101
        let (g, corner) = corner_basin([1.0, 10.0, 1.0, 0.1]);
        let st = corner.channels[Channel::Subsurface];

        assert!((st.travel_time - 101.0).abs() < 1e-9);
        assert!((st.mean - 101.0).abs() < 1e-9);
        assert!((st.variance - (2.0 * 10.0 / 0.001 + 2.0 * 10.0 / 1000.0)).abs() < 1e-6);
        let via_fast = portion_from(&g, CellIndex::new(0, 1), CellIndex::new(0, 0));
        assert_eq!(st.portion, via_fast);
        assert_ne!(
            st.portion,
            portion_from(&g, CellIndex::new(1, 1), CellIndex::new(0, 0))
        );
        assert_eq!(corner.hops, 2);
    }

    #[test]
    fn test_slower_revisit_keeps_first_discovery() {
        // Uniform speed: the diagonal (≈14.1 s) beats both detours (20 s)
        let (g, corner) = corner_basin([1.0; 4]);
        let st = corner.channels[Channel::Subsurface];

        let diagonal = 10.0 * std::f64::consts::SQRT_2;
        assert!((st.travel_time - diagonal).abs() < 1e-9);
        assert!((st.mean - diagonal).abs() < 1e-9);
        assert!((st.variance - 2.0 * diagonal).abs() < 1e-9);
        assert_eq!(
            st.portion,
            portion_from(&g, CellIndex::new(1, 1), CellIndex::new(0, 0))
        );
        assert_eq!(corner.hops, 1);
    }
}
