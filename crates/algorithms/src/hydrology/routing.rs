//! Lateral routing of excess-water series through unit responses
//!
//! A series holds the excess water released at each time step. Water released
//! at step `m` arrives at step `n ≥ m` weighted by the response at lag
//! `n - m + 1`, so every output is a discrete convolution:
//!
//! ```text
//!   out[n] = Σ_{m ≤ n} excess[m] · U(n - m + 1)
//! ```

use crate::hydrology::basin::Basin;
use crate::hydrology::unit_response::{cell_outlet_response, flow_path_response, TravelStats};
use flowrouting_core::{CellIndex, Channel, Error, Result};

fn convolve_with(excess: &[f64], response: impl Fn(usize) -> f64) -> Vec<f64> {
    let lags: Vec<f64> = (1..=excess.len()).map(&response).collect();
    (0..excess.len())
        .map(|n| {
            excess[..=n]
                .iter()
                .enumerate()
                .filter(|(_, e)| **e != 0.0)
                .map(|(m, e)| e * lags[n - m])
                .sum()
        })
        .collect()
}

/// Convolve `excess` with a response kernel whose entry `i` is lag `i + 1`.
///
/// Lags past the end of the kernel contribute nothing. The output has the
/// length of `excess`.
pub fn convolve(kernel: &[f64], excess: &[f64]) -> Vec<f64> {
    convolve_with(excess, |lag| kernel.get(lag - 1).copied().unwrap_or(0.0))
}

/// Water arriving at the outlet of `basin` from its upstream cells on
/// `channel`, over `len` time steps.
///
/// `excess_of` yields the release series of a contributing cell; cells it
/// returns `None` for contribute nothing, and series shorter than `len` are
/// padded with zeros.
pub fn lateral_inflow<'a>(
    basin: &Basin,
    channel: Channel,
    len: usize,
    excess_of: impl Fn(CellIndex) -> Option<&'a [f64]>,
) -> Vec<f64> {
    let mut inflow = vec![0.0; len];
    for cell in basin.cells(channel) {
        let Some(series) = excess_of(cell.cell) else {
            continue;
        };
        let state = cell.channels[channel];
        let mut padded = series[..series.len().min(len)].to_vec();
        padded.resize(len, 0.0);

        let routed = convolve_with(&padded, |lag| flow_path_response(state.stats(), lag));
        for (total, q) in inflow.iter_mut().zip(routed) {
            *total += state.portion * q;
        }
    }
    inflow
}

/// Water leaving a cell of side `resolution` from its own release series
pub fn lateral_outflow(
    excess: &[f64],
    celerity: f64,
    dispersion: f64,
    resolution: f64,
) -> Result<Vec<f64>> {
    for (name, value) in [
        ("celerity", celerity),
        ("dispersion", dispersion),
        ("resolution", resolution),
    ] {
        if value.is_nan() || value <= 0.0 {
            return Err(Error::invalid_parameter(name, value, "must be positive"));
        }
    }

    let stats = TravelStats {
        mean: celerity,
        variance: dispersion,
    };
    Ok(convolve_with(excess, |lag| {
        cell_outlet_response(stats, resolution, lag)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FlowAlgorithm, RoutingConfig, RoutingMethod};
    use crate::hydrology::basin::delineate_basin;
    use crate::hydrology::drainage_graph::DrainageGraph;
    use flowrouting_core::{CellParameters, GeoTransform, ParameterGrid, PerChannel, Raster};

    #[test]
    fn test_unit_pulse_reproduces_kernel() {
        let kernel = [0.1, 0.5, 0.3, 0.1];
        let mut pulse = vec![0.0; 6];
        pulse[0] = 1.0;
        assert_eq!(convolve(&kernel, &pulse), vec![0.1, 0.5, 0.3, 0.1, 0.0, 0.0]);
    }

    #[test]
    fn test_convolution_is_linear_and_shifted() {
        let kernel = [0.2, 0.8];
        let out = convolve(&kernel, &[0.0, 2.0, 1.0]);
        assert_eq!(out.len(), 3);
        assert!((out[0] - 0.0).abs() < 1e-15);
        assert!((out[1] - 0.4).abs() < 1e-15);
        assert!((out[2] - (2.0 * 0.8 + 1.0 * 0.2)).abs() < 1e-15);
    }

    #[test]
    fn test_lateral_inflow_weights_by_portion() {
        let mut dem = Raster::from_vec(vec![1.0, 2.0, 3.0], 1, 3).unwrap();
        dem.set_transform(GeoTransform::with_resolution(1.0));
        let store = ParameterGrid::from_elevation(
            &dem,
            CellParameters {
                flow_speed: PerChannel::splat(1.0),
                flow_dispersion: PerChannel::splat(0.5),
                ..Default::default()
            },
        );
        let graph = DrainageGraph::build(&store, FlowAlgorithm::D8, 5.0).unwrap();
        let config = RoutingConfig {
            method: RoutingMethod::SubsurfaceAccount,
            time_steps: 8,
            ..Default::default()
        };
        let basin = delineate_basin(&graph, &store, CellIndex::new(0, 0), &config).unwrap();

        let mut pulse = vec![0.0; 8];
        pulse[0] = 1.0;
        let inflow = lateral_inflow(&basin, Channel::Subsurface, 8, |_| Some(&pulse[..]));

        // Unit pulse everywhere: inflow is the kernel scaled by drained area
        let area = basin.drained_area[Channel::Subsurface];
        for (t, q) in inflow.iter().enumerate() {
            let expected = area * basin.kernel_at(Channel::Subsurface, t + 1);
            assert!((q - expected).abs() < 1e-12);
        }

        let none = lateral_inflow(&basin, Channel::Subsurface, 8, |_| None);
        assert_eq!(none, vec![0.0; 8]);
        // Surface is not routed under this method
        let surface = lateral_inflow(&basin, Channel::Surface, 8, |_| Some(&pulse[..]));
        assert_eq!(surface, vec![0.0; 8]);
    }

    #[test]
    fn test_lateral_outflow_follows_cell_response() {
        let excess = [3.0, 0.0, 0.0, 0.0];
        let out = lateral_outflow(&excess, 2.0, 0.5, 10.0).unwrap();
        let stats = TravelStats {
            mean: 2.0,
            variance: 0.5,
        };
        for (n, q) in out.iter().enumerate() {
            assert!((q - 3.0 * cell_outlet_response(stats, 10.0, n + 1)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_lateral_outflow_rejects_bad_rates() {
        assert!(lateral_outflow(&[1.0], 0.0, 0.5, 10.0).is_err());
        assert!(lateral_outflow(&[1.0], 1.0, f64::NAN, 10.0).is_err());
        assert!(lateral_outflow(&[1.0], 1.0, 0.5, -1.0).is_err());
    }
}
