//! Run configuration for flow routing
//!
//! Names are matched case-insensitively and unknown names are reported with
//! the offending string. [`RoutingConfig::validate`] runs before any grid
//! work so a bad setting never costs a full-grid pass.

use crate::hydrology::partition::FlowPartition;
use crate::hydrology::{AdaptiveMfdParams, DInf, MfdInfParams, MfdParams, D8};
use crate::queue::DEFAULT_QUEUE_CAPACITY;
use flowrouting_core::{Channel, Error, PerChannel, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Flow-direction algorithm used to build the drainage graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FlowAlgorithm {
    /// Single steepest direction
    D8,
    /// Tarboton's D∞
    DInf,
    /// Freeman multiple flow direction
    MFD8,
    /// Multiple flow direction with an adaptive exponent
    #[default]
    MFDmd,
    /// Seibert & McGlynn triangular multiple flow direction
    MFDInf,
}

impl FlowAlgorithm {
    pub const ALL: [FlowAlgorithm; 5] = [
        FlowAlgorithm::D8,
        FlowAlgorithm::DInf,
        FlowAlgorithm::MFD8,
        FlowAlgorithm::MFDmd,
        FlowAlgorithm::MFDInf,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FlowAlgorithm::D8 => "D8",
            FlowAlgorithm::DInf => "DInf",
            FlowAlgorithm::MFD8 => "MFD8",
            FlowAlgorithm::MFDmd => "MFDmd",
            FlowAlgorithm::MFDInf => "MFDInf",
        }
    }

    /// The partition rule, with `convergence` as exponent where one applies
    pub fn partitioner(&self, convergence: f64) -> Box<dyn FlowPartition + Send + Sync> {
        match self {
            FlowAlgorithm::D8 => Box::new(D8),
            FlowAlgorithm::DInf => Box::new(DInf),
            FlowAlgorithm::MFD8 => Box::new(MfdParams {
                exponent: convergence,
            }),
            FlowAlgorithm::MFDmd => Box::new(AdaptiveMfdParams::default()),
            FlowAlgorithm::MFDInf => Box::new(MfdInfParams {
                exponent: convergence,
            }),
        }
    }
}

impl FromStr for FlowAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        FlowAlgorithm::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownAlgorithm(s.to_string()))
    }
}

impl TryFrom<String> for FlowAlgorithm {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<FlowAlgorithm> for String {
    fn from(a: FlowAlgorithm) -> Self {
        a.name().to_string()
    }
}

impl fmt::Display for FlowAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which flow processes are routed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RoutingMethod {
    /// No lateral routing; no drainage graph is built
    Climate,
    SurfaceAccount,
    SubsurfaceAccount,
    #[default]
    FullAccount,
}

impl RoutingMethod {
    pub const ALL: [RoutingMethod; 4] = [
        RoutingMethod::Climate,
        RoutingMethod::SurfaceAccount,
        RoutingMethod::SubsurfaceAccount,
        RoutingMethod::FullAccount,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RoutingMethod::Climate => "climate",
            RoutingMethod::SurfaceAccount => "surface_account",
            RoutingMethod::SubsurfaceAccount => "subsurface_account",
            RoutingMethod::FullAccount => "full_account",
        }
    }

    pub fn routes(&self, channel: Channel) -> bool {
        matches!(
            (self, channel),
            (RoutingMethod::FullAccount, _)
                | (RoutingMethod::SurfaceAccount, Channel::Surface)
                | (RoutingMethod::SubsurfaceAccount, Channel::Subsurface)
        )
    }

    /// Routed channels, surface first
    pub fn channels(&self) -> impl Iterator<Item = Channel> + '_ {
        Channel::ALL.into_iter().filter(|c| self.routes(*c))
    }

    pub fn needs_graph(&self) -> bool {
        !matches!(self, RoutingMethod::Climate)
    }
}

impl FromStr for RoutingMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        RoutingMethod::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownMethod(s.to_string()))
    }
}

impl TryFrom<String> for RoutingMethod {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<RoutingMethod> for String {
    fn from(m: RoutingMethod) -> Self {
        m.name().to_string()
    }
}

impl fmt::Display for RoutingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Settings for graph construction and basin delineation.
///
/// Unbounded drainage times are written as `null` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub algorithm: FlowAlgorithm,
    pub method: RoutingMethod,
    /// Convergence exponent for MFD8 and MFDInf
    pub convergence: f64,
    /// Travel-time horizon per channel, in seconds
    #[serde(with = "horizons")]
    pub drainage_times: PerChannel<f64>,
    /// Length of each response kernel
    pub time_steps: usize,
    /// Frontier capacity for one basin traversal
    pub queue_capacity: usize,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            algorithm: FlowAlgorithm::default(),
            method: RoutingMethod::default(),
            convergence: 5.0,
            drainage_times: PerChannel::splat(f64::INFINITY),
            time_steps: 1,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl RoutingConfig {
    /// Check every setting, reporting the first offender
    pub fn validate(&self) -> Result<()> {
        if !(1.0..=10.0).contains(&self.convergence) {
            return Err(Error::invalid_parameter(
                "convergence",
                self.convergence,
                "must lie in [1, 10]",
            ));
        }
        for (channel, &t) in self.drainage_times.iter() {
            if t.is_nan() || t <= 0.0 {
                return Err(Error::invalid_parameter(
                    "drainage_times",
                    t,
                    format!("{} horizon must be positive", channel),
                ));
            }
        }
        if self.time_steps == 0 {
            return Err(Error::invalid_parameter("time_steps", 0, "must be at least 1"));
        }
        if self.queue_capacity == 0 {
            return Err(Error::invalid_parameter(
                "queue_capacity",
                0,
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// `Option<f64>` on the wire so an unbounded horizon survives JSON
mod horizons {
    use flowrouting_core::PerChannel;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(v: &PerChannel<f64>, s: S) -> Result<S::Ok, S::Error> {
        v.map(|t| t.is_finite().then_some(t)).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<PerChannel<f64>, D::Error> {
        let v = PerChannel::<Option<f64>>::deserialize(d)?;
        Ok(v.map(|t| t.unwrap_or(f64::INFINITY)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_names_case_insensitive() {
        assert_eq!("d8".parse::<FlowAlgorithm>().unwrap(), FlowAlgorithm::D8);
        assert_eq!("MFDMD".parse::<FlowAlgorithm>().unwrap(), FlowAlgorithm::MFDmd);
        assert_eq!("mfdinf".parse::<FlowAlgorithm>().unwrap(), FlowAlgorithm::MFDInf);
        for a in FlowAlgorithm::ALL {
            assert_eq!(a.name().parse::<FlowAlgorithm>().unwrap(), a);
        }
    }

    #[test]
    fn test_unknown_names_report_offender() {
        match "D16".parse::<FlowAlgorithm>() {
            Err(Error::UnknownAlgorithm(name)) => assert_eq!(name, "D16"),
            other => panic!("unexpected {:?}", other),
        }
        match "runoff".parse::<RoutingMethod>() {
            Err(Error::UnknownMethod(name)) => assert_eq!(name, "runoff"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_method_channels() {
        let all: Vec<_> = RoutingMethod::FullAccount.channels().collect();
        assert_eq!(all, vec![Channel::Surface, Channel::Subsurface]);
        let sub: Vec<_> = RoutingMethod::SubsurfaceAccount.channels().collect();
        assert_eq!(sub, vec![Channel::Subsurface]);
        assert_eq!(RoutingMethod::Climate.channels().count(), 0);
        assert!(!RoutingMethod::Climate.needs_graph());
    }

    #[test]
    fn test_defaults_validate() {
        let cfg = RoutingConfig::default();
        assert_eq!(cfg.algorithm, FlowAlgorithm::MFDmd);
        assert_eq!(cfg.method, RoutingMethod::FullAccount);
        assert_eq!(cfg.queue_capacity, 10_000);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let bad = RoutingConfig {
            convergence: 12.0,
            ..Default::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(Error::InvalidParameter { name: "convergence", .. })
        ));

        let bad = RoutingConfig {
            drainage_times: PerChannel::new(3600.0, 0.0),
            ..Default::default()
        };
        assert!(bad.validate().is_err());

        let bad = RoutingConfig {
            time_steps: 0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_json_partial_config() {
        let cfg: RoutingConfig = serde_json::from_str(
            r#"{"algorithm": "dinf", "drainage_times": {"surface": 7200.0, "subsurface": null}}"#,
        )
        .unwrap();
        assert_eq!(cfg.algorithm, FlowAlgorithm::DInf);
        assert_eq!(cfg.drainage_times[Channel::Surface], 7200.0);
        assert!(cfg.drainage_times[Channel::Subsurface].is_infinite());
        assert_eq!(cfg.time_steps, 1);

        let text = serde_json::to_string(&cfg).unwrap();
        let back: RoutingConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn test_json_unknown_algorithm_fails() {
        let err = serde_json::from_str::<RoutingConfig>(r#"{"algorithm": "D16"}"#).unwrap_err();
        assert!(err.to_string().contains("D16"));
    }
}
