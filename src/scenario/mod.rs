//! Fire scenarios derived from incident clusters
//!
//! Each k-means cluster of the processed dataset becomes one [`Scenario`]
//! weighted by its membership fraction, with 1–3 synthetic incident sites.

mod config;
mod generator;
mod sites;

pub use config::{BoundingBox, ScenarioConfig};
pub use generator::ScenarioGenerator;
pub use sites::{haversine_km, synthesize_sites};

use crate::allocation::TruckType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fixed origin of every deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseStation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for BaseStation {
    fn default() -> Self {
        Self {
            name: "Jinju Fire Station".to_string(),
            latitude: 35.18035823746264,
            longitude: 128.11851962302458,
        }
    }
}

/// Descriptive statistics of one incident cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterStats {
    /// m/s, in [0, 20]
    pub wind_speed: f64,
    /// degrees, in [0, 30]
    pub slope: f64,
    /// percent, in [20, 80]
    pub humidity: f64,
    /// in [1, 10]
    pub required_resources: u32,
    /// in [0, 1000]
    pub damage_area: f64,
    pub fuel_type: i64,
    pub damage_class: i64,
    /// Membership fraction of the cluster
    pub probability: f64,
    /// Rows in the cluster
    pub size: usize,
}

/// Risk attributes copied onto every site of a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactors {
    pub wind_speed: f64,
    pub fuel_type: i64,
    pub slope: f64,
    pub humidity: f64,
    pub damage_class: i64,
}

impl From<&ClusterStats> for RiskFactors {
    fn from(stats: &ClusterStats) -> Self {
        Self {
            wind_speed: stats.wind_speed,
            fuel_type: stats.fuel_type,
            slope: stats.slope,
            humidity: stats.humidity,
            damage_class: stats.damage_class,
        }
    }
}

/// Incident location needing resources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Required headcount, in [1, 5]
    pub demand: u32,
    /// Travel distance (km) from the base station per truck type, in [2, 30]
    pub distances: BTreeMap<TruckType, f64>,
    pub risk: RiskFactors,
    pub latitude: f64,
    pub longitude: f64,
}

impl Site {
    pub fn distance(&self, truck: TruckType) -> f64 {
        self.distances.get(&truck).copied().unwrap_or(f64::INFINITY)
    }
}

/// One weighted fire situation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: usize,
    pub probability: f64,
    pub stats: ClusterStats,
    pub base_station: BaseStation,
    /// Keyed `site1`, `site2`, ...
    pub sites: BTreeMap<String, Site>,
}

impl Scenario {
    pub fn total_demand(&self) -> u32 {
        self.sites.values().map(|s| s.demand).sum()
    }
}
