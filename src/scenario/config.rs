//! Scenario generation configuration

use super::BaseStation;
use serde::{Deserialize, Serialize};

/// Rectangle that incident sites are sampled from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self {
            min_lat: 35.0,
            max_lat: 35.5,
            min_lon: 128.0,
            max_lon: 129.0,
        }
    }
}

/// Configuration for clustering and site synthesis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Requested number of scenarios (clamped to the row count)
    pub n_scenarios: usize,

    /// Seed of the k-means initialisation
    pub kmeans_seed: u64,

    /// K-means iteration cap
    pub max_iter: usize,

    /// K-means centroid shift tolerance
    pub tol: f64,

    /// Seed for site placement and jitter; a fresh seed is drawn and logged when unset
    pub site_seed: Option<u64>,

    /// Station every distance is measured from
    pub base_station: BaseStation,

    /// Area sites are sampled from
    pub region: BoundingBox,

    /// Relative per-truck-type distance perturbation
    pub distance_jitter: f64,

    pub min_distance_km: f64,
    pub max_distance_km: f64,

    pub max_sites: u32,
    pub max_demand: u32,

    /// Fuel/damage code used when no indicator column can be resolved
    pub default_category: i64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            n_scenarios: 5,
            kmeans_seed: 42,
            max_iter: 300,
            tol: 1e-4,
            site_seed: None,
            base_station: BaseStation::default(),
            region: BoundingBox::default(),
            distance_jitter: 0.1,
            min_distance_km: 2.0,
            max_distance_km: 30.0,
            max_sites: 3,
            max_demand: 5,
            default_category: 1,
        }
    }
}

impl ScenarioConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_n_scenarios(mut self, n: usize) -> Self {
        self.n_scenarios = n;
        self
    }

    pub fn with_site_seed(mut self, seed: u64) -> Self {
        self.site_seed = Some(seed);
        self
    }

    pub fn with_kmeans_seed(mut self, seed: u64) -> Self {
        self.kmeans_seed = seed;
        self
    }
}
