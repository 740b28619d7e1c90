//! Run configuration
//!
//! Aggregates the per-stage configs so a whole run can be stored and loaded
//! as one JSON document. Missing sections and fields take their defaults.

use crate::allocation::AllocationConfig;
use crate::error::{PlannerError, Result};
use crate::preprocessing::PreprocessingConfig;
use crate::scenario::ScenarioConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub preprocessing: PreprocessingConfig,
    pub scenarios: ScenarioConfig,
    pub allocation: AllocationConfig,
}

impl PlannerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preprocessing(mut self, config: PreprocessingConfig) -> Self {
        self.preprocessing = config;
        self
    }

    pub fn with_scenarios(mut self, config: ScenarioConfig) -> Self {
        self.scenarios = config;
        self
    }

    pub fn with_allocation(mut self, config: AllocationConfig) -> Self {
        self.allocation = config;
        self
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| PlannerError::ConfigError(format!("{}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Reject values no run could use
    pub fn validate(&self) -> Result<()> {
        let p = &self.preprocessing;
        if p.knn_neighbors == 0 {
            return Err(invalid("preprocessing.knn_neighbors", p.knn_neighbors, "must be at least 1"));
        }
        if p.fuel_prefix.is_empty() || p.damage_prefix.is_empty() || p.fuel_prefix == p.damage_prefix {
            return Err(invalid(
                "preprocessing.fuel_prefix",
                &p.fuel_prefix,
                "prefixes must be non-empty and distinct",
            ));
        }

        let s = &self.scenarios;
        if s.n_scenarios == 0 {
            return Err(invalid("scenarios.n_scenarios", s.n_scenarios, "must be at least 1"));
        }
        if s.max_iter == 0 {
            return Err(invalid("scenarios.max_iter", s.max_iter, "must be at least 1"));
        }
        if !(s.tol >= 0.0) {
            return Err(invalid("scenarios.tol", s.tol, "must be non-negative"));
        }
        if s.region.min_lat > s.region.max_lat || s.region.min_lon > s.region.max_lon {
            return Err(invalid("scenarios.region", format!("{:?}", s.region), "min exceeds max"));
        }
        if !(0.0..1.0).contains(&s.distance_jitter) {
            return Err(invalid("scenarios.distance_jitter", s.distance_jitter, "must be in [0, 1)"));
        }
        if !(s.min_distance_km > 0.0 && s.min_distance_km <= s.max_distance_km) {
            return Err(invalid(
                "scenarios.min_distance_km",
                s.min_distance_km,
                "must be positive and not above max_distance_km",
            ));
        }
        if s.max_sites == 0 || s.max_demand == 0 {
            return Err(invalid("scenarios.max_sites", s.max_sites, "site and demand caps must be at least 1"));
        }

        let a = &self.allocation;
        if !(a.firefighters_per_truck >= 0.0) {
            return Err(invalid("allocation.firefighters_per_truck", a.firefighters_per_truck, "must be non-negative"));
        }
        if !(a.fuel_cost_factor >= 0.0) {
            return Err(invalid("allocation.fuel_cost_factor", a.fuel_cost_factor, "must be non-negative"));
        }
        if !(a.max_travel_time > 0.0) {
            return Err(invalid("allocation.max_travel_time", a.max_travel_time, "must be positive"));
        }
        if !(0.0..1.0).contains(&a.rounding_threshold) {
            return Err(invalid("allocation.rounding_threshold", a.rounding_threshold, "must be in [0, 1)"));
        }

        Ok(())
    }
}

fn invalid(name: &str, value: impl ToString, reason: &str) -> PlannerError {
    PlannerError::InvalidParameter {
        name: name.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
