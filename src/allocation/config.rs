//! Allocation model configuration

use serde::{Deserialize, Serialize};

/// Bounds and weights of the per-scenario integer program
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    /// Upper bound of each truck-type/site variable
    pub max_trucks_per_site: u32,

    /// Upper bound of each firefighter-type/site variable
    pub max_firefighters_per_site: u32,

    /// Units of one truck type deployable across all sites
    pub max_trucks_per_type: u32,

    /// Firefighter units a single truck can carry to a site
    pub firefighters_per_truck: f64,

    /// Headcount shortfall tolerated per site
    pub demand_slack: u32,

    /// Fuel cost per litre-equivalent (distance / efficiency)
    pub fuel_cost_factor: f64,

    /// Ceiling of distance / speed × deployed units, in hours
    pub max_travel_time: f64,

    /// Values above this are read as deployed units
    pub rounding_threshold: f64,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            max_trucks_per_site: 2,
            max_firefighters_per_site: 3,
            max_trucks_per_type: 2,
            firefighters_per_truck: 3.0,
            demand_slack: 1,
            fuel_cost_factor: 1000.0,
            max_travel_time: 5.0,
            rounding_threshold: 0.5,
        }
    }
}

impl AllocationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_trucks_per_type(mut self, n: u32) -> Self {
        self.max_trucks_per_type = n;
        self
    }

    pub fn with_demand_slack(mut self, slack: u32) -> Self {
        self.demand_slack = slack;
        self
    }

    pub fn with_max_travel_time(mut self, hours: f64) -> Self {
        self.max_travel_time = hours;
        self
    }

    /// Minimum headcount a site must receive
    pub fn required_headcount(&self, demand: u32) -> u32 {
        demand.saturating_sub(self.demand_slack).max(1)
    }
}
