//! Per-scenario resource allocation

use super::{AllocationConfig, AllocationModel, ModelSolution};
use crate::scenario::Scenario;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::{info, warn};

/// Kind of deployed resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Truck,
    Firefighter,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Truck => f.write_str("truck"),
            ResourceKind::Firefighter => f.write_str("firefighter"),
        }
    }
}

/// One deployment decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub scenario: usize,
    pub resource: ResourceKind,
    pub resource_type: String,
    pub site: String,
    pub quantity: u32,
    /// km from the base station
    pub distance: f64,
    pub latitude: f64,
    pub longitude: f64,
}

/// Solver verdict for a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum SolveStatus {
    Optimal,
    Failed(String),
}

/// Allocations and cost of one scenario; cost is infinite when solving failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationOutcome {
    pub scenario: usize,
    pub status: SolveStatus,
    pub allocations: Vec<Allocation>,
    pub cost: f64,
}

impl AllocationOutcome {
    pub fn failed(scenario: usize, reason: impl Into<String>) -> Self {
        Self {
            scenario,
            status: SolveStatus::Failed(reason.into()),
            allocations: Vec::new(),
            cost: f64::INFINITY,
        }
    }

    pub fn is_solved(&self) -> bool {
        self.status == SolveStatus::Optimal
    }
}

/// Solves the allocation model scenario by scenario
#[derive(Debug, Clone, Default)]
pub struct ResourceAllocator {
    config: AllocationConfig,
}

impl ResourceAllocator {
    pub fn new(config: AllocationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AllocationConfig {
        &self.config
    }

    /// Solve one scenario; solver failures are folded into the outcome
    pub fn optimize_scenario(&self, scenario: &Scenario) -> AllocationOutcome {
        let start = Instant::now();
        let model = AllocationModel::new(scenario, &self.config);

        match model.solve() {
            Ok(solution) => {
                let allocations = Self::to_allocations(scenario, &solution);
                info!(
                    scenario = scenario.id,
                    cost = solution.objective,
                    allocations = allocations.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Scenario optimized"
                );
                AllocationOutcome {
                    scenario: scenario.id,
                    status: SolveStatus::Optimal,
                    allocations,
                    cost: solution.objective,
                }
            }
            Err(e) => {
                warn!(scenario = scenario.id, error = %e, "Scenario has no optimal allocation");
                AllocationOutcome::failed(scenario.id, e.to_string())
            }
        }
    }

    pub fn optimize_all(&self, scenarios: &[Scenario]) -> Vec<AllocationOutcome> {
        scenarios.iter().map(|s| self.optimize_scenario(s)).collect()
    }

    /// Trucks first, then firefighter teams, each in type/site order
    fn to_allocations(scenario: &Scenario, solution: &ModelSolution) -> Vec<Allocation> {
        let mut out = Vec::with_capacity(solution.trucks.len() + solution.firefighters.len());

        for ((truck, site_id), &quantity) in &solution.trucks {
            if let Some(site) = scenario.sites.get(site_id) {
                out.push(Allocation {
                    scenario: scenario.id,
                    resource: ResourceKind::Truck,
                    resource_type: truck.to_string(),
                    site: site_id.clone(),
                    quantity,
                    distance: site.distance(*truck),
                    latitude: site.latitude,
                    longitude: site.longitude,
                });
            }
        }
        for ((team, site_id), &quantity) in &solution.firefighters {
            if let Some(site) = scenario.sites.get(site_id) {
                out.push(Allocation {
                    scenario: scenario.id,
                    resource: ResourceKind::Firefighter,
                    resource_type: team.to_string(),
                    site: site_id.clone(),
                    quantity,
                    distance: site.distance(team.paired_truck()),
                    latitude: site.latitude,
                    longitude: site.longitude,
                });
            }
        }

        out
    }
}
