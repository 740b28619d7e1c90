//! Plan aggregation and export
//!
//! Collects per-scenario allocation outcomes into a [`PlanReport`]: the
//! probability-weighted expected cost, solve counts and, per scenario, the
//! flattened arrays a map renderer needs.

use crate::allocation::{Allocation, AllocationOutcome, SolveStatus};
use crate::error::Result;
use crate::scenario::{BaseStation, ClusterStats, Scenario};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Parallel arrays, one entry per allocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapData {
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    pub damage_class: Vec<i64>,
    pub resource_types: Vec<String>,
    pub quantities: Vec<u32>,
}

impl MapData {
    pub fn from_allocations(allocations: &[Allocation], damage_class: i64) -> Self {
        let mut map = MapData::default();
        for a in allocations {
            map.lat.push(a.latitude);
            map.lon.push(a.longitude);
            map.damage_class.push(damage_class);
            map.resource_types.push(a.resource_type.clone());
            map.quantities.push(a.quantity);
        }
        map
    }

    pub fn len(&self) -> usize {
        self.lat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lat.is_empty()
    }
}

/// Everything known about one solved or failed scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario: usize,
    pub probability: f64,
    pub stats: ClusterStats,
    pub base_station: BaseStation,
    pub status: SolveStatus,
    /// `None` when the scenario could not be solved
    pub cost: Option<f64>,
    pub allocations: Vec<Allocation>,
    pub map_data: MapData,
}

impl ScenarioResult {
    pub fn is_solved(&self) -> bool {
        self.status == SolveStatus::Optimal
    }
}

/// Aggregated outcome of a planning run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanReport {
    pub generated_at: DateTime<Utc>,
    /// Seed that reproduces the synthesized sites
    pub site_seed: u64,
    /// Σ cost × probability over solved scenarios
    pub total_weighted_cost: f64,
    pub total_allocations: usize,
    pub solved: usize,
    pub failed: usize,
    pub results: BTreeMap<usize, ScenarioResult>,
}

impl PlanReport {
    /// Pair outcomes with their scenarios by id; outcomes without a scenario are ignored
    pub fn from_outcomes(scenarios: &[Scenario], outcomes: Vec<AllocationOutcome>, site_seed: u64) -> Self {
        let by_id: BTreeMap<usize, &Scenario> = scenarios.iter().map(|s| (s.id, s)).collect();

        let mut results = BTreeMap::new();
        let mut total_weighted_cost = 0.0;
        let mut total_allocations = 0;
        let (mut solved, mut failed) = (0, 0);

        for outcome in outcomes {
            let Some(scenario) = by_id.get(&outcome.scenario) else {
                continue;
            };

            let cost = if outcome.is_solved() && outcome.cost.is_finite() {
                solved += 1;
                total_weighted_cost += outcome.cost * scenario.probability;
                total_allocations += outcome.allocations.len();
                Some(outcome.cost)
            } else {
                failed += 1;
                None
            };

            let map_data = MapData::from_allocations(&outcome.allocations, scenario.stats.damage_class);
            results.insert(
                scenario.id,
                ScenarioResult {
                    scenario: scenario.id,
                    probability: scenario.probability,
                    stats: scenario.stats.clone(),
                    base_station: scenario.base_station.clone(),
                    status: outcome.status,
                    cost,
                    allocations: outcome.allocations,
                    map_data,
                },
            );
        }

        info!(
            solved,
            failed,
            allocations = total_allocations,
            weighted_cost = total_weighted_cost,
            "Plan aggregated"
        );

        Self {
            generated_at: Utc::now(),
            site_seed,
            total_weighted_cost,
            total_allocations,
            solved,
            failed,
            results,
        }
    }

    pub fn scenario_count(&self) -> usize {
        self.results.len()
    }

    pub fn solved_results(&self) -> impl Iterator<Item = &ScenarioResult> {
        self.results.values().filter(|r| r.is_solved())
    }

    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        info!(path = %path.as_ref().display(), "Report written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::ResourceKind;

    fn stats(probability: f64) -> ClusterStats {
        ClusterStats {
            wind_speed: 3.0,
            slope: 10.0,
            humidity: 40.0,
            required_resources: 2,
            damage_area: 1.0,
            fuel_type: 2,
            damage_class: 3,
            probability,
            size: 1,
        }
    }

    fn scenario(id: usize, probability: f64) -> Scenario {
        Scenario {
            id,
            probability,
            stats: stats(probability),
            base_station: BaseStation::default(),
            sites: BTreeMap::new(),
        }
    }

    fn allocation(scenario: usize) -> Allocation {
        Allocation {
            scenario,
            resource: ResourceKind::Truck,
            resource_type: "FT1".to_string(),
            site: "site1".to_string(),
            quantity: 1,
            distance: 10.0,
            latitude: 35.3,
            longitude: 128.4,
        }
    }

    #[test]
    fn test_failed_scenarios_excluded_from_total() {
        let scenarios = vec![scenario(0, 0.75), scenario(1, 0.25)];
        let outcomes = vec![
            AllocationOutcome {
                scenario: 0,
                status: SolveStatus::Optimal,
                allocations: vec![allocation(0)],
                cost: 6000.0,
            },
            AllocationOutcome::failed(1, "infeasible"),
        ];

        let report = PlanReport::from_outcomes(&scenarios, outcomes, 9);
        assert_eq!(report.solved, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.total_allocations, 1);
        assert!((report.total_weighted_cost - 4500.0).abs() < 1e-9);
        assert_eq!(report.results[&1].cost, None);
        assert!(report.results[&1].allocations.is_empty());
        assert_eq!(report.solved_results().count(), 1);
    }

    #[test]
    fn test_map_data_is_parallel() {
        let scenarios = vec![scenario(0, 1.0)];
        let outcomes = vec![AllocationOutcome {
            scenario: 0,
            status: SolveStatus::Optimal,
            allocations: vec![allocation(0), allocation(0)],
            cost: 12000.0,
        }];

        let report = PlanReport::from_outcomes(&scenarios, outcomes, 1);
        let map = &report.results[&0].map_data;
        assert_eq!(map.len(), 2);
        assert_eq!(map.lon.len(), 2);
        assert_eq!(map.damage_class, vec![3, 3]);
        assert_eq!(map.resource_types, vec!["FT1", "FT1"]);
        assert_eq!(map.quantities, vec![1, 1]);
    }

    #[test]
    fn test_json_export() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("report.json");
        let report = PlanReport::from_outcomes(&[scenario(0, 1.0)], vec![AllocationOutcome::failed(0, "x")], 3);
        report.to_json_file(&path).unwrap();

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["site_seed"], 3);
        assert_eq!(value["failed"], 1);
        assert!(value["results"]["0"]["cost"].is_null());
    }
}
