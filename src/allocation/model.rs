//! Integer program assigning trucks and firefighter teams to sites

use super::{AllocationConfig, FirefighterType, TruckType};
use crate::error::{PlannerError, Result};
use crate::scenario::Scenario;
use good_lp::{
    microlp, variable, Expression, IntoAffineExpression, ProblemVariables, Solution, SolverModel,
    Variable,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Rounded variable values of a solved model
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelSolution {
    pub trucks: BTreeMap<(TruckType, String), u32>,
    pub firefighters: BTreeMap<(FirefighterType, String), u32>,
    /// Objective evaluated on the rounded values
    pub objective: f64,
}

impl ModelSolution {
    pub fn trucks_at(&self, site: &str) -> u32 {
        self.trucks
            .iter()
            .filter(|((_, s), _)| s == site)
            .map(|(_, &q)| q)
            .sum()
    }

    pub fn firefighters_at(&self, site: &str) -> u32 {
        self.firefighters
            .iter()
            .filter(|((_, s), _)| s == site)
            .map(|(_, &q)| q)
            .sum()
    }

    /// Truck crew seats plus firefighter units at a site
    pub fn headcount_at(&self, site: &str) -> u32 {
        let crew: u32 = self
            .trucks
            .iter()
            .filter(|((_, s), _)| s == site)
            .map(|((t, _), &q)| t.spec().personnel * q)
            .sum();
        crew + self.firefighters_at(site)
    }
}

/// MILP formulation for one scenario.
///
/// Minimises deployment cost plus fuel cost subject to per-type caps,
/// per-site headcount coverage, truck/firefighter coupling and a travel
/// time ceiling.
pub struct AllocationModel<'a> {
    scenario: &'a Scenario,
    config: &'a AllocationConfig,
}

impl<'a> AllocationModel<'a> {
    pub fn new(scenario: &'a Scenario, config: &'a AllocationConfig) -> Self {
        Self { scenario, config }
    }

    /// Deployment plus fuel cost of one truck of `truck` sent to `site`
    pub fn truck_unit_cost(&self, truck: TruckType, site: &str) -> f64 {
        let spec = truck.spec();
        let distance = self.scenario.sites.get(site).map_or(0.0, |s| s.distance(truck));
        spec.cost + distance / spec.fuel_efficiency * self.config.fuel_cost_factor
    }

    pub fn solve(&self) -> Result<ModelSolution> {
        let cfg = self.config;
        let sites = &self.scenario.sites;
        if sites.is_empty() {
            return Ok(ModelSolution::default());
        }

        let mut vars = ProblemVariables::new();
        let mut x: BTreeMap<(TruckType, &str), Variable> = BTreeMap::new();
        let mut y: BTreeMap<(FirefighterType, &str), Variable> = BTreeMap::new();

        for truck in TruckType::ALL {
            for site in sites.keys() {
                let var = vars.add(variable().integer().min(0.0).max(cfg.max_trucks_per_site as f64));
                x.insert((truck, site.as_str()), var);
            }
        }
        for team in FirefighterType::ALL {
            for site in sites.keys() {
                let var = vars.add(variable().integer().min(0.0).max(cfg.max_firefighters_per_site as f64));
                y.insert((team, site.as_str()), var);
            }
        }

        let mut objective = Expression::from(0.0);
        for (&(truck, site), &var) in &x {
            let cost = self.truck_unit_cost(truck, site);
            if cost.is_finite() {
                objective += var * cost;
            }
        }
        for (&(team, _), &var) in &y {
            objective += var * team.spec().cost;
        }

        let mut problem = vars.minimise(objective).using(microlp);

        // Per-type caps across all sites
        for truck in TruckType::ALL {
            let total: Expression = sites.keys().map(|s| x[&(truck, s.as_str())]).sum();
            problem.add_constraint(total.leq(cfg.max_trucks_per_type as f64));
        }
        for team in FirefighterType::ALL {
            let total: Expression = sites.keys().map(|s| y[&(team, s.as_str())]).sum();
            problem.add_constraint(total.leq(team.spec().max_deployments as f64));
        }

        for (site_id, site) in sites {
            let site_id = site_id.as_str();

            let mut crew = Expression::from(0.0);
            let mut trucks = Expression::from(0.0);
            for truck in TruckType::ALL {
                let var = x[&(truck, site_id)];
                crew += var * truck.spec().personnel as f64;
                trucks += var;

                // Travel time ceiling; unreachable types stay at zero
                let travel_time = site.distance(truck) / truck.spec().speed;
                if travel_time.is_finite() {
                    problem.add_constraint((var * travel_time).leq(cfg.max_travel_time));
                } else {
                    problem.add_constraint(var.into_expression().leq(0.0));
                }
            }
            let firefighters: Expression = FirefighterType::ALL
                .iter()
                .map(|&team| y[&(team, site_id)])
                .sum();

            // Headcount coverage, with tolerated slack
            let required = cfg.required_headcount(site.demand) as f64;
            problem.add_constraint((crew + firefighters.clone()).geq(required));

            // Firefighters need transport
            problem.add_constraint(firefighters.leq(trucks * cfg.firefighters_per_truck));
        }

        let solution = problem
            .solve()
            .map_err(|e| PlannerError::OptimizationError(e.to_string()))?;

        let threshold = cfg.rounding_threshold;
        let mut result = ModelSolution::default();
        for (&(truck, site), &var) in &x {
            let value = solution.value(var);
            if value > threshold {
                let qty = value.round() as u32;
                result.objective += self.truck_unit_cost(truck, site) * qty as f64;
                result.trucks.insert((truck, site.to_string()), qty);
            }
        }
        for (&(team, site), &var) in &y {
            let value = solution.value(var);
            if value > threshold {
                let qty = value.round() as u32;
                result.objective += team.spec().cost * qty as f64;
                result.firefighters.insert((team, site.to_string()), qty);
            }
        }

        debug!(
            scenario = self.scenario.id,
            objective = result.objective,
            trucks = result.trucks.len(),
            firefighters = result.firefighters.len(),
            "Allocation model solved"
        );
        Ok(result)
    }
}
