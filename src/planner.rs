//! End-to-end planning run: preprocess, generate scenarios, allocate, report

use crate::allocation::{AllocationOutcome, ResourceAllocator};
use crate::config::PlannerConfig;
use crate::error::Result;
use crate::preprocessing::{DataPreprocessor, ProcessedData};
use crate::report::PlanReport;
use crate::scenario::{Scenario, ScenarioGenerator};
use crate::utils::{DataLoader, DatasetLocator};
use polars::prelude::DataFrame;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Intermediate products of a run, kept for inspection
#[derive(Debug, Clone)]
pub struct PlanRun {
    pub processed: ProcessedData,
    pub scenarios: Vec<Scenario>,
    pub report: PlanReport,
}

pub struct WildfirePlanner {
    config: PlannerConfig,
}

impl Default for WildfirePlanner {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}

impl WildfirePlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Locate and read the incident dataset
    pub fn load(&self, locator: &DatasetLocator) -> Result<(PathBuf, DataFrame)> {
        locator.locate(&DataLoader::new())
    }

    /// Locate the first dataset that survives preprocessing
    pub fn load_processed(&self, locator: &DatasetLocator) -> Result<(PathBuf, ProcessedData)> {
        locator.locate_with(&DataLoader::new(), |df| self.preprocess(&df))
    }

    pub fn preprocess(&self, df: &DataFrame) -> Result<ProcessedData> {
        DataPreprocessor::with_config(self.config.preprocessing.clone()).process(df)
    }

    /// Scenarios plus the seed used for site synthesis
    pub fn generate_scenarios(&self, data: &ProcessedData) -> Result<(Vec<Scenario>, u64)> {
        ScenarioGenerator::new(self.config.scenarios.clone())
            .with_prefixes(
                self.config.preprocessing.fuel_prefix.clone(),
                self.config.preprocessing.damage_prefix.clone(),
            )
            .generate(data)
    }

    pub fn allocate(&self, scenarios: &[Scenario]) -> Vec<AllocationOutcome> {
        ResourceAllocator::new(self.config.allocation.clone()).optimize_all(scenarios)
    }

    /// Full pipeline on an already loaded table
    pub fn run(&self, df: &DataFrame) -> Result<PlanRun> {
        self.config.validate()?;
        let processed = self.preprocess(df)?;
        self.plan(processed)
    }

    /// Locate the dataset, then run the pipeline
    pub fn run_located(&self, locator: &DatasetLocator) -> Result<PlanRun> {
        self.config.validate()?;
        let (path, processed) = self.load_processed(locator)?;
        info!(path = %path.display(), "Using dataset");
        self.plan(processed)
    }

    fn plan(&self, processed: ProcessedData) -> Result<PlanRun> {
        let start = Instant::now();
        let (scenarios, site_seed) = self.generate_scenarios(&processed)?;
        let outcomes = self.allocate(&scenarios);
        let report = PlanReport::from_outcomes(&scenarios, outcomes, site_seed);

        info!(
            rows = processed.n_rows(),
            scenarios = scenarios.len(),
            solved = report.solved,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Planning run complete"
        );
        Ok(PlanRun { processed, scenarios, report })
    }
}
