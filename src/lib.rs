//! Wildfire Planner - Scenario-based wildfire resource allocation
//!
//! This crate turns a historical wildfire incident table into a deployment
//! plan for fire trucks and firefighter teams:
//! - Data preprocessing: KNN and mode imputation, one-hot encoding
//! - Scenario generation: k-means clustering into weighted fire scenarios
//!   with synthetic incident sites
//! - Resource allocation: a per-scenario integer program
//! - Reporting: probability-weighted expected cost and map-ready data
//!
//! # Modules
//!
//! ## Pipeline stages
//! - [`preprocessing`] - Column mapping, imputation, encoding, scaling
//! - [`clustering`] - K-means with k-means++ initialisation
//! - [`scenario`] - Scenarios, sites and their synthesis
//! - [`allocation`] - Resource catalogue and the allocation program
//! - [`report`] - Aggregation and JSON export
//! - [`planner`] - End-to-end orchestration
//!
//! ## Support
//! - [`imputation`] - KNN imputer
//! - [`utils`] - CSV loading and dataset discovery
//! - [`config`] - Run configuration
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// Configuration
pub mod config;

// Pipeline stages
pub mod preprocessing;
pub mod clustering;
pub mod scenario;
pub mod allocation;
pub mod report;
pub mod planner;

// Data processing
pub mod imputation;

// Utilities
pub mod utils;

// Interfaces
pub mod cli;

pub use error::{PlannerError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{PlannerError, Result};

    // Configuration
    pub use crate::config::PlannerConfig;

    // Preprocessing
    pub use crate::preprocessing::{ColumnMapping, DataPreprocessor, PreprocessingConfig, ProcessedData};

    // Clustering
    pub use crate::clustering::KMeans;

    // Scenarios
    pub use crate::scenario::{BaseStation, ClusterStats, Scenario, ScenarioConfig, ScenarioGenerator, Site};

    // Allocation
    pub use crate::allocation::{
        Allocation, AllocationConfig, AllocationOutcome, FirefighterType, ResourceAllocator, TruckType,
    };

    // Reporting
    pub use crate::report::{MapData, PlanReport, ScenarioResult};

    // Orchestration
    pub use crate::planner::{PlanRun, WildfirePlanner};

    // Data loading
    pub use crate::utils::{DataLoader, DatasetLocator};
}
