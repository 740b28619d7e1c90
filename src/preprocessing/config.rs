//! Preprocessing configuration

use crate::imputation::NeighborWeights;
use serde::{Deserialize, Serialize};

/// Mapping from logical roles to raw CSV column names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub wind_speed: String,
    pub fuel_type: String,
    pub slope: String,
    pub humidity: String,
    pub damage_class: String,
    pub required_resources: String,
    pub damage_area: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            wind_speed: "WDSP".to_string(),
            fuel_type: "FRTP_CD".to_string(),
            slope: "DNST_CD".to_string(),
            humidity: "HMDT".to_string(),
            damage_class: "DMCLS_CD".to_string(),
            required_resources: "POTFR_RSRC_INPT_QNTT".to_string(),
            damage_area: "FRFR_DMG_AREA".to_string(),
        }
    }
}

/// Configuration for dataset preprocessing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessingConfig {
    /// Raw column names
    pub columns: ColumnMapping,

    /// Neighbours used by the KNN imputer
    pub knn_neighbors: usize,

    /// Averaging scheme of the KNN imputer
    pub knn_weights: NeighborWeights,

    /// One-hot prefix for the fuel type column
    pub fuel_prefix: String,

    /// One-hot prefix for the damage class column
    pub damage_prefix: String,

    /// Fill value for missing damage area
    pub damage_area_fill: f64,

    /// Fill value for a numeric feature with no observed values at all
    pub empty_column_fill: f64,

    /// Category used for a categorical feature with no observed values at all
    pub empty_category_fill: String,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            columns: ColumnMapping::default(),
            knn_neighbors: 5,
            knn_weights: NeighborWeights::Distance,
            fuel_prefix: "fuel".to_string(),
            damage_prefix: "damage".to_string(),
            damage_area_fill: 0.0,
            empty_column_fill: 0.0,
            empty_category_fill: "1".to_string(),
        }
    }
}

impl PreprocessingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_columns(mut self, columns: ColumnMapping) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_knn_neighbors(mut self, k: usize) -> Self {
        self.knn_neighbors = k;
        self
    }

    pub fn with_knn_weights(mut self, weights: NeighborWeights) -> Self {
        self.knn_weights = weights;
        self
    }
}
