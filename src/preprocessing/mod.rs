//! Data preprocessing module
//!
//! Turns the raw incident table into model-ready matrices:
//! - KNN imputation of numeric gaps, mode imputation of categorical gaps
//! - One-hot encoding of fuel type and damage class
//! - Standard scaling (used by scenario clustering)

mod config;
mod encoder;
mod imputer;
mod pipeline;
mod scaler;

pub use config::{ColumnMapping, PreprocessingConfig};
pub use encoder::OneHotEncoder;
pub use imputer::ModeImputer;
pub use pipeline::{DataPreprocessor, DAMAGE_AREA, HUMIDITY, REQUIRED_RESOURCES, SLOPE, WIND_SPEED};
pub use scaler::StandardScaler;

use crate::error::{PlannerError, Result};
use ndarray::{Array2, ArrayView1};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Row-aligned feature and target matrices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedData {
    pub feature_names: Vec<String>,
    pub features: Array2<f64>,
    pub target_names: Vec<String>,
    pub targets: Array2<f64>,
    /// Rows removed because they stayed incomplete after imputation
    pub dropped_rows: usize,
}

impl ProcessedData {
    pub fn n_rows(&self) -> usize {
        self.features.nrows()
    }

    pub fn feature(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.feature_names
            .iter()
            .position(|n| n == name)
            .map(|j| self.features.column(j))
    }

    pub fn target(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.target_names
            .iter()
            .position(|n| n == name)
            .map(|j| self.targets.column(j))
    }

    /// Indices and names of indicator columns starting with `<prefix>_`
    pub fn indicator_columns(&self, prefix: &str) -> Vec<(usize, &str)> {
        let head = format!("{}_", prefix);
        self.feature_names
            .iter()
            .enumerate()
            .filter(|(_, n)| n.starts_with(&head))
            .map(|(j, n)| (j, n.as_str()))
            .collect()
    }

    /// Features followed by targets as a single table
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let columns: Vec<Column> = self
            .feature_names
            .iter()
            .zip(self.features.columns())
            .chain(self.target_names.iter().zip(self.targets.columns()))
            .map(|(name, values)| Column::new(name.as_str().into(), values.to_vec()))
            .collect();

        DataFrame::new(columns).map_err(|e| PlannerError::DataError(e.to_string()))
    }
}
