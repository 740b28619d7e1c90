//! Incident dataset preprocessing pipeline

use super::{
    config::PreprocessingConfig, encoder::OneHotEncoder, imputer::ModeImputer, ProcessedData,
};
use crate::error::{PlannerError, Result};
use crate::imputation::{count_missing, is_missing, Imputer, KNNImputer};
use ndarray::{concatenate, Array2, Axis};
use polars::prelude::*;
use std::time::Instant;
use tracing::{debug, info, warn};

pub const WIND_SPEED: &str = "wind_speed";
pub const HUMIDITY: &str = "humidity";
pub const SLOPE: &str = "slope";
pub const REQUIRED_RESOURCES: &str = "required_resources";
pub const DAMAGE_AREA: &str = "damage_area";

/// Turns the raw incident table into aligned numeric feature/target matrices
#[derive(Debug, Clone)]
pub struct DataPreprocessor {
    config: PreprocessingConfig,
    fit_time: Option<f64>,
}

impl Default for DataPreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl DataPreprocessor {
    pub fn new() -> Self {
        Self::with_config(PreprocessingConfig::default())
    }

    pub fn with_config(config: PreprocessingConfig) -> Self {
        Self {
            config,
            fit_time: None,
        }
    }

    pub fn config(&self) -> &PreprocessingConfig {
        &self.config
    }

    /// Seconds spent in the last `process` call
    pub fn fit_time(&self) -> Option<f64> {
        self.fit_time
    }

    /// Run the full preprocessing chain on a raw table
    pub fn process(&mut self, df: &DataFrame) -> Result<ProcessedData> {
        let start = Instant::now();
        let cols = &self.config.columns;
        let n_rows = df.height();
        if n_rows == 0 {
            return Err(PlannerError::PreprocessingError("Dataset has no rows".to_string()));
        }

        // Numeric features, imputed jointly
        let mut numeric = Array2::from_elem((n_rows, 3), f64::NAN);
        for (j, name) in [&cols.wind_speed, &cols.humidity, &cols.slope].into_iter().enumerate() {
            let values = numeric_column(df, name)?;
            if values.iter().all(|v| is_missing(*v)) {
                warn!(column = %name, fill = self.config.empty_column_fill, "Numeric column has no values, using constant fill");
                numeric.column_mut(j).fill(self.config.empty_column_fill);
            } else {
                numeric.column_mut(j).assign(&ndarray::Array1::from_vec(values));
            }
        }
        let missing_numeric = count_missing(&numeric);
        let mut knn = KNNImputer::new(self.config.knn_neighbors).with_weights(self.config.knn_weights);
        let numeric = knn.fit_transform(&numeric)?;
        debug!(imputed = missing_numeric, k = knn.n_neighbors(), "KNN-imputed numeric features");

        // Categorical features: mode fill, then one-hot
        let mut fuel_encoder = OneHotEncoder::new(self.config.fuel_prefix.clone());
        let fuel = ModeImputer::new()
            .with_fallback(self.config.empty_category_fill.clone())
            .fit_transform(&categorical_column(df, &cols.fuel_type)?)?;
        let fuel = fuel_encoder.fit_transform(&fuel)?;

        let mut damage_encoder = OneHotEncoder::new(self.config.damage_prefix.clone());
        let damage = ModeImputer::new()
            .with_fallback(self.config.empty_category_fill.clone())
            .fit_transform(&categorical_column(df, &cols.damage_class)?)?;
        let damage = damage_encoder.fit_transform(&damage)?;

        // Targets
        let required = ndarray::Array1::from_vec(numeric_column(df, &cols.required_resources)?)
            .insert_axis(Axis(1));
        let mut target_knn = KNNImputer::new(self.config.knn_neighbors).with_weights(self.config.knn_weights);
        let required = target_knn.fit_transform(&required)?;

        let damage_fill = self.config.damage_area_fill;
        let damage_area = ndarray::Array1::from_vec(
            numeric_column(df, &cols.damage_area)?
                .into_iter()
                .map(|v| if is_missing(v) { damage_fill } else { v })
                .collect(),
        )
        .insert_axis(Axis(1));

        let features = concatenate(Axis(1), &[numeric.view(), fuel.view(), damage.view()])?;
        let targets = concatenate(Axis(1), &[required.view(), damage_area.view()])?;

        let mut feature_names = vec![WIND_SPEED.to_string(), HUMIDITY.to_string(), SLOPE.to_string()];
        feature_names.extend(fuel_encoder.feature_names());
        feature_names.extend(damage_encoder.feature_names());
        let target_names = vec![REQUIRED_RESOURCES.to_string(), DAMAGE_AREA.to_string()];

        let (features, targets, dropped) = drop_incomplete_rows(features, targets);
        if features.nrows() == 0 {
            return Err(PlannerError::PreprocessingError(
                "No complete rows left after imputation".to_string(),
            ));
        }

        let elapsed = start.elapsed().as_secs_f64();
        self.fit_time = Some(elapsed);
        info!(
            rows = features.nrows(),
            features = feature_names.len(),
            dropped,
            elapsed_secs = elapsed,
            "Preprocessing complete"
        );

        Ok(ProcessedData {
            feature_names,
            features,
            target_names,
            targets,
            dropped_rows: dropped,
        })
    }
}

/// Numeric view of a column; unparsable and null cells become NaN
fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df
        .column(name)
        .map_err(|_| PlannerError::FeatureNotFound(name.to_string()))?;
    let casted = column.cast(&DataType::Float64)?;
    let ca = casted.f64()?;
    Ok(ca.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

/// String view of a column; null and blank cells become `None`
fn categorical_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df
        .column(name)
        .map_err(|_| PlannerError::FeatureNotFound(name.to_string()))?;
    let casted = column.cast(&DataType::String)?;
    let ca = casted.str()?;
    Ok(ca
        .into_iter()
        .map(|v| v.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string))
        .collect())
}

/// Keep only rows that are finite in both matrices
fn drop_incomplete_rows(features: Array2<f64>, targets: Array2<f64>) -> (Array2<f64>, Array2<f64>, usize) {
    let keep: Vec<usize> = (0..features.nrows())
        .filter(|&i| {
            features.row(i).iter().all(|v| v.is_finite()) && targets.row(i).iter().all(|v| v.is_finite())
        })
        .collect();
    let dropped = features.nrows() - keep.len();
    if dropped == 0 {
        return (features, targets, 0);
    }
    (
        features.select(Axis(0), &keep),
        targets.select(Axis(0), &keep),
        dropped,
    )
}
