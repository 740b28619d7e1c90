//! Most-frequent imputation for categorical columns

use crate::error::{PlannerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Replaces missing categories with the column mode
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModeImputer {
    fill_value: Option<String>,
    /// Used when the column has no observed values
    fallback: Option<String>,
}

impl ModeImputer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    /// Learn the mode; ties go to the value seen first
    pub fn fit(&mut self, values: &[Option<String>]) -> Result<&mut Self> {
        let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
        for (pos, val) in values.iter().enumerate() {
            if let Some(v) = val {
                counts.entry(v.as_str()).or_insert((0, pos)).0 += 1;
            }
        }

        let mode = counts
            .into_iter()
            .max_by(|(_, (ca, pa)), (_, (cb, pb))| ca.cmp(cb).then(pb.cmp(pa)))
            .map(|(k, _)| k.to_string());

        let mode = match (mode, &self.fallback) {
            (Some(mode), _) => mode,
            (None, Some(fallback)) => {
                warn!(fill = %fallback, "Categorical column has no values, using fallback category");
                fallback.clone()
            }
            (None, None) => {
                return Err(PlannerError::PreprocessingError(
                    "Cannot compute mode of a column without values".to_string(),
                ))
            }
        };

        self.fill_value = Some(mode);
        Ok(self)
    }

    pub fn transform(&self, values: &[Option<String>]) -> Result<Vec<String>> {
        let fill = self.fill_value.as_ref().ok_or(PlannerError::ModelNotFitted)?;
        Ok(values
            .iter()
            .map(|v| v.clone().unwrap_or_else(|| fill.clone()))
            .collect())
    }

    pub fn fit_transform(&mut self, values: &[Option<String>]) -> Result<Vec<String>> {
        self.fit(values)?;
        self.transform(values)
    }

    pub fn fill_value(&self) -> Option<&str> {
        self.fill_value.as_deref()
    }
}
