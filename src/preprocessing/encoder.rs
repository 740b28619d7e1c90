//! One-hot encoding of categorical columns

use crate::error::{PlannerError, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// One-hot encoder producing `<prefix>_<category>` indicator columns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneHotEncoder {
    prefix: String,
    categories: Vec<String>,
    is_fitted: bool,
}

impl OneHotEncoder {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            categories: Vec::new(),
            is_fitted: false,
        }
    }

    /// Learn the categories, sorted lexicographically
    pub fn fit(&mut self, values: &[String]) -> Result<&mut Self> {
        let mut categories: Vec<String> = values.to_vec();
        categories.sort();
        categories.dedup();
        self.categories = categories;
        self.is_fitted = true;
        Ok(self)
    }

    /// Indicator matrix (rows × categories); unseen categories encode as all zeros
    pub fn transform(&self, values: &[String]) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(PlannerError::ModelNotFitted);
        }

        let mut out = Array2::zeros((values.len(), self.categories.len()));
        for (i, v) in values.iter().enumerate() {
            if let Ok(j) = self.categories.binary_search(v) {
                out[[i, j]] = 1.0;
            }
        }
        Ok(out)
    }

    pub fn fit_transform(&mut self, values: &[String]) -> Result<Array2<f64>> {
        self.fit(values)?;
        self.transform(values)
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Output column names in matrix order
    pub fn feature_names(&self) -> Vec<String> {
        self.categories
            .iter()
            .map(|c| format!("{}_{}", self.prefix, c))
            .collect()
    }
}
