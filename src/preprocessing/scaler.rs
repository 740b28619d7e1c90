//! Feature scaling

use crate::error::{PlannerError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Z-score scaler: (x - mean) / std, population std
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Option<Array1<f64>>,
    scales: Option<Array1<f64>>,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit per-column mean and std; zero-variance columns keep scale 1
    pub fn fit(&mut self, x: &Array2<f64>) -> Result<&mut Self> {
        if x.nrows() == 0 {
            return Err(PlannerError::PreprocessingError(
                "Cannot fit scaler on an empty matrix".to_string(),
            ));
        }

        let means = x
            .mean_axis(Axis(0))
            .ok_or_else(|| PlannerError::PreprocessingError("Failed to compute means".to_string()))?;
        let scales = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s == 0.0 || !s.is_finite() { 1.0 } else { s });

        self.means = Some(means);
        self.scales = Some(scales);
        Ok(self)
    }

    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let (means, scales) = self.params()?;
        if x.ncols() != means.len() {
            return Err(PlannerError::ShapeError {
                expected: format!("{} columns", means.len()),
                actual: format!("{} columns", x.ncols()),
            });
        }
        Ok((x - means) / scales)
    }

    pub fn fit_transform(&mut self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(x)?;
        self.transform(x)
    }

    pub fn inverse_transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let (means, scales) = self.params()?;
        Ok(x * scales + means)
    }

    fn params(&self) -> Result<(&Array1<f64>, &Array1<f64>)> {
        match (&self.means, &self.scales) {
            (Some(m), Some(s)) => Ok((m, s)),
            _ => Err(PlannerError::ModelNotFitted),
        }
    }
}
