//! Missing value imputation
//!
//! Numeric gaps are filled by [`KNNImputer`]; categorical gaps are handled
//! by the mode imputer in [`crate::preprocessing`].

mod knn;

pub use knn::{KNNImputer, NeighborWeights};

use crate::error::Result;
use ndarray::Array2;

/// Trait for numeric imputers working on `NaN`-marked matrices
pub trait Imputer {
    /// Fit the imputer on data with missing values
    fn fit(&mut self, x: &Array2<f64>) -> Result<()>;

    /// Transform data by imputing missing values
    fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>>;

    /// Fit and transform in one step
    fn fit_transform(&mut self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(x)?;
        self.transform(x)
    }
}

/// Check if value is missing (NaN)
#[inline]
pub fn is_missing(v: f64) -> bool {
    v.is_nan()
}

/// Count missing cells in a matrix
pub fn count_missing(x: &Array2<f64>) -> usize {
    x.iter().filter(|&&v| is_missing(v)).count()
}
