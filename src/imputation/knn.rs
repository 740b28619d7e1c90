//! KNN-based imputation over NaN-aware euclidean distances

use crate::error::{PlannerError, Result};
use crate::imputation::{is_missing, Imputer};
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Ordered float for the bounded neighbour heap
#[derive(Debug, Clone, Copy)]
struct DistanceIdx(f64, usize);

impl PartialEq for DistanceIdx {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for DistanceIdx {}

impl PartialOrd for DistanceIdx {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DistanceIdx {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max heap by distance, ties by row index so selection is stable
        self.0
            .partial_cmp(&other.0)
            .unwrap_or(Ordering::Equal)
            .then(self.1.cmp(&other.1))
    }
}

/// How neighbour values are averaged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeighborWeights {
    /// Plain mean of the neighbours
    Uniform,
    /// Inverse-distance weighting
    Distance,
}

/// KNN imputer.
///
/// Distances between two rows only use coordinates observed in both and are
/// rescaled by `n_features / n_observed`. For each missing cell the donors
/// are the fitted rows that observe that column; when no donor shares any
/// observed coordinate the column mean is used instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KNNImputer {
    n_neighbors: usize,
    weights: NeighborWeights,
    fit_data: Option<Array2<f64>>,
    column_means: Option<Array1<f64>>,
}

impl KNNImputer {
    pub fn new(n_neighbors: usize) -> Self {
        Self {
            n_neighbors: n_neighbors.max(1),
            weights: NeighborWeights::Distance,
            fit_data: None,
            column_means: None,
        }
    }

    pub fn with_weights(mut self, weights: NeighborWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn n_neighbors(&self) -> usize {
        self.n_neighbors
    }

    /// NaN-aware euclidean distance; `None` when no coordinate is co-observed
    fn nan_euclidean(a: &ArrayView1<f64>, b: &ArrayView1<f64>) -> Option<f64> {
        let mut present = 0usize;
        let mut accum = 0.0f64;

        for (&ai, &bi) in a.iter().zip(b.iter()) {
            if is_missing(ai) || is_missing(bi) {
                continue;
            }
            present += 1;
            let d = ai - bi;
            accum += d * d;
        }

        if present == 0 {
            return None;
        }
        Some((accum * a.len() as f64 / present as f64).sqrt())
    }

    /// k nearest donors for `column`, as (row, distance) pairs
    fn find_donors(
        &self,
        data: &Array2<f64>,
        distances: &[Option<f64>],
        column: usize,
    ) -> Vec<(usize, f64)> {
        let k = self.n_neighbors;
        let mut heap: BinaryHeap<DistanceIdx> = BinaryHeap::with_capacity(k + 1);

        for (i, dist) in distances.iter().enumerate() {
            let Some(dist) = *dist else { continue };
            if is_missing(data[[i, column]]) {
                continue;
            }
            if heap.len() < k {
                heap.push(DistanceIdx(dist, i));
            } else if let Some(&DistanceIdx(max_dist, _)) = heap.peek() {
                if dist < max_dist {
                    heap.pop();
                    heap.push(DistanceIdx(dist, i));
                }
            }
        }

        heap.into_iter().map(|DistanceIdx(d, i)| (i, d)).collect()
    }

    fn impute_value(&self, data: &Array2<f64>, donors: &[(usize, f64)], column: usize, fallback: f64) -> f64 {
        if donors.is_empty() {
            return fallback;
        }

        match self.weights {
            NeighborWeights::Uniform => {
                let sum: f64 = donors.iter().map(|&(idx, _)| data[[idx, column]]).sum();
                sum / donors.len() as f64
            }
            NeighborWeights::Distance => {
                // Exact matches dominate: only zero-distance donors are averaged
                let exact: Vec<f64> = donors
                    .iter()
                    .filter(|&&(_, d)| d == 0.0)
                    .map(|&(idx, _)| data[[idx, column]])
                    .collect();
                if !exact.is_empty() {
                    return exact.iter().sum::<f64>() / exact.len() as f64;
                }

                let mut weighted_sum = 0.0;
                let mut weight_sum = 0.0;
                for &(idx, dist) in donors {
                    let weight = 1.0 / dist;
                    weighted_sum += data[[idx, column]] * weight;
                    weight_sum += weight;
                }
                weighted_sum / weight_sum
            }
        }
    }
}

impl Default for KNNImputer {
    fn default() -> Self {
        Self::new(5)
    }
}

impl Imputer for KNNImputer {
    fn fit(&mut self, x: &Array2<f64>) -> Result<()> {
        if x.nrows() == 0 {
            return Err(PlannerError::PreprocessingError(
                "Cannot fit KNN imputer on an empty matrix".to_string(),
            ));
        }

        let mut means = Array1::zeros(x.ncols());
        for (j, column) in x.columns().into_iter().enumerate() {
            let observed: Vec<f64> = column.iter().copied().filter(|v| !is_missing(*v)).collect();
            if observed.is_empty() {
                return Err(PlannerError::PreprocessingError(format!(
                    "Column {} has no observed values to impute from",
                    j
                )));
            }
            means[j] = observed.iter().sum::<f64>() / observed.len() as f64;
        }

        self.fit_data = Some(x.clone());
        self.column_means = Some(means);
        Ok(())
    }

    fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let (data, means) = match (&self.fit_data, &self.column_means) {
            (Some(d), Some(m)) => (d, m),
            _ => return Err(PlannerError::ModelNotFitted),
        };

        if x.ncols() != data.ncols() {
            return Err(PlannerError::ShapeError {
                expected: format!("{} columns", data.ncols()),
                actual: format!("{} columns", x.ncols()),
            });
        }

        let mut result = x.clone();

        for (row_idx, row) in x.rows().into_iter().enumerate() {
            if !row.iter().any(|&v| is_missing(v)) {
                continue;
            }

            let distances: Vec<Option<f64>> = data
                .rows()
                .into_iter()
                .map(|other| Self::nan_euclidean(&row, &other))
                .collect();

            for (j, &value) in row.iter().enumerate() {
                if !is_missing(value) {
                    continue;
                }
                let donors = self.find_donors(data, &distances, j);
                result[[row_idx, j]] = self.impute_value(data, &donors, j, means[j]);
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knn_imputer_basic() {
        let data = Array2::from_shape_vec(
            (6, 2),
            vec![
                1.0, 10.0,
                2.0, 20.0,
                3.0, 30.0,
                4.0, 40.0,
                f64::NAN, 25.0,
                2.5, f64::NAN,
            ],
        )
        .unwrap();

        let mut imputer = KNNImputer::new(3);
        let result = imputer.fit_transform(&data).unwrap();

        assert!(!result.iter().any(|&v| v.is_nan()));
        assert!(result[[4, 0]] >= 1.0 && result[[4, 0]] <= 4.0);
        assert!(result[[5, 1]] >= 10.0 && result[[5, 1]] <= 40.0);
    }

    #[test]
    fn test_distance_weights_favour_close_rows() {
        let data = Array2::from_shape_vec(
            (5, 2),
            vec![
                0.0, 0.0,
                1.0, 1.0,
                2.0, 2.0,
                3.0, 3.0,
                0.1, f64::NAN,
            ],
        )
        .unwrap();

        let mut imputer = KNNImputer::new(3);
        let result = imputer.fit_transform(&data).unwrap();
        assert!(result[[4, 1]].abs() < 1.0);
    }

    #[test]
    fn test_exact_match_wins() {
        let data = Array2::from_shape_vec(
            (4, 2),
            vec![
                1.0, 7.0,
                5.0, 100.0,
                9.0, 200.0,
                1.0, f64::NAN,
            ],
        )
        .unwrap();

        let mut imputer = KNNImputer::new(3);
        let result = imputer.fit_transform(&data).unwrap();
        assert!((result[[3, 1]] - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_column_falls_back_to_mean() {
        let data = Array2::from_shape_vec((4, 1), vec![2.0, 4.0, f64::NAN, 6.0]).unwrap();

        let mut imputer = KNNImputer::new(5);
        let result = imputer.fit_transform(&data).unwrap();
        assert!((result[[2, 0]] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_uniform_weights() {
        let data = Array2::from_shape_vec(
            (4, 2),
            vec![
                0.0, 2.0,
                1.0, 4.0,
                10.0, 100.0,
                0.5, f64::NAN,
            ],
        )
        .unwrap();

        let mut imputer = KNNImputer::new(2).with_weights(NeighborWeights::Uniform);
        let result = imputer.fit_transform(&data).unwrap();
        assert!((result[[3, 1]] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_all_missing_column_is_rejected() {
        let data = Array2::from_shape_vec((2, 2), vec![1.0, f64::NAN, 2.0, f64::NAN]).unwrap();
        let mut imputer = KNNImputer::default();
        assert!(imputer.fit(&data).is_err());
    }

    #[test]
    fn test_transform_requires_fit() {
        let imputer = KNNImputer::default();
        let data = Array2::<f64>::zeros((1, 1));
        assert!(matches!(imputer.transform(&data), Err(PlannerError::ModelNotFitted)));
    }
}
