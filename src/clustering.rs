//! K-Means clustering used to partition incidents into scenarios

use crate::error::{PlannerError, Result};
use ndarray::{Array2, ArrayView1};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// K-Means with k-means++ initialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KMeans {
    pub n_clusters: usize,
    pub max_iter: usize,
    pub tol: f64,
    pub random_state: u64,
    /// Fitted cluster centroids (n_clusters × n_features)
    centroids: Option<Array2<f64>>,
    /// Cluster label per fitted row
    labels: Option<Vec<usize>>,
    /// Sum of squared distances to nearest centroid
    inertia: Option<f64>,
    n_iter: usize,
}

impl Default for KMeans {
    fn default() -> Self {
        Self::new(5)
    }
}

impl KMeans {
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            max_iter: 300,
            tol: 1e-4,
            random_state: 42,
            centroids: None,
            labels: None,
            inertia: None,
            n_iter: 0,
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    /// K-means++: spread initial centroids proportionally to D²
    fn kmeans_pp_init(x: &Array2<f64>, k: usize, rng: &mut ChaCha8Rng) -> Array2<f64> {
        let n_samples = x.nrows();
        let mut centroids = Array2::zeros((k, x.ncols()));

        let first = rng.gen_range(0..n_samples);
        centroids.row_mut(0).assign(&x.row(first));

        for c in 1..k {
            let dists: Vec<f64> = x
                .rows()
                .into_iter()
                .map(|row| {
                    (0..c)
                        .map(|j| euclidean_sq(&row, &centroids.row(j)))
                        .fold(f64::MAX, f64::min)
                })
                .collect();

            let total: f64 = dists.iter().sum();
            if total <= 0.0 {
                let idx = rng.gen_range(0..n_samples);
                centroids.row_mut(c).assign(&x.row(idx));
                continue;
            }

            let r = rng.gen::<f64>() * total;
            let mut cumulative = 0.0;
            let mut chosen = n_samples - 1;
            for (i, &d) in dists.iter().enumerate() {
                cumulative += d;
                if cumulative >= r && d > 0.0 {
                    chosen = i;
                    break;
                }
            }
            centroids.row_mut(c).assign(&x.row(chosen));
        }

        centroids
    }

    fn nearest(row: &ArrayView1<f64>, centroids: &Array2<f64>) -> (usize, f64) {
        centroids
            .rows()
            .into_iter()
            .enumerate()
            .map(|(c, centroid)| (c, euclidean_sq(row, &centroid)))
            .fold((0, f64::MAX), |best, cur| if cur.1 < best.1 { cur } else { best })
    }

    /// Fit on the rows of `x`
    pub fn fit(&mut self, x: &Array2<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        if self.n_clusters == 0 {
            return Err(PlannerError::InvalidParameter {
                name: "n_clusters".to_string(),
                value: "0".to_string(),
                reason: "at least one cluster is required".to_string(),
            });
        }
        if n_samples < self.n_clusters {
            return Err(PlannerError::ClusteringError(format!(
                "n_samples ({}) < n_clusters ({})",
                n_samples, self.n_clusters
            )));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.random_state);
        let mut centroids = Self::kmeans_pp_init(x, self.n_clusters, &mut rng);
        let mut labels = vec![usize::MAX; n_samples];
        let mut n_iter = 0;

        for iter in 0..self.max_iter {
            n_iter = iter + 1;

            // Assignment step
            let new_labels: Vec<usize> = x
                .rows()
                .into_iter()
                .map(|row| Self::nearest(&row, &centroids).0)
                .collect();
            let changed = new_labels.iter().zip(labels.iter()).filter(|(a, b)| a != b).count();
            labels = new_labels;

            // Update step
            let mut new_centroids = Array2::zeros(centroids.dim());
            let mut counts = vec![0usize; self.n_clusters];
            for (i, &c) in labels.iter().enumerate() {
                counts[c] += 1;
                let mut target = new_centroids.row_mut(c);
                target += &x.row(i);
            }
            for (c, &count) in counts.iter().enumerate() {
                if count > 0 {
                    new_centroids.row_mut(c).mapv_inplace(|v| v / count as f64);
                } else {
                    // Empty cluster: reseed from a random row
                    let idx = rng.gen_range(0..n_samples);
                    new_centroids.row_mut(c).assign(&x.row(idx));
                }
            }

            let shift: f64 = centroids
                .iter()
                .zip(new_centroids.iter())
                .map(|(a, b)| (a - b).powi(2))
                .sum::<f64>()
                .sqrt();
            centroids = new_centroids;

            if changed == 0 || shift < self.tol {
                break;
            }
        }

        // Final assignment against the converged centroids
        let mut inertia = 0.0;
        for (i, row) in x.rows().into_iter().enumerate() {
            let (c, d) = Self::nearest(&row, &centroids);
            labels[i] = c;
            inertia += d;
        }

        debug!(n_clusters = self.n_clusters, n_iter, inertia, "K-Means converged");

        self.centroids = Some(centroids);
        self.labels = Some(labels);
        self.inertia = Some(inertia);
        self.n_iter = n_iter;
        Ok(self)
    }

    /// Fit and return the label of every row
    pub fn fit_predict(&mut self, x: &Array2<f64>) -> Result<Vec<usize>> {
        self.fit(x)?;
        self.labels.clone().ok_or(PlannerError::ModelNotFitted)
    }

    /// Assign new rows to the nearest fitted centroid
    pub fn predict(&self, x: &Array2<f64>) -> Result<Vec<usize>> {
        let centroids = self.centroids.as_ref().ok_or(PlannerError::ModelNotFitted)?;
        Ok(x
            .rows()
            .into_iter()
            .map(|row| Self::nearest(&row, centroids).0)
            .collect())
    }

    pub fn centroids(&self) -> Option<&Array2<f64>> {
        self.centroids.as_ref()
    }

    pub fn labels(&self) -> Option<&[usize]> {
        self.labels.as_deref()
    }

    pub fn inertia(&self) -> Option<f64> {
        self.inertia
    }

    pub fn n_iter(&self) -> usize {
        self.n_iter
    }
}

fn euclidean_sq(a: &ArrayView1<f64>, b: &ArrayView1<f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_blobs() -> Array2<f64> {
        Array2::from_shape_vec(
            (6, 2),
            vec![
                0.0, 0.0,
                0.1, 0.2,
                0.2, 0.1,
                10.0, 10.0,
                10.1, 9.9,
                9.8, 10.2,
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_kmeans_separates_blobs() {
        let x = two_blobs();
        let mut km = KMeans::new(2);
        let labels = km.fit_predict(&x).unwrap();

        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[1], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_eq!(labels[4], labels[5]);
        assert_ne!(labels[0], labels[3]);
        assert!(km.inertia().unwrap() < 1.0);
    }

    #[test]
    fn test_kmeans_is_deterministic_for_seed() {
        let x = two_blobs();
        let a = KMeans::new(2).with_random_state(7).fit_predict(&x).unwrap();
        let b = KMeans::new(2).with_random_state(7).fit_predict(&x).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_predict_matches_fit_labels() {
        let x = two_blobs();
        let mut km = KMeans::new(2);
        let labels = km.fit_predict(&x).unwrap();
        assert_eq!(km.predict(&x).unwrap(), labels);
    }

    #[test]
    fn test_too_few_samples() {
        let x = Array2::zeros((2, 2));
        assert!(KMeans::new(3).fit(&x).is_err());
    }

    #[test]
    fn test_predict_before_fit() {
        let km = KMeans::new(2);
        assert!(matches!(km.predict(&two_blobs()), Err(PlannerError::ModelNotFitted)));
    }
}
