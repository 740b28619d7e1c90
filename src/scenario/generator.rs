//! Cluster the processed dataset and turn each cluster into a scenario

use super::{synthesize_sites, ClusterStats, Scenario, ScenarioConfig};
use crate::clustering::KMeans;
use crate::error::{PlannerError, Result};
use crate::preprocessing::{
    ProcessedData, StandardScaler, DAMAGE_AREA, HUMIDITY, REQUIRED_RESOURCES, SLOPE, WIND_SPEED,
};
use ndarray::{Array2, Axis};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

/// Builds weighted scenarios from processed incident data
#[derive(Debug, Clone)]
pub struct ScenarioGenerator {
    config: ScenarioConfig,
    fuel_prefix: String,
    damage_prefix: String,
}

impl Default for ScenarioGenerator {
    fn default() -> Self {
        Self::new(ScenarioConfig::default())
    }
}

impl ScenarioGenerator {
    pub fn new(config: ScenarioConfig) -> Self {
        Self {
            config,
            fuel_prefix: "fuel".to_string(),
            damage_prefix: "damage".to_string(),
        }
    }

    /// Indicator column prefixes used to recover dominant categories
    pub fn with_prefixes(mut self, fuel: impl Into<String>, damage: impl Into<String>) -> Self {
        self.fuel_prefix = fuel.into();
        self.damage_prefix = damage.into();
        self
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// Cluster and synthesize sites; returns the scenarios and the site seed used
    pub fn generate(&self, data: &ProcessedData) -> Result<(Vec<Scenario>, u64)> {
        let stats = self.cluster_stats(data)?;

        let seed = self.config.site_seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        info!(site_seed = seed, scenarios = stats.len(), "Synthesizing incident sites");

        let scenarios = stats
            .into_iter()
            .enumerate()
            .map(|(id, stats)| {
                let sites = synthesize_sites(&stats, &self.config.base_station, &self.config, &mut rng);
                debug!(scenario = id, sites = sites.len(), probability = stats.probability, "Scenario built");
                Scenario {
                    id,
                    probability: stats.probability,
                    base_station: self.config.base_station.clone(),
                    sites,
                    stats,
                }
            })
            .collect();

        Ok((scenarios, seed))
    }

    /// Per-cluster statistics, one entry per non-empty cluster
    pub fn cluster_stats(&self, data: &ProcessedData) -> Result<Vec<ClusterStats>> {
        let n_rows = data.n_rows();
        if n_rows == 0 {
            return Err(PlannerError::ClusteringError("No rows to cluster".to_string()));
        }
        if data.targets.nrows() != n_rows {
            return Err(PlannerError::ShapeError {
                expected: format!("{} target rows", n_rows),
                actual: format!("{} target rows", data.targets.nrows()),
            });
        }

        let n_clusters = self.config.n_scenarios.clamp(1, n_rows);
        let scaled = StandardScaler::new().fit_transform(&data.features)?;
        let labels = KMeans::new(n_clusters)
            .with_max_iter(self.config.max_iter)
            .with_tol(self.config.tol)
            .with_random_state(self.config.kmeans_seed)
            .fit_predict(&scaled)?;

        let wind = position_of(&data.feature_names, WIND_SPEED)?;
        let slope = position_of(&data.feature_names, SLOPE)?;
        let humidity = position_of(&data.feature_names, HUMIDITY)?;
        let required = position_of(&data.target_names, REQUIRED_RESOURCES)?;
        let area = position_of(&data.target_names, DAMAGE_AREA)?;
        let fuel_cols = data.indicator_columns(&self.fuel_prefix);
        let damage_cols = data.indicator_columns(&self.damage_prefix);

        let mut stats = Vec::with_capacity(n_clusters);
        for cluster in 0..n_clusters {
            let members: Vec<usize> = labels
                .iter()
                .enumerate()
                .filter(|(_, &l)| l == cluster)
                .map(|(i, _)| i)
                .collect();
            if members.is_empty() {
                debug!(cluster, "Skipping empty cluster");
                continue;
            }

            let features = data.features.select(Axis(0), &members);
            let targets = data.targets.select(Axis(0), &members);
            let mean = |m: &Array2<f64>, j: usize| m.column(j).mean().unwrap_or(0.0);

            stats.push(ClusterStats {
                wind_speed: (mean(&features, wind) * 5.0).clamp(0.0, 20.0),
                slope: (mean(&features, slope) * 45.0).clamp(0.0, 30.0),
                humidity: (mean(&features, humidity) * 20.0 + 50.0).clamp(20.0, 80.0),
                required_resources: (mean(&targets, required).trunc().max(0.0) as u32).clamp(1, 10),
                damage_area: mean(&targets, area).clamp(0.0, 1000.0),
                fuel_type: self.dominant_category(&features, &fuel_cols, &self.fuel_prefix),
                damage_class: self.dominant_category(&features, &damage_cols, &self.damage_prefix),
                probability: members.len() as f64 / n_rows as f64,
                size: members.len(),
            });
        }

        Ok(stats)
    }

    /// Code of the indicator column with the largest sum (first on ties)
    fn dominant_category(&self, features: &Array2<f64>, columns: &[(usize, &str)], prefix: &str) -> i64 {
        let mut best: Option<(f64, &str)> = None;
        for &(j, name) in columns {
            let total = features.column(j).sum();
            if best.map_or(true, |(b, _)| total > b) {
                best = Some((total, name));
            }
        }

        best.and_then(|(_, name)| parse_category_code(name, prefix))
            .unwrap_or(self.config.default_category)
    }
}

fn position_of(names: &[String], name: &str) -> Result<usize> {
    names
        .iter()
        .position(|n| n == name)
        .ok_or_else(|| PlannerError::FeatureNotFound(name.to_string()))
}

/// Numeric code from an indicator column name such as `fuel_3` or `fuel_3.0`
fn parse_category_code(column: &str, prefix: &str) -> Option<i64> {
    let suffix = column.strip_prefix(prefix)?.strip_prefix('_')?;
    if let Ok(code) = suffix.parse::<i64>() {
        return Some(code);
    }
    suffix
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v.trunc() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn data() -> ProcessedData {
        ProcessedData {
            feature_names: vec![
                WIND_SPEED.to_string(),
                HUMIDITY.to_string(),
                SLOPE.to_string(),
                "fuel_1".to_string(),
                "fuel_7".to_string(),
                "damage_x".to_string(),
            ],
            features: array![
                [1.0, 0.5, 0.1, 1.0, 0.0, 1.0],
                [1.2, 0.4, 0.2, 0.0, 1.0, 1.0],
                [1.1, 0.6, 0.1, 0.0, 1.0, 1.0],
                [9.0, -0.5, 0.9, 1.0, 0.0, 1.0],
            ],
            target_names: vec![REQUIRED_RESOURCES.to_string(), DAMAGE_AREA.to_string()],
            targets: array![[4.0, 1.0], [5.0, 2.0], [6.0, 3.0], [20.0, 5000.0]],
            dropped_rows: 0,
        }
    }

    #[test]
    fn test_parse_category_code() {
        assert_eq!(parse_category_code("fuel_3", "fuel"), Some(3));
        assert_eq!(parse_category_code("fuel_3.0", "fuel"), Some(3));
        assert_eq!(parse_category_code("fuel_abc", "fuel"), None);
        assert_eq!(parse_category_code("damage_2", "fuel"), None);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let generator = ScenarioGenerator::new(ScenarioConfig::default().with_n_scenarios(2));
        let stats = generator.cluster_stats(&data()).unwrap();
        let total: f64 = stats.iter().map(|s| s.probability).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert_eq!(stats.iter().map(|s| s.size).sum::<usize>(), 4);
    }

    #[test]
    fn test_cluster_count_clamped_to_rows() {
        let generator = ScenarioGenerator::new(ScenarioConfig::default().with_n_scenarios(50));
        let stats = generator.cluster_stats(&data()).unwrap();
        assert!(stats.len() <= 4);
    }

    #[test]
    fn test_stat_ranges_and_default_category() {
        let generator = ScenarioGenerator::new(ScenarioConfig::default().with_n_scenarios(1));
        let stats = generator.cluster_stats(&data()).unwrap();
        assert_eq!(stats.len(), 1);
        let s = &stats[0];

        assert!((0.0..=20.0).contains(&s.wind_speed));
        assert!((0.0..=30.0).contains(&s.slope));
        assert!((20.0..=80.0).contains(&s.humidity));
        assert_eq!(s.required_resources, 8); // mean 8.75 truncated
        assert_eq!(s.damage_area, 1000.0);
        // fuel_1 and fuel_7 both sum to 2, first wins
        assert_eq!(s.fuel_type, 1);
        // damage_x does not parse
        assert_eq!(s.damage_class, 1);
    }

    #[test]
    fn test_generate_with_seed_is_reproducible() {
        let config = ScenarioConfig::default().with_n_scenarios(2).with_site_seed(11);
        let generator = ScenarioGenerator::new(config);
        let (a, seed_a) = generator.generate(&data()).unwrap();
        let (b, seed_b) = generator.generate(&data()).unwrap();
        assert_eq!(seed_a, 11);
        assert_eq!(seed_a, seed_b);
        assert_eq!(a, b);
        for (i, scenario) in a.iter().enumerate() {
            assert_eq!(scenario.id, i);
            assert!((1..=3).contains(&scenario.sites.len()));
        }
    }
}
