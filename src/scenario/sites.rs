//! Synthetic incident sites

use super::{BaseStation, ClusterStats, RiskFactors, ScenarioConfig, Site};
use crate::allocation::TruckType;
use rand::Rng;
use std::collections::BTreeMap;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in km
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Place sites for a cluster and derive demand and per-truck distances.
///
/// Site count is `required_resources / 3` clamped to `[1, max_sites]`; each
/// site's demand is the per-site share plus a jitter in {-1, 0, 1}, clamped
/// to `[1, max_demand]`.
pub fn synthesize_sites<R: Rng>(
    stats: &ClusterStats,
    base: &BaseStation,
    config: &ScenarioConfig,
    rng: &mut R,
) -> BTreeMap<String, Site> {
    let max_sites = config.max_sites.max(1);
    let max_demand = config.max_demand.max(1);
    let num_sites = (stats.required_resources / 3).clamp(1, max_sites);
    let base_demand = (stats.required_resources / num_sites).max(1);
    let region = &config.region;

    (1..=num_sites)
        .map(|i| {
            let jitter: i64 = rng.gen_range(-1..=1);
            let demand = (base_demand as i64 + jitter).clamp(1, max_demand as i64) as u32;

            let latitude = rng.gen_range(region.min_lat..=region.max_lat);
            let longitude = rng.gen_range(region.min_lon..=region.max_lon);
            let base_distance = haversine_km(base.latitude, base.longitude, latitude, longitude);

            let distances = TruckType::ALL
                .iter()
                .map(|&truck| {
                    let variation = if config.distance_jitter > 0.0 {
                        rng.gen_range(-config.distance_jitter..=config.distance_jitter)
                    } else {
                        0.0
                    };
                    let d = (base_distance * (1.0 + variation))
                        .clamp(config.min_distance_km, config.max_distance_km);
                    (truck, d)
                })
                .collect();

            let site = Site {
                demand,
                distances,
                risk: RiskFactors::from(stats),
                latitude,
                longitude,
            };
            (format!("site{}", i), site)
        })
        .collect()
}
