//! Deployable resource catalogue
//!
//! Truck and firefighter-team types are fixed; their characteristics are
//! compile-time constants.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fire truck type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TruckType {
    FT1,
    FT2,
    FT3,
    FT4,
    FT5,
    FT6,
}

/// Physical and cost characteristics of a truck type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TruckSpec {
    /// Water tank capacity in litres
    pub capacity: u32,
    /// Crew seats
    pub personnel: u32,
    /// km per litre
    pub fuel_efficiency: f64,
    /// km/h
    pub speed: f64,
    /// Cost per deployment
    pub cost: f64,
}

impl TruckType {
    pub const ALL: [TruckType; 6] = [
        TruckType::FT1,
        TruckType::FT2,
        TruckType::FT3,
        TruckType::FT4,
        TruckType::FT5,
        TruckType::FT6,
    ];

    pub const fn spec(self) -> TruckSpec {
        match self {
            TruckType::FT1 => TruckSpec { capacity: 1000, personnel: 4, fuel_efficiency: 8.0, speed: 70.0, cost: 5000.0 },
            TruckType::FT2 => TruckSpec { capacity: 1200, personnel: 5, fuel_efficiency: 7.0, speed: 65.0, cost: 6000.0 },
            TruckType::FT3 => TruckSpec { capacity: 1500, personnel: 6, fuel_efficiency: 6.0, speed: 60.0, cost: 7000.0 },
            TruckType::FT4 => TruckSpec { capacity: 1800, personnel: 7, fuel_efficiency: 5.0, speed: 55.0, cost: 8000.0 },
            TruckType::FT5 => TruckSpec { capacity: 2000, personnel: 8, fuel_efficiency: 4.0, speed: 50.0, cost: 9000.0 },
            TruckType::FT6 => TruckSpec { capacity: 2500, personnel: 9, fuel_efficiency: 3.0, speed: 45.0, cost: 10000.0 },
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            TruckType::FT1 => "FT1",
            TruckType::FT2 => "FT2",
            TruckType::FT3 => "FT3",
            TruckType::FT4 => "FT4",
            TruckType::FT5 => "FT5",
            TruckType::FT6 => "FT6",
        }
    }
}

impl fmt::Display for TruckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Firefighter team type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FirefighterType {
    FF1,
    FF2,
    FF3,
    FF4,
    FF5,
    FF6,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FirefighterSpec {
    /// Maximum deployments across all sites of a scenario
    pub max_deployments: u32,
    /// Cost per deployment
    pub cost: f64,
}

impl FirefighterType {
    pub const ALL: [FirefighterType; 6] = [
        FirefighterType::FF1,
        FirefighterType::FF2,
        FirefighterType::FF3,
        FirefighterType::FF4,
        FirefighterType::FF5,
        FirefighterType::FF6,
    ];

    pub const fn spec(self) -> FirefighterSpec {
        FirefighterSpec { max_deployments: 3, cost: 2000.0 }
    }

    /// Truck type whose travel distance is reported for this team
    pub const fn paired_truck(self) -> TruckType {
        match self {
            FirefighterType::FF1 => TruckType::FT1,
            FirefighterType::FF2 => TruckType::FT2,
            FirefighterType::FF3 => TruckType::FT3,
            FirefighterType::FF4 => TruckType::FT4,
            FirefighterType::FF5 => TruckType::FT5,
            FirefighterType::FF6 => TruckType::FT6,
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            FirefighterType::FF1 => "FF1",
            FirefighterType::FF2 => "FF2",
            FirefighterType::FF3 => "FF3",
            FirefighterType::FF4 => "FF4",
            FirefighterType::FF5 => "FF5",
            FirefighterType::FF6 => "FF6",
        }
    }
}

impl fmt::Display for FirefighterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truck_specs_grow_with_type() {
        for pair in TruckType::ALL.windows(2) {
            let (a, b) = (pair[0].spec(), pair[1].spec());
            assert!(b.personnel > a.personnel);
            assert!(b.cost > a.cost);
            assert!(b.speed < a.speed);
        }
    }

    #[test]
    fn test_firefighter_pairing() {
        for (ff, ft) in FirefighterType::ALL.iter().zip(TruckType::ALL.iter()) {
            assert_eq!(ff.paired_truck(), *ft);
            assert_eq!(ff.spec().max_deployments, 3);
        }
    }

    #[test]
    fn test_codes_serialize_as_names() {
        let json = serde_json::to_string(&TruckType::FT3).unwrap();
        assert_eq!(json, "\"FT3\"");
        assert_eq!(FirefighterType::FF6.to_string(), "FF6");
    }
}
