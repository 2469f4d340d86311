// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-kilometre CO₂ emission factors.

use crate::models::TransportMode;
use serde::{Deserialize, Serialize};

/// kg CO₂ per passenger-km by car.
pub const CAR_KG_PER_KM: f64 = 0.192;
/// kg CO₂ per passenger-km by bus.
pub const BUS_KG_PER_KM: f64 = 0.089;
/// kg CO₂ per passenger-km by train.
pub const TRAIN_KG_PER_KM: f64 = 0.041;
/// kg CO₂ per passenger-km by boat.
pub const BOAT_KG_PER_KM: f64 = 0.115;

/// Emission factor for every transport mode (kg CO₂ per passenger-km).
///
/// Built once with the rest of [`crate::config::Config`] and shared by reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmissionFactors {
    pub car: f64,
    pub bus: f64,
    pub train: f64,
    pub boat: f64,
}

impl Default for EmissionFactors {
    fn default() -> Self {
        Self {
            car: CAR_KG_PER_KM,
            bus: BUS_KG_PER_KM,
            train: TRAIN_KG_PER_KM,
            boat: BOAT_KG_PER_KM,
        }
    }
}

impl EmissionFactors {
    pub fn factor(&self, mode: TransportMode) -> f64 {
        match mode {
            TransportMode::Car => self.car,
            TransportMode::Bus => self.bus,
            TransportMode::Train => self.train,
            TransportMode::Boat => self.boat,
        }
    }

    pub fn set_factor(&mut self, mode: TransportMode, kg_per_km: f64) {
        let slot = match mode {
            TransportMode::Car => &mut self.car,
            TransportMode::Bus => &mut self.bus,
            TransportMode::Train => &mut self.train,
            TransportMode::Boat => &mut self.boat,
        };
        *slot = kg_per_km;
    }

    /// CO₂ in kg for one leg.
    pub fn co2_kg(&self, mode: TransportMode, distance_km: f64) -> f64 {
        distance_km * self.factor(mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_factors() {
        let factors = EmissionFactors::default();
        assert_eq!(factors.factor(TransportMode::Car), 0.192);
        assert_eq!(factors.factor(TransportMode::Train), 0.041);
        assert_eq!(factors.factor(TransportMode::Bus), 0.089);
        assert_eq!(factors.factor(TransportMode::Boat), 0.115);
    }

    #[test]
    fn test_all_factors_positive() {
        let factors = EmissionFactors::default();
        for mode in TransportMode::ALL {
            assert!(factors.factor(mode) > 0.0, "{mode} has no positive factor");
        }
    }

    #[test]
    fn test_set_factor_only_touches_one_mode() {
        let mut factors = EmissionFactors::default();
        factors.set_factor(TransportMode::Bus, 0.1);

        assert_eq!(factors.bus, 0.1);
        assert_eq!(factors.car, CAR_KG_PER_KM);
        assert_eq!(factors.train, TRAIN_KG_PER_KM);
        assert_eq!(factors.boat, BOAT_KG_PER_KM);
    }

    #[test]
    fn test_co2_for_leg() {
        let factors = EmissionFactors::default();
        assert!((factors.co2_kg(TransportMode::Car, 10.0) - 1.92).abs() < 1e-9);
    }
}
