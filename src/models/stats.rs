//! CO₂ statistics aggregated from travel legs.
//!
//! Stats are cheap to recompute (one project's worth of legs), so they are
//! derived on every request and never stored.

use crate::models::{Activity, EmissionFactors, TransportMode};
use serde::Serialize;
use std::collections::BTreeMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Anything that contributes distance under one transport mode.
pub trait TravelLeg {
    fn mode(&self) -> TransportMode;
    fn distance_km(&self) -> f64;
}

impl TravelLeg for Activity {
    fn mode(&self) -> TransportMode {
        self.mode
    }

    fn distance_km(&self) -> f64 {
        self.distance_km
    }
}

impl TravelLeg for (TransportMode, f64) {
    fn mode(&self) -> TransportMode {
        self.0
    }

    fn distance_km(&self) -> f64 {
        self.1
    }
}

impl<T: TravelLeg + ?Sized> TravelLeg for &T {
    fn mode(&self) -> TransportMode {
        (**self).mode()
    }

    fn distance_km(&self) -> f64 {
        (**self).distance_km()
    }
}

/// Running totals for one transport mode (or for all of them).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ModeStats {
    /// kg CO₂
    pub co2: f64,
    /// km
    pub distance: f64,
    /// Number of legs
    pub count: u32,
}

impl ModeStats {
    fn add(&mut self, other: ModeStats) {
        self.co2 += other.co2;
        self.distance += other.distance;
        self.count += other.count;
    }
}

/// Per-mode and total CO₂ for a set of legs.
///
/// Every mode is always present, zero-filled when no leg uses it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProjectStats {
    pub modes: BTreeMap<TransportMode, ModeStats>,
    pub total: ModeStats,
}

impl Default for ProjectStats {
    fn default() -> Self {
        Self {
            modes: TransportMode::ALL
                .into_iter()
                .map(|mode| (mode, ModeStats::default()))
                .collect(),
            total: ModeStats::default(),
        }
    }
}

impl ProjectStats {
    /// Aggregate a collection of legs. Order does not matter.
    pub fn aggregate<I>(legs: I, factors: &EmissionFactors) -> Self
    where
        I: IntoIterator,
        I::Item: TravelLeg,
    {
        let mut stats = Self::default();
        for leg in legs {
            stats.record(leg.mode(), leg.distance_km(), factors);
        }
        stats
    }

    /// Add one leg. Distances are validated upstream and never negative.
    pub fn record(&mut self, mode: TransportMode, distance_km: f64, factors: &EmissionFactors) {
        debug_assert!(distance_km >= 0.0, "negative distance reached aggregation");

        let leg = ModeStats {
            co2: factors.co2_kg(mode, distance_km),
            distance: distance_km,
            count: 1,
        };
        self.modes.entry(mode).or_default().add(leg);
        self.total.add(leg);
    }

    /// Stats for a single mode.
    pub fn mode(&self, mode: TransportMode) -> ModeStats {
        self.modes.get(&mode).copied().unwrap_or_default()
    }

    /// Combine two aggregates, e.g. baseline and participant legs.
    pub fn merge(&self, other: &ProjectStats) -> ProjectStats {
        let mut merged = self.clone();
        for (mode, stats) in &other.modes {
            merged.modes.entry(*mode).or_default().add(*stats);
        }
        merged.total.add(other.total);
        merged
    }
}
