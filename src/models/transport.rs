// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Transport modes and travel directions for activity legs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Closed set of transport modes that have an emission factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum TransportMode {
    Car,
    Bus,
    Train,
    Boat,
}

impl TransportMode {
    /// Every mode, in display order.
    pub const ALL: [TransportMode; 4] = [
        TransportMode::Car,
        TransportMode::Bus,
        TransportMode::Train,
        TransportMode::Boat,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TransportMode::Car => "car",
            TransportMode::Bus => "bus",
            TransportMode::Train => "train",
            TransportMode::Boat => "boat",
        }
    }

    /// Icon identifier used by the frontend breakdown.
    pub fn icon(self) -> &'static str {
        match self {
            TransportMode::Car => "car",
            TransportMode::Bus => "bus",
            TransportMode::Train => "train-front",
            TransportMode::Boat => "ship",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "car" => Ok(TransportMode::Car),
            "bus" => Ok(TransportMode::Bus),
            "train" => Ok(TransportMode::Train),
            "boat" => Ok(TransportMode::Boat),
            other => Err(UnknownVariant {
                kind: "transport mode",
                value: other.to_string(),
            }),
        }
    }
}

/// Whether a leg travels to the project venue or back home.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum TravelDirection {
    Arrival,
    Departure,
}

impl TravelDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            TravelDirection::Arrival => "arrival",
            TravelDirection::Departure => "departure",
        }
    }
}

impl fmt::Display for TravelDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelDirection {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "arrival" => Ok(TravelDirection::Arrival),
            "departure" => Ok(TravelDirection::Departure),
            other => Err(UnknownVariant {
                kind: "travel direction",
                value: other.to_string(),
            }),
        }
    }
}

/// A string that does not name any variant of a closed enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
