// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Travel activity model for storage and API.

use crate::error::AppError;
use crate::models::{TransportMode, TravelDirection};
use crate::validation::{
    normalize_distance_km, validate_direction, validate_distance_km, validate_transport_mode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Who reported a travel leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ActivitySource {
    /// Entered by an organization member; counts towards the baseline.
    Organizer,
    /// Submitted through the public questionnaire.
    Participant,
}

/// Stored travel leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Activity ID (also used as document ID)
    pub id: Uuid,
    /// Owning project
    pub project_id: Uuid,
    pub mode: TransportMode,
    /// Distance in km, one decimal place
    pub distance_km: f64,
    pub direction: TravelDirection,
    /// Participant the leg belongs to. Questionnaire submissions share one ID.
    pub participant_id: Option<Uuid>,
    /// Free-text name given on the questionnaire
    pub participant_name: Option<String>,
    pub source: ActivitySource,
    /// User ID of the organizer who entered the leg
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Activity {
    pub fn is_baseline(&self) -> bool {
        self.source == ActivitySource::Organizer
    }
}

/// One travel leg as entered on a form.
///
/// `mode` and `direction` stay strings until validated so that an unknown
/// value becomes a field error instead of a body rejection.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ActivityEntry {
    #[validate(custom(function = "validate_transport_mode"))]
    pub mode: String,
    #[validate(custom(function = "validate_distance_km"))]
    pub distance_km: f64,
    #[validate(custom(function = "validate_direction"))]
    pub direction: String,
}

/// Parsed, normalized form of a validated [`ActivityEntry`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidLeg {
    pub mode: TransportMode,
    pub distance_km: f64,
    pub direction: TravelDirection,
}

impl ActivityEntry {
    /// Convert a validated entry into typed values.
    ///
    /// Callers run `validate()` first; a parse failure here still maps to a
    /// bad request rather than a panic.
    pub fn to_leg(&self) -> Result<ValidLeg, AppError> {
        let mode = self
            .mode
            .parse::<TransportMode>()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        let direction = self
            .direction
            .parse::<TravelDirection>()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        Ok(ValidLeg {
            mode,
            distance_km: normalize_distance_km(self.distance_km),
            direction,
        })
    }
}

/// Organizer form for a baseline activity.
///
/// Validate `leg` directly so error paths match the questionnaire's.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectActivityForm {
    #[serde(flatten)]
    pub leg: ActivityEntry,
    /// Optional participant this leg is attributed to
    #[serde(default)]
    pub participant_id: Option<Uuid>,
}

/// Activity as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityView {
    pub id: Uuid,
    pub mode: TransportMode,
    pub icon: String,
    pub distance_km: f64,
    pub direction: TravelDirection,
    pub source: ActivitySource,
    pub participant_id: Option<Uuid>,
    pub participant_name: Option<String>,
    pub co2_kg: f64,
}

impl ActivityView {
    pub fn new(activity: &Activity, factors: &crate::models::EmissionFactors) -> Self {
        Self {
            id: activity.id,
            mode: activity.mode,
            icon: activity.mode.icon().to_string(),
            distance_km: activity.distance_km,
            direction: activity.direction,
            source: activity.source,
            participant_id: activity.participant_id,
            participant_name: activity.participant_name.clone(),
            co2_kg: factors.co2_kg(activity.mode, activity.distance_km),
        }
    }
}
