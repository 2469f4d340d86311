// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Field validators shared by the request forms.
//!
//! These plug into `validator` derives via `#[validate(custom(function = ...))]`.

use crate::models::{TransportMode, TravelDirection};
use std::borrow::Cow;
use validator::ValidationError;

/// Smallest distance a leg may have.
pub const MIN_DISTANCE_KM: f64 = 0.1;
/// Distances are entered with one decimal place.
pub const DISTANCE_STEP_KM: f64 = 0.1;
/// Upper bound on a single leg (roughly once around the Earth).
pub const MAX_DISTANCE_KM: f64 = 40_000.0;

// Absorbs binary rounding of decimal inputs such as 12.3 / 0.1.
const STEP_TOLERANCE: f64 = 1e-6;

/// Check whether `value` is an integer multiple of `step`, tolerating float rounding.
pub fn is_multiple_of_step(value: f64, step: f64) -> bool {
    if !value.is_finite() || !step.is_finite() || step <= 0.0 {
        return false;
    }
    let ratio = value / step;
    (ratio - ratio.round()).abs() < STEP_TOLERANCE
}

/// Round a validated distance to its one-decimal representation.
pub fn normalize_distance_km(distance_km: f64) -> f64 {
    (distance_km * 10.0).round() / 10.0
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

pub fn validate_distance_km(distance_km: f64) -> Result<(), ValidationError> {
    if !distance_km.is_finite() || distance_km < MIN_DISTANCE_KM {
        return Err(error(
            "distance_too_small",
            "Distance must be at least 0.1 km",
        ));
    }
    if distance_km > MAX_DISTANCE_KM {
        return Err(error(
            "distance_too_large",
            "Distance must be at most 40000 km",
        ));
    }
    if !is_multiple_of_step(distance_km, DISTANCE_STEP_KM) {
        return Err(error(
            "distance_step",
            "Distance must have at most one decimal place",
        ));
    }
    Ok(())
}

pub fn validate_transport_mode(mode: &str) -> Result<(), ValidationError> {
    mode.parse::<TransportMode>()
        .map(|_| ())
        .map_err(|_| error("transport_mode", "Choose one of car, bus, train or boat"))
}

pub fn validate_direction(direction: &str) -> Result<(), ValidationError> {
    direction
        .parse::<TravelDirection>()
        .map(|_| ())
        .map_err(|_| error("direction", "Choose arrival or departure"))
}

/// ISO 3166-1 alpha-2 code, either case.
pub fn validate_country_code(country: &str) -> Result<(), ValidationError> {
    if country.len() == 2 && country.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(error("country", "Use a two-letter country code"))
    }
}

pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    let valid_chars = slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    let valid_edges = !slug.starts_with('-') && !slug.ends_with('-');

    if (3..=48).contains(&slug.len()) && valid_chars && valid_edges {
        Ok(())
    } else {
        Err(error(
            "slug",
            "Use 3-48 lowercase letters, digits or hyphens",
        ))
    }
}

/// Rejects strings that are empty after trimming.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error("blank", "This field is required"))
    } else {
        Ok(())
    }
}
