// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Youth-exchange project model.

use crate::validation::{validate_country_code, validate_not_blank};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use uuid::Uuid;
use validator::{Validate, ValidationError};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Project stored in Firestore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Project ID (also used as document ID)
    pub id: Uuid,
    /// Organization that runs the project
    pub organization_id: Uuid,
    pub name: String,
    /// Venue, e.g. a town or youth centre
    pub location: String,
    /// ISO 3166-1 alpha-2, upper-case
    pub country: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// User ID of the member who created the project
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update form for a project.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_project_dates"))]
pub struct ProjectForm {
    #[validate(
        length(min = 1, max = 120),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    #[validate(
        length(min = 1, max = 120),
        custom(function = "validate_not_blank")
    )]
    pub location: String,
    #[validate(custom(function = "validate_country_code"))]
    pub country: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

fn validate_project_dates(form: &ProjectForm) -> Result<(), ValidationError> {
    if form.start_date > form.end_date {
        return Err(ValidationError::new("date_order")
            .with_message(Cow::Borrowed("The project cannot end before it starts")));
    }
    Ok(())
}

impl Project {
    /// Build a new project from a validated form.
    pub fn create(organization_id: Uuid, form: &ProjectForm, created_by: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            organization_id,
            name: form.name.trim().to_string(),
            location: form.location.trim().to_string(),
            country: form.country.to_ascii_uppercase(),
            start_date: form.start_date,
            end_date: form.end_date,
            created_by: created_by.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a validated form, keeping identity and ownership.
    pub fn apply(&mut self, form: &ProjectForm) {
        self.name = form.name.trim().to_string();
        self.location = form.location.trim().to_string();
        self.country = form.country.to_ascii_uppercase();
        self.start_date = form.start_date;
        self.end_date = form.end_date;
        self.updated_at = Utc::now();
    }

    /// Number of calendar days the exchange runs, inclusive.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

/// Project identity shown on the participation header and organizer views.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProjectSummary {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub location: String,
    pub country: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration_days: i64,
}

impl From<&Project> for ProjectSummary {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id,
            organization_id: project.organization_id,
            name: project.name.clone(),
            location: project.location.clone(),
            country: project.country.clone(),
            start_date: project.start_date,
            end_date: project.end_date,
            duration_days: project.duration_days(),
        }
    }
}
