// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public participation flow.
//!
//! Handles the questionnaire workflow:
//! 1. Load the project and its organizer (baseline) legs
//! 2. Validate a participant's legs
//! 3. Store them as one batch under a fresh participant ID
//! 4. Return the participant's contribution next to the baseline

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::{
    Activity, ActivityEntry, ActivitySource, ActivityView, EmissionFactors, Project,
    ProjectStats, ProjectSummary,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Questionnaire body submitted by a participant.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuestionnaireSubmission {
    #[serde(default)]
    #[validate(length(max = 100))]
    pub participant_name: Option<String>,
    /// Between 1 and 20 legs
    #[validate(length(min = 1, max = 20), nested)]
    pub entries: Vec<ActivityEntry>,
}

/// `projects.getForParticipation` response: what the questionnaire page shows
/// before anything is submitted.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ParticipationResponse {
    pub project: ProjectSummary,
    /// Organizer legs the baseline is computed from
    pub activities: Vec<ActivityView>,
    pub baseline: ProjectStats,
}

/// Baseline, the participant's own legs, and both combined.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Breakdown {
    pub baseline: ProjectStats,
    pub contribution: ProjectStats,
    pub combined: ProjectStats,
}

impl Breakdown {
    pub fn new(baseline: ProjectStats, contribution: ProjectStats) -> Self {
        let combined = baseline.merge(&contribution);
        Self {
            baseline,
            contribution,
            combined,
        }
    }
}

/// Confirmation returned after a successful submission.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SubmissionReceipt {
    pub submission_id: Uuid,
    pub project: ProjectSummary,
    pub activities: Vec<ActivityView>,
    pub breakdown: Breakdown,
}

/// Serves the public questionnaire for a project.
pub struct ParticipationService<'a> {
    db: &'a Database,
    factors: &'a EmissionFactors,
}

impl<'a> ParticipationService<'a> {
    pub fn new(db: &'a Database, factors: &'a EmissionFactors) -> Self {
        Self { db, factors }
    }

    async fn load_project(&self, project_id: Uuid) -> Result<(Project, Vec<Activity>)> {
        let project = self
            .db
            .get_project(project_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Project {} not found", project_id)))?;

        let baseline_legs: Vec<Activity> = self
            .db
            .list_activities_by_project(project_id)
            .await?
            .into_iter()
            .filter(Activity::is_baseline)
            .collect();

        Ok((project, baseline_legs))
    }

    fn views(&self, activities: &[Activity]) -> Vec<ActivityView> {
        activities
            .iter()
            .map(|a| ActivityView::new(a, self.factors))
            .collect()
    }

    /// Project header, organizer legs and baseline stats.
    pub async fn get_for_participation(&self, project_id: Uuid) -> Result<ParticipationResponse> {
        let (project, baseline_legs) = self.load_project(project_id).await?;
        let baseline = ProjectStats::aggregate(&baseline_legs, self.factors);

        tracing::debug!(
            %project_id,
            baseline_legs = baseline_legs.len(),
            baseline_co2 = baseline.total.co2,
            "Serving participation page"
        );

        Ok(ParticipationResponse {
            project: ProjectSummary::from(&project),
            activities: self.views(&baseline_legs),
            baseline,
        })
    }

    /// Validate and store a questionnaire submission.
    pub async fn submit(
        &self,
        project_id: Uuid,
        submission: &QuestionnaireSubmission,
    ) -> Result<SubmissionReceipt> {
        submission.validate()?;

        let (project, baseline_legs) = self.load_project(project_id).await?;

        let submission_id = Uuid::new_v4();
        let participant_name = submission
            .participant_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        let now = Utc::now();

        let activities = submission
            .entries
            .iter()
            .map(|entry| {
                let leg = entry.to_leg()?;
                Ok(Activity {
                    id: Uuid::new_v4(),
                    project_id,
                    mode: leg.mode,
                    distance_km: leg.distance_km,
                    direction: leg.direction,
                    participant_id: Some(submission_id),
                    participant_name: participant_name.clone(),
                    source: ActivitySource::Participant,
                    created_by: None,
                    created_at: now,
                })
            })
            .collect::<Result<Vec<Activity>>>()?;

        self.db.insert_activities(project_id, &activities).await?;

        let breakdown = Breakdown::new(
            ProjectStats::aggregate(&baseline_legs, self.factors),
            ProjectStats::aggregate(&activities, self.factors),
        );

        tracing::info!(
            %project_id,
            %submission_id,
            legs = activities.len(),
            co2 = breakdown.contribution.total.co2,
            "Questionnaire submitted"
        );

        Ok(SubmissionReceipt {
            submission_id,
            project: ProjectSummary::from(&project),
            activities: self.views(&activities),
            breakdown,
        })
    }
}
