// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Organizer routes for projects, their baseline activities and stats.

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{
    Activity, ActivitySource, ActivityView, Project, ProjectActivityForm, ProjectForm,
    ProjectStats, ProjectSummary,
};
use crate::services::{require_membership, require_project_member};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/organizations/{org_id}/projects",
            get(list_projects).post(create_project),
        )
        .route(
            "/api/projects/{project_id}",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route(
            "/api/projects/{project_id}/activities",
            get(list_activities).post(create_activity),
        )
        .route(
            "/api/projects/{project_id}/activities/{activity_id}",
            delete(delete_activity),
        )
        .route("/api/projects/{project_id}/stats", get(get_stats))
}

// ─── Projects ────────────────────────────────────────────────

async fn list_projects(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(org_id): Path<Uuid>,
) -> Result<Json<Vec<ProjectSummary>>> {
    require_membership(&state.db, org_id, &user).await?;

    let projects = state.db.list_projects_for_organization(org_id).await?;
    Ok(Json(projects.iter().map(ProjectSummary::from).collect()))
}

async fn create_project(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(org_id): Path<Uuid>,
    WithRejection(Json(form), _): WithRejection<Json<ProjectForm>, AppError>,
) -> Result<(StatusCode, Json<ProjectSummary>)> {
    require_membership(&state.db, org_id, &user).await?;
    form.validate()?;

    let project = Project::create(org_id, &form, &user.user_id);
    state.db.upsert_project(&project).await?;
    tracing::info!(
        organization_id = %org_id,
        project_id = %project.id,
        "Project created"
    );

    Ok((StatusCode::CREATED, Json(ProjectSummary::from(&project))))
}

async fn get_project(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<ProjectSummary>> {
    let (project, _) = require_project_member(&state.db, project_id, &user).await?;
    Ok(Json(ProjectSummary::from(&project)))
}

async fn update_project(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(project_id): Path<Uuid>,
    WithRejection(Json(form), _): WithRejection<Json<ProjectForm>, AppError>,
) -> Result<Json<ProjectSummary>> {
    let (mut project, _) = require_project_member(&state.db, project_id, &user).await?;
    form.validate()?;

    project.apply(&form);
    state.db.upsert_project(&project).await?;

    Ok(Json(ProjectSummary::from(&project)))
}

/// Response for project deletion.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteProjectResponse {
    pub success: bool,
    /// Project document plus its activities
    pub deleted_count: usize,
}

/// Delete a project and its activities. Owners and admins only.
async fn delete_project(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<DeleteProjectResponse>> {
    let (_, member) = require_project_member(&state.db, project_id, &user).await?;
    if !member.role.can_manage() {
        return Err(AppError::Forbidden(
            "Only owners and admins can delete projects".to_string(),
        ));
    }

    tracing::info!(%project_id, user_id = %user.user_id, "User-initiated project deletion");
    let deleted_count = state.db.delete_project(project_id).await?;

    Ok(Json(DeleteProjectResponse {
        success: true,
        deleted_count,
    }))
}

// ─── Activities ──────────────────────────────────────────────

async fn list_activities(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<Vec<ActivityView>>> {
    require_project_member(&state.db, project_id, &user).await?;

    let factors = &state.config.emission_factors;
    let activities = state.db.list_activities_by_project(project_id).await?;
    Ok(Json(
        activities
            .iter()
            .map(|a| ActivityView::new(a, factors))
            .collect(),
    ))
}

/// Add an organizer (baseline) leg.
async fn create_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(project_id): Path<Uuid>,
    WithRejection(Json(form), _): WithRejection<Json<ProjectActivityForm>, AppError>,
) -> Result<(StatusCode, Json<ActivityView>)> {
    require_project_member(&state.db, project_id, &user).await?;
    form.leg.validate()?;
    let leg = form.leg.to_leg()?;

    let activity = Activity {
        id: Uuid::new_v4(),
        project_id,
        mode: leg.mode,
        distance_km: leg.distance_km,
        direction: leg.direction,
        participant_id: form.participant_id,
        participant_name: None,
        source: ActivitySource::Organizer,
        created_by: Some(user.user_id),
        created_at: Utc::now(),
    };
    state.db.insert_activity(&activity).await?;

    Ok((
        StatusCode::CREATED,
        Json(ActivityView::new(&activity, &state.config.emission_factors)),
    ))
}

async fn delete_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((project_id, activity_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode> {
    require_project_member(&state.db, project_id, &user).await?;

    match state.db.get_activity(activity_id).await? {
        Some(activity) if activity.project_id == project_id => {
            state.db.delete_activity(activity_id).await?;
            tracing::info!(%project_id, %activity_id, "Activity deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        _ => Err(AppError::NotFound(format!(
            "Activity {} not found",
            activity_id
        ))),
    }
}

// ─── Stats ───────────────────────────────────────────────────

/// Project totals split by who reported the legs.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProjectStatsResponse {
    pub baseline: ProjectStats,
    pub participants: ProjectStats,
    pub combined: ProjectStats,
    /// Distinct questionnaire submissions
    pub submissions: usize,
}

async fn get_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<ProjectStatsResponse>> {
    require_project_member(&state.db, project_id, &user).await?;

    let activities = state.db.list_activities_by_project(project_id).await?;
    let (baseline_legs, participant_legs): (Vec<&Activity>, Vec<&Activity>) =
        activities.iter().partition(|a| a.is_baseline());

    let factors = &state.config.emission_factors;
    let baseline = ProjectStats::aggregate(&baseline_legs, factors);
    let participants = ProjectStats::aggregate(&participant_legs, factors);
    let combined = baseline.merge(&participants);

    let submissions = participant_legs
        .iter()
        .filter_map(|a| a.participant_id)
        .collect::<HashSet<_>>()
        .len();

    Ok(Json(ProjectStatsResponse {
        baseline,
        participants,
        combined,
        submissions,
    }))
}
