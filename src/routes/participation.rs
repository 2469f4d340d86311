// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public questionnaire routes. No session required.

use crate::error::{AppError, Result};
use crate::services::{
    ParticipationResponse, ParticipationService, QuestionnaireSubmission, SubmissionReceipt,
};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use std::sync::Arc;
use uuid::Uuid;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/participation/{project_id}", get(get_for_participation))
        .route(
            "/api/participation/{project_id}/submissions",
            post(submit_questionnaire),
        )
}

/// Project header, organizer legs and baseline for the questionnaire page.
async fn get_for_participation(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<ParticipationResponse>> {
    let service = ParticipationService::new(&state.db, &state.config.emission_factors);
    Ok(Json(service.get_for_participation(project_id).await?))
}

async fn submit_questionnaire(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<Uuid>,
    WithRejection(Json(submission), _): WithRejection<Json<QuestionnaireSubmission>, AppError>,
) -> Result<(StatusCode, Json<SubmissionReceipt>)> {
    let service = ParticipationService::new(&state.db, &state.config.emission_factors);
    let receipt = service.submit(project_id, &submission).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}
