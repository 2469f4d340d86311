// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Organizer routes for organizations, members and invitations.
//! The auth middleware is applied in routes/mod.rs for these routes.

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::organization::{InvitationForm, OrganizationForm};
use crate::models::{Invitation, InvitationStatus, Member, MemberRole, Organization};
use crate::services::{require_manager, require_membership};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route(
            "/api/organizations",
            get(list_organizations).post(create_organization),
        )
        .route("/api/organizations/{org_id}", get(get_organization))
        .route("/api/organizations/{org_id}/members", get(list_members))
        .route(
            "/api/organizations/{org_id}/invitations",
            get(list_invitations).post(create_invitation),
        )
        .route(
            "/api/invitations/{invitation_id}/accept",
            post(accept_invitation),
        )
}

/// Organization together with the caller's role in it.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct OrganizationResponse {
    #[serde(flatten)]
    pub organization: Organization,
    pub role: MemberRole,
}

impl OrganizationResponse {
    fn new(organization: Organization, member: &Member) -> Self {
        Self {
            organization,
            role: member.role,
        }
    }
}

// ─── User Profile ────────────────────────────────────────────

/// Current user response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserResponse {
    pub user_id: String,
    pub email: String,
    pub name: Option<String>,
    pub organizations: Vec<OrganizationResponse>,
}

async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    let organizations = state
        .db
        .list_organizations_for_user(&user.user_id)
        .await?
        .into_iter()
        .map(|(org, member)| OrganizationResponse::new(org, &member))
        .collect();

    Ok(Json(UserResponse {
        user_id: user.user_id,
        email: user.email,
        name: user.name,
        organizations,
    }))
}

// ─── Organizations ───────────────────────────────────────────

async fn list_organizations(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<OrganizationResponse>>> {
    let organizations = state
        .db
        .list_organizations_for_user(&user.user_id)
        .await?
        .into_iter()
        .map(|(org, member)| OrganizationResponse::new(org, &member))
        .collect();
    Ok(Json(organizations))
}

/// Create an organization; the caller becomes its owner.
async fn create_organization(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(form), _): WithRejection<Json<OrganizationForm>, AppError>,
) -> Result<(StatusCode, Json<OrganizationResponse>)> {
    form.validate()?;

    let slug = form.slug.trim().to_string();
    let now = Utc::now();
    let organization = Organization {
        id: Uuid::new_v4(),
        name: form.name.trim().to_string(),
        slug,
        created_at: now,
    };
    let owner = Member {
        organization_id: organization.id,
        user_id: user.user_id,
        email: user.email.to_lowercase(),
        name: user.name,
        role: MemberRole::Owner,
        joined_at: now,
    };
    state.db.create_organization(&organization, &owner).await?;

    Ok((
        StatusCode::CREATED,
        Json(OrganizationResponse::new(organization, &owner)),
    ))
}

async fn get_organization(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(org_id): Path<Uuid>,
) -> Result<Json<OrganizationResponse>> {
    let (organization, member) = require_membership(&state.db, org_id, &user).await?;
    Ok(Json(OrganizationResponse::new(organization, &member)))
}

async fn list_members(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(org_id): Path<Uuid>,
) -> Result<Json<Vec<Member>>> {
    require_membership(&state.db, org_id, &user).await?;
    Ok(Json(state.db.list_members(org_id).await?))
}

// ─── Invitations ─────────────────────────────────────────────

async fn list_invitations(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(org_id): Path<Uuid>,
) -> Result<Json<Vec<Invitation>>> {
    require_membership(&state.db, org_id, &user).await?;
    Ok(Json(state.db.list_pending_invitations(org_id).await?))
}

/// Invite someone by e-mail. Owners and admins only.
async fn create_invitation(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(org_id): Path<Uuid>,
    WithRejection(Json(form), _): WithRejection<Json<InvitationForm>, AppError>,
) -> Result<(StatusCode, Json<Invitation>)> {
    require_manager(&state.db, org_id, &user).await?;
    form.validate()?;

    let invitation = Invitation::new(org_id, &form, &user.user_id);

    let members = state.db.list_members(org_id).await?;
    if members
        .iter()
        .any(|m| m.email.eq_ignore_ascii_case(&invitation.email))
    {
        return Err(AppError::Conflict(format!(
            "{} is already a member",
            invitation.email
        )));
    }

    state.db.set_invitation(&invitation).await?;
    tracing::info!(
        organization_id = %org_id,
        invitation_id = %invitation.id,
        role = ?invitation.role,
        "Invitation created"
    );

    Ok((StatusCode::CREATED, Json(invitation)))
}

/// Accept an invitation addressed to the caller's e-mail.
async fn accept_invitation(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(invitation_id): Path<Uuid>,
) -> Result<Json<OrganizationResponse>> {
    let invitation = state
        .db
        .get_invitation(invitation_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Invitation {} not found", invitation_id)))?;

    if invitation.status != InvitationStatus::Pending {
        return Err(AppError::Conflict(
            "This invitation has already been handled".to_string(),
        ));
    }
    let now = Utc::now();
    if invitation.is_expired(now) {
        return Err(AppError::Gone("This invitation has expired".to_string()));
    }
    if !invitation.matches_email(&user.email) {
        tracing::warn!(
            %invitation_id,
            user_id = %user.user_id,
            "Invitation e-mail mismatch"
        );
        return Err(AppError::Forbidden(
            "This invitation was sent to a different e-mail address".to_string(),
        ));
    }

    let organization = state
        .db
        .get_organization(invitation.organization_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Organization {} not found",
                invitation.organization_id
            ))
        })?;

    if state
        .db
        .get_member(organization.id, &user.user_id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "You are already a member of this organization".to_string(),
        ));
    }

    let member = Member {
        organization_id: organization.id,
        user_id: user.user_id,
        email: invitation.email.clone(),
        name: user.name,
        role: invitation.role,
        joined_at: now,
    };
    state.db.accept_invitation(&invitation, &member).await?;

    Ok(Json(OrganizationResponse::new(organization, &member)))
}
