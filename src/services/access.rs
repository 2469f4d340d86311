// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Organization-scoped permission checks for organizer routes.

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{Member, Organization, Project};
use uuid::Uuid;

/// Load an organization the user belongs to.
///
/// Unknown organizations are 404; existing ones the user is not in are 403.
pub async fn require_membership(
    db: &Database,
    organization_id: Uuid,
    user: &AuthUser,
) -> Result<(Organization, Member)> {
    let organization = db
        .get_organization(organization_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Organization {} not found", organization_id)))?;

    let member = db
        .get_member(organization_id, &user.user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!(
                %organization_id,
                user_id = %user.user_id,
                "Blocked access by non-member"
            );
            AppError::Forbidden("You are not a member of this organization".to_string())
        })?;

    Ok((organization, member))
}

/// Like [`require_membership`], but the role must be owner or admin.
pub async fn require_manager(
    db: &Database,
    organization_id: Uuid,
    user: &AuthUser,
) -> Result<(Organization, Member)> {
    let (organization, member) = require_membership(db, organization_id, user).await?;
    if !member.role.can_manage() {
        return Err(AppError::Forbidden(
            "Only owners and admins can do this".to_string(),
        ));
    }
    Ok((organization, member))
}

/// Load a project whose organization the user belongs to.
pub async fn require_project_member(
    db: &Database,
    project_id: Uuid,
    user: &AuthUser,
) -> Result<(Project, Member)> {
    let project = db
        .get_project(project_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project {} not found", project_id)))?;
    let (_, member) = require_membership(db, project.organization_id, user).await?;
    Ok((project, member))
}
