//! Organization, membership and invitation storage.

use super::{collections, Database};
use crate::error::AppError;
use crate::models::{Invitation, InvitationStatus, Member, Organization};
use chrono::Utc;
use futures_util::{stream, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const MAX_CONCURRENT_DB_OPS: usize = 16;

/// Stored under `organization_slugs/{slug}`.
#[derive(Serialize, Deserialize)]
struct SlugClaim {
    organization_id: Uuid,
}

/// Document ID for a membership; user IDs come from the auth provider and may
/// contain characters Firestore does not allow in IDs.
fn member_doc_id(organization_id: Uuid, user_id: &str) -> String {
    format!("{}_{}", organization_id, urlencoding::encode(user_id))
}

impl Database {
    // ─── Organization Operations ─────────────────────────────────

    pub async fn get_organization(&self, id: Uuid) -> Result<Option<Organization>, AppError> {
        self.get(collections::ORGANIZATIONS, &id.to_string()).await
    }

    pub async fn find_organization_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Organization>, AppError> {
        let mut found: Vec<Organization> = self
            .query_eq(collections::ORGANIZATIONS, "slug", slug)
            .await?;
        Ok(found.pop())
    }

    /// Store a new organization together with its owner membership.
    ///
    /// The slug is claimed in the same write, so a second organization with
    /// the same slug fails with [`AppError::Conflict`] and writes nothing.
    pub async fn create_organization(
        &self,
        organization: &Organization,
        owner: &Member,
    ) -> Result<(), AppError> {
        let claim = SlugClaim {
            organization_id: organization.id,
        };
        self.create_claimed(
            (collections::ORGANIZATION_SLUGS, &organization.slug, &claim),
            (
                collections::ORGANIZATIONS,
                &organization.id.to_string(),
                organization,
            ),
            (
                collections::MEMBERS,
                &member_doc_id(organization.id, &owner.user_id),
                owner,
            ),
        )
        .await
        .map_err(|e| match e {
            AppError::Conflict(_) => AppError::Conflict(format!(
                "Slug {:?} is already taken",
                organization.slug
            )),
            other => other,
        })?;

        tracing::info!(
            organization_id = %organization.id,
            slug = %organization.slug,
            owner = %owner.user_id,
            "Organization created"
        );
        Ok(())
    }

    /// Organizations the user belongs to, with the user's membership.
    pub async fn list_organizations_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<(Organization, Member)>, AppError> {
        let memberships: Vec<Member> = self
            .query_eq(collections::MEMBERS, "user_id", user_id)
            .await?;

        let mut results: Vec<(Organization, Member)> = stream::iter(memberships)
            .map(|member| async move {
                let organization = self.get_organization(member.organization_id).await?;
                Ok::<_, AppError>(organization.map(|org| (org, member)))
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .try_filter_map(|pair| async move { Ok(pair) })
            .try_collect()
            .await?;

        results.sort_by(|a, b| a.0.name.cmp(&b.0.name));
        Ok(results)
    }

    // ─── Member Operations ───────────────────────────────────────

    pub async fn get_member(
        &self,
        organization_id: Uuid,
        user_id: &str,
    ) -> Result<Option<Member>, AppError> {
        self.get(
            collections::MEMBERS,
            &member_doc_id(organization_id, user_id),
        )
        .await
    }

    pub async fn add_member(&self, member: &Member) -> Result<(), AppError> {
        self.put(
            collections::MEMBERS,
            &member_doc_id(member.organization_id, &member.user_id),
            member,
        )
        .await
    }

    /// Roster ordered by join date.
    pub async fn list_members(&self, organization_id: Uuid) -> Result<Vec<Member>, AppError> {
        let mut members: Vec<Member> = self
            .query_eq(
                collections::MEMBERS,
                "organization_id",
                &organization_id.to_string(),
            )
            .await?;
        members.sort_by(|a, b| {
            a.joined_at
                .cmp(&b.joined_at)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        Ok(members)
    }

    // ─── Invitation Operations ───────────────────────────────────

    pub async fn get_invitation(&self, id: Uuid) -> Result<Option<Invitation>, AppError> {
        self.get(collections::INVITATIONS, &id.to_string()).await
    }

    pub async fn set_invitation(&self, invitation: &Invitation) -> Result<(), AppError> {
        self.put(
            collections::INVITATIONS,
            &invitation.id.to_string(),
            invitation,
        )
        .await
    }

    /// Pending, unexpired invitations of an organization, newest first.
    pub async fn list_pending_invitations(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<Invitation>, AppError> {
        let invitations: Vec<Invitation> = self
            .query_eq(
                collections::INVITATIONS,
                "organization_id",
                &organization_id.to_string(),
            )
            .await?;

        let now = Utc::now();
        let mut pending: Vec<Invitation> = invitations
            .into_iter()
            .filter(|i| i.status == InvitationStatus::Pending && !i.is_expired(now))
            .collect();
        pending.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(pending)
    }

    /// Record an accepted invitation: mark it accepted, then add the member.
    pub async fn accept_invitation(
        &self,
        invitation: &Invitation,
        member: &Member,
    ) -> Result<(), AppError> {
        let mut accepted = invitation.clone();
        accepted.status = InvitationStatus::Accepted;

        self.set_invitation(&accepted).await?;
        self.add_member(member).await?;

        tracing::info!(
            invitation_id = %invitation.id,
            organization_id = %invitation.organization_id,
            user_id = %member.user_id,
            role = ?member.role,
            "Invitation accepted"
        );
        Ok(())
    }
}
