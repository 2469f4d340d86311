//! Organization, membership and invitation models.

use crate::validation::{validate_not_blank, validate_slug};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use uuid::Uuid;
use validator::{Validate, ValidationError};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Invitations lapse after this many hours.
pub const INVITATION_TTL_HOURS: i64 = 48;

/// Organization that runs projects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    /// URL-safe unique handle
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum MemberRole {
    Owner,
    Admin,
    Member,
}

impl MemberRole {
    /// Owners and admins may invite people and delete projects.
    pub fn can_manage(self) -> bool {
        matches!(self, MemberRole::Owner | MemberRole::Admin)
    }
}

/// Membership of a user in an organization.
///
/// User identity comes from the auth provider; only the fields needed for
/// roster display are copied here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Member {
    pub organization_id: Uuid,
    pub user_id: String,
    pub email: String,
    pub name: Option<String>,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Canceled,
}

/// Pending or handled invitation to join an organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Invitation {
    pub id: Uuid,
    pub organization_id: Uuid,
    /// Lower-cased invitee e-mail
    pub email: String,
    pub role: MemberRole,
    pub status: InvitationStatus,
    pub inviter_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Invitation {
    pub fn new(organization_id: Uuid, form: &InvitationForm, inviter_id: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            organization_id,
            email: form.email.trim().to_lowercase(),
            role: form.role,
            status: InvitationStatus::Pending,
            inviter_id: inviter_id.to_string(),
            created_at: now,
            expires_at: now + Duration::hours(INVITATION_TTL_HOURS),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn matches_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OrganizationForm {
    #[validate(
        length(min = 1, max = 100),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    #[validate(custom(function = "validate_slug"))]
    pub slug: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InvitationForm {
    #[validate(email)]
    pub email: String,
    #[validate(custom(function = "validate_invitable_role"))]
    pub role: MemberRole,
}

/// Ownership is never handed out by invitation.
fn validate_invitable_role(role: &MemberRole) -> Result<(), ValidationError> {
    if *role == MemberRole::Owner {
        return Err(ValidationError::new("role")
            .with_message(Cow::Borrowed("Invitations can grant admin or member")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invitation_form(email: &str, role: MemberRole) -> InvitationForm {
        InvitationForm {
            email: email.to_string(),
            role,
        }
    }

    #[test]
    fn test_roles_that_can_manage() {
        assert!(MemberRole::Owner.can_manage());
        assert!(MemberRole::Admin.can_manage());
        assert!(!MemberRole::Member.can_manage());
    }

    #[test]
    fn test_invitation_form_rejects_owner_role() {
        let errors = invitation_form("a@example.org", MemberRole::Owner)
            .validate()
            .unwrap_err();
        assert!(errors.field_errors().contains_key("role"));
    }

    #[test]
    fn test_invitation_form_rejects_bad_email() {
        let errors = invitation_form("not-an-email", MemberRole::Member)
            .validate()
            .unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_new_invitation_expires_after_ttl() {
        let form = invitation_form(" Youth.Worker@Example.org ", MemberRole::Admin);
        let invitation = Invitation::new(Uuid::new_v4(), &form, "owner-1");

        assert_eq!(invitation.email, "youth.worker@example.org");
        assert_eq!(invitation.status, InvitationStatus::Pending);
        assert!(!invitation.is_expired(invitation.created_at));
        assert!(invitation.is_expired(invitation.created_at + Duration::hours(48)));
        assert!(invitation.matches_email("YOUTH.WORKER@example.org"));
    }
}
