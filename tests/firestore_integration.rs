// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running, e.g.
//! `gcloud emulators firestore start` with FIRESTORE_EMULATOR_HOST set.
//!
//! Every test uses fresh UUIDs, so runs do not interfere with each other.

use chrono::Utc;
use footprint_tracker::error::AppError;
use footprint_tracker::models::{
    Activity, ActivitySource, Invitation, InvitationStatus, Member, MemberRole, Organization,
    Project, ProjectForm, TransportMode, TravelDirection,
};
use uuid::Uuid;

mod common;
use common::test_db;

fn test_project() -> Project {
    let form = ProjectForm {
        name: "Emulator Exchange".to_string(),
        location: "Porto".to_string(),
        country: "PT".to_string(),
        start_date: "2026-05-04".parse().unwrap(),
        end_date: "2026-05-11".parse().unwrap(),
    };
    Project::create(Uuid::new_v4(), &form, "organizer")
}

fn leg(project_id: Uuid, mode: TransportMode, source: ActivitySource) -> Activity {
    Activity {
        id: Uuid::new_v4(),
        project_id,
        mode,
        distance_km: 42.0,
        direction: TravelDirection::Arrival,
        participant_id: None,
        participant_name: None,
        source,
        created_by: None,
        created_at: Utc::now(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// PROJECT TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_project_round_trip() {
    require_emulator!();

    let db = test_db().await;
    let project = test_project();

    assert!(db.get_project(project.id).await.unwrap().is_none());
    db.upsert_project(&project).await.unwrap();

    let fetched = db.get_project(project.id).await.unwrap().unwrap();
    assert_eq!(fetched, project);

    let listed = db
        .list_projects_for_organization(project.organization_id)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn test_activity_batch_and_cascade_delete() {
    require_emulator!();

    let db = test_db().await;
    let project = test_project();
    db.upsert_project(&project).await.unwrap();

    let participant = Uuid::new_v4();
    let batch: Vec<Activity> = [TransportMode::Bus, TransportMode::Train, TransportMode::Boat]
        .into_iter()
        .map(|mode| Activity {
            participant_id: Some(participant),
            ..leg(project.id, mode, ActivitySource::Participant)
        })
        .collect();
    db.insert_activities(project.id, &batch).await.unwrap();
    db.insert_activity(&leg(project.id, TransportMode::Car, ActivitySource::Organizer))
        .await
        .unwrap();

    let stored = db.list_activities_by_project(project.id).await.unwrap();
    assert_eq!(stored.len(), 4);
    assert_eq!(stored.iter().filter(|a| a.is_baseline()).count(), 1);

    let deleted = db.delete_project(project.id).await.unwrap();
    assert_eq!(deleted, 5);
    assert!(db.list_activities_by_project(project.id).await.unwrap().is_empty());
    assert!(db.get_project(project.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_activity_for_missing_project_is_rejected() {
    require_emulator!();

    let db = test_db().await;
    let orphan = leg(Uuid::new_v4(), TransportMode::Car, ActivitySource::Organizer);

    assert!(db.insert_activity(&orphan).await.is_err());
}

// ═══════════════════════════════════════════════════════════════════════════
// ORGANIZATION TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_organization_membership_and_invitation() {
    require_emulator!();

    let db = test_db().await;
    let organization = Organization {
        id: Uuid::new_v4(),
        name: "Emulator Org".to_string(),
        slug: format!("emu-{}", &Uuid::new_v4().to_string()[..8]),
        created_at: Utc::now(),
    };
    let owner = Member {
        organization_id: organization.id,
        user_id: "auth0|owner".to_string(),
        email: "owner@example.org".to_string(),
        name: None,
        role: MemberRole::Owner,
        joined_at: Utc::now(),
    };
    db.create_organization(&organization, &owner).await.unwrap();

    assert_eq!(
        db.find_organization_by_slug(&organization.slug)
            .await
            .unwrap(),
        Some(organization.clone())
    );

    // Same slug, different organization.
    let clash = Organization {
        id: Uuid::new_v4(),
        ..organization.clone()
    };
    let clash_owner = Member {
        organization_id: clash.id,
        ..owner.clone()
    };
    let err = db.create_organization(&clash, &clash_owner).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(db.get_organization(clash.id).await.unwrap(), None);
    assert_eq!(
        db.get_member(organization.id, "auth0|owner").await.unwrap(),
        Some(owner.clone())
    );

    let invitation = Invitation {
        id: Uuid::new_v4(),
        organization_id: organization.id,
        email: "guest@example.org".to_string(),
        role: MemberRole::Admin,
        status: InvitationStatus::Pending,
        inviter_id: owner.user_id.clone(),
        created_at: Utc::now(),
        expires_at: Utc::now() + chrono::Duration::hours(48),
    };
    db.set_invitation(&invitation).await.unwrap();
    assert_eq!(
        db.list_pending_invitations(organization.id)
            .await
            .unwrap()
            .len(),
        1
    );

    let guest = Member {
        user_id: "guest".to_string(),
        email: invitation.email.clone(),
        role: MemberRole::Admin,
        ..owner
    };
    db.accept_invitation(&invitation, &guest).await.unwrap();

    assert_eq!(db.list_members(organization.id).await.unwrap().len(), 2);
    assert!(db
        .list_pending_invitations(organization.id)
        .await
        .unwrap()
        .is_empty());
}
