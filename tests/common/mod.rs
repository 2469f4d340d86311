// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use footprint_tracker::config::Config;
use footprint_tracker::db::Database;
use footprint_tracker::middleware::auth::create_session_token;
use footprint_tracker::middleware::AuthUser;
use footprint_tracker::routes::create_router;
use footprint_tracker::AppState;
use serde_json::Value;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> Database {
    Database::connect_firestore("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a test app backed by a fresh in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    app_with_db(Database::in_memory())
}

/// Create a test app whose database calls all fail.
#[allow(dead_code)]
pub fn create_offline_app() -> (axum::Router, Arc<AppState>) {
    app_with_db(Database::offline())
}

#[allow(dead_code)]
fn app_with_db(db: Database) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config: Config::test_default(),
        db,
    });
    (create_router(state.clone()), state)
}

/// A signed-in organizer.
#[allow(dead_code)]
pub fn test_user(id: &str) -> AuthUser {
    AuthUser {
        user_id: id.to_string(),
        email: format!("{}@example.org", id),
        name: Some(id.to_string()),
    }
}

#[allow(dead_code)]
pub fn bearer(state: &AppState, user: &AuthUser) -> String {
    let token = create_session_token(user, &state.config.session_signing_key)
        .expect("Failed to sign session token");
    format!("Bearer {}", token)
}

/// Build a request with an optional JSON body and optional session.
#[allow(dead_code)]
pub fn request(
    method: Method,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Collect a response body as JSON (`Null` when empty).
#[allow(dead_code)]
pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .unwrap();
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    }
}

/// Create an organization owned by `owner` and one project in it.
/// Returns `(organization_id, project_id)`.
#[allow(dead_code)]
pub async fn seed_project(state: &AppState, owner: &AuthUser) -> (uuid::Uuid, uuid::Uuid) {
    use chrono::Utc;
    use footprint_tracker::models::{Member, MemberRole, Organization, Project, ProjectForm};

    let organization = Organization {
        id: uuid::Uuid::new_v4(),
        name: "Youth Bridges".to_string(),
        slug: format!("youth-bridges-{}", &uuid::Uuid::new_v4().to_string()[..8]),
        created_at: Utc::now(),
    };
    let member = Member {
        organization_id: organization.id,
        user_id: owner.user_id.clone(),
        email: owner.email.clone(),
        name: owner.name.clone(),
        role: MemberRole::Owner,
        joined_at: Utc::now(),
    };
    state
        .db
        .create_organization(&organization, &member)
        .await
        .unwrap();

    let form = ProjectForm {
        name: "Coastal Voices".to_string(),
        location: "Split".to_string(),
        country: "hr".to_string(),
        start_date: "2026-09-01".parse().unwrap(),
        end_date: "2026-09-09".parse().unwrap(),
    };
    let project = Project::create(organization.id, &form, &owner.user_id);
    state.db.upsert_project(&project).await.unwrap();

    (organization.id, project.id)
}

/// Add `user` to an organization with the given role.
#[allow(dead_code)]
pub async fn add_member(
    state: &AppState,
    organization_id: uuid::Uuid,
    user: &AuthUser,
    role: footprint_tracker::models::MemberRole,
) {
    let member = footprint_tracker::models::Member {
        organization_id,
        user_id: user.user_id.clone(),
        email: user.email.clone(),
        name: user.name.clone(),
        role,
        joined_at: chrono::Utc::now(),
    };
    state.db.add_member(&member).await.unwrap();
}
