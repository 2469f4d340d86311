// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::{Method, StatusCode};
use serde_json::json;
use std::collections::HashSet;
use tower::ServiceExt;

mod common;
use common::{create_test_app, request, seed_project, test_user};

const NUM_CONCURRENT_SUBMISSIONS: usize = 16;
const LEGS_PER_SUBMISSION: usize = 3;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_submissions_are_independent() {
    // Submissions never share state, so every leg of every submission must land.
    let (app, state) = create_test_app();
    let (_, project_id) = seed_project(&state, &test_user("owner")).await;

    let mut handles = vec![];
    for i in 0..NUM_CONCURRENT_SUBMISSIONS {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let entries: Vec<_> = (0..LEGS_PER_SUBMISSION)
                .map(|_| json!({"mode": "bus", "distance_km": 10 + i, "direction": "arrival"}))
                .collect();
            app.oneshot(request(
                Method::POST,
                &format!("/api/participation/{}/submissions", project_id),
                None,
                Some(json!({"participant_name": format!("P{}", i), "entries": entries})),
            ))
            .await
            .unwrap()
            .status()
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.expect("Task join failed"), StatusCode::CREATED);
    }

    let stored = state.db.list_activities_by_project(project_id).await.unwrap();
    assert_eq!(stored.len(), NUM_CONCURRENT_SUBMISSIONS * LEGS_PER_SUBMISSION);

    let participants: HashSet<_> = stored.iter().filter_map(|a| a.participant_id).collect();
    assert_eq!(participants.len(), NUM_CONCURRENT_SUBMISSIONS);
}
