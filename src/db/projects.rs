// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Project and activity storage.

use super::{collections, Database};
use crate::error::AppError;
use crate::models::{Activity, Project};
use uuid::Uuid;

impl Database {
    // ─── Project Operations ──────────────────────────────────────

    pub async fn get_project(&self, id: Uuid) -> Result<Option<Project>, AppError> {
        self.get(collections::PROJECTS, &id.to_string()).await
    }

    /// Create or update a project.
    pub async fn upsert_project(&self, project: &Project) -> Result<(), AppError> {
        self.put(collections::PROJECTS, &project.id.to_string(), project)
            .await
    }

    /// Projects of an organization, most recent start date first.
    pub async fn list_projects_for_organization(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<Project>, AppError> {
        let mut projects: Vec<Project> = self
            .query_eq(
                collections::PROJECTS,
                "organization_id",
                &organization_id.to_string(),
            )
            .await?;
        projects.sort_by(|a, b| {
            b.start_date
                .cmp(&a.start_date)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(projects)
    }

    /// Delete a project and every activity attached to it.
    ///
    /// Activities go first so a failure never leaves legs pointing at a
    /// missing project. Returns the number of documents deleted.
    pub async fn delete_project(&self, project_id: Uuid) -> Result<usize, AppError> {
        let activities = self.list_activities_by_project(project_id).await?;
        let ids: Vec<String> = activities.iter().map(|a| a.id.to_string()).collect();

        self.delete_all(collections::ACTIVITIES, &ids).await?;
        tracing::debug!(%project_id, count = ids.len(), "Deleted project activities");

        self.delete(collections::PROJECTS, &project_id.to_string())
            .await?;

        let deleted_count = ids.len() + 1;
        tracing::info!(%project_id, deleted_count, "Project deletion complete");
        Ok(deleted_count)
    }

    // ─── Activity Operations ─────────────────────────────────────

    pub async fn get_activity(&self, id: Uuid) -> Result<Option<Activity>, AppError> {
        self.get(collections::ACTIVITIES, &id.to_string()).await
    }

    /// Insert one activity. The project must exist.
    pub async fn insert_activity(&self, activity: &Activity) -> Result<(), AppError> {
        self.require_project(activity.project_id).await?;
        self.put(collections::ACTIVITIES, &activity.id.to_string(), activity)
            .await
    }

    /// Insert a batch of activities for one project atomically.
    pub async fn insert_activities(
        &self,
        project_id: Uuid,
        activities: &[Activity],
    ) -> Result<(), AppError> {
        if activities.iter().any(|a| a.project_id != project_id) {
            return Err(AppError::Internal(anyhow::anyhow!(
                "Activity batch mixes projects (expected {})",
                project_id
            )));
        }
        self.require_project(project_id).await?;

        let items: Vec<(String, Activity)> = activities
            .iter()
            .map(|a| (a.id.to_string(), a.clone()))
            .collect();
        self.put_all(collections::ACTIVITIES, &items).await?;

        tracing::debug!(%project_id, count = activities.len(), "Inserted activities");
        Ok(())
    }

    /// All activities of a project in insertion order.
    pub async fn list_activities_by_project(
        &self,
        project_id: Uuid,
    ) -> Result<Vec<Activity>, AppError> {
        let mut activities: Vec<Activity> = self
            .query_eq(
                collections::ACTIVITIES,
                "project_id",
                &project_id.to_string(),
            )
            .await?;
        activities.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(activities)
    }

    pub async fn delete_activity(&self, id: Uuid) -> Result<(), AppError> {
        self.delete(collections::ACTIVITIES, &id.to_string()).await
    }

    /// Referential integrity: activities may only point at existing projects.
    async fn require_project(&self, project_id: Uuid) -> Result<Project, AppError> {
        self.get_project(project_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Project {} not found", project_id)))
    }
}
