use axum::extract::{Path, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use super::validate_name;
use crate::error::AppError;
use crate::models::{Project, ProjectStatus};
use crate::state::SharedState;
use crate::viewer::Viewer;

#[derive(Deserialize)]
pub struct ProjectBody {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: ProjectStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ProjectBody {
    fn validate(&self) -> Result<(), AppError> {
        validate_name(&self.name)?;
        if let (Some(start), Some(end)) = (self.start_date, self.end_date)
            && start > end
        {
            return Err(AppError::BadRequest(
                "start_date must not be after end_date".to_string(),
            ));
        }
        Ok(())
    }

    fn into_project(self, id: Uuid, created_by: String) -> Project {
        Project {
            id,
            name: self.name.trim().to_string(),
            description: self.description,
            status: self.status,
            start_date: self.start_date,
            end_date: self.end_date,
            created_by,
        }
    }
}

pub async fn list(State(state): State<SharedState>) -> Json<Vec<Project>> {
    Json(state.planner.read().await.roster.projects().to_vec())
}

pub async fn create(
    viewer: Viewer,
    State(state): State<SharedState>,
    Json(req): Json<ProjectBody>,
) -> Result<Json<Project>, AppError> {
    req.validate()?;

    let created_by = match viewer.manager_id() {
        Some(id) => id.to_string(),
        None => "admin".to_string(),
    };
    let project = req.into_project(Uuid::now_v7(), created_by);
    let project = state.planner.add_project(project).await;

    tracing::info!("Project {} created", project.id);
    Ok(Json(project))
}

pub async fn get(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Project>, AppError> {
    let store = state.planner.read().await;
    let project = store
        .roster
        .project(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;
    Ok(Json(project))
}

pub async fn update(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ProjectBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    req.validate()?;

    let created_by = state
        .planner
        .read()
        .await
        .roster
        .project(id)
        .map(|p| p.created_by.clone())
        .unwrap_or_default();
    let updated = state
        .planner
        .update_project(req.into_project(id, created_by))
        .await;

    Ok(Json(serde_json::json!({ "updated": updated })))
}

pub async fn delete(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    if state.planner.delete_project(id).await {
        tracing::info!("Project {id} deleted");
    }
    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}
