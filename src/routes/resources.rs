use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use super::validate_name;
use crate::error::AppError;
use crate::models::Resource;
use crate::state::SharedState;
use crate::viewer::Viewer;

#[derive(Deserialize)]
pub struct ListParams {
    pub manager_id: Option<Uuid>,
    pub department: Option<String>,
}

#[derive(Deserialize)]
pub struct ResourceBody {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub department: String,
    pub manager_id: Option<Uuid>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub avatar: String,
}

impl ResourceBody {
    fn into_resource(self, id: Uuid, viewer: Viewer) -> Resource {
        Resource {
            id,
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            role: self.role,
            department: self.department,
            manager_id: viewer.scope(self.manager_id),
            skills: self
                .skills
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            avatar: self.avatar,
        }
    }
}

pub async fn list(
    viewer: Viewer,
    State(state): State<SharedState>,
    Query(params): Query<ListParams>,
) -> Json<Vec<Resource>> {
    let store = state.planner.read().await;
    let resources = store
        .roster
        .resources_by_manager(viewer.scope(params.manager_id))
        .into_iter()
        .filter(|r| {
            params
                .department
                .as_deref()
                .is_none_or(|d| r.department.eq_ignore_ascii_case(d))
        })
        .cloned()
        .collect();
    Json(resources)
}

pub async fn create(
    viewer: Viewer,
    State(state): State<SharedState>,
    Json(req): Json<ResourceBody>,
) -> Result<Json<Resource>, AppError> {
    validate_name(&req.name)?;

    let resource = req.into_resource(Uuid::now_v7(), viewer);
    let resource = state.planner.add_resource(resource).await;

    tracing::info!("Resource {} created", resource.id);
    Ok(Json(resource))
}

pub async fn get(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Resource>, AppError> {
    let store = state.planner.read().await;
    let resource = store
        .roster
        .resource(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound("Resource not found".to_string()))?;
    Ok(Json(resource))
}

pub async fn update(
    viewer: Viewer,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ResourceBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    validate_name(&req.name)?;
    require_owner(&state, viewer, id).await?;

    let updated = state
        .planner
        .update_resource(req.into_resource(id, viewer))
        .await;

    Ok(Json(serde_json::json!({ "updated": updated })))
}

pub async fn delete(
    viewer: Viewer,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_owner(&state, viewer, id).await?;

    if state.planner.delete_resource(id).await {
        tracing::info!("Resource {id} deleted");
    }
    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}

/// Managers may only touch resources assigned to them. Unknown ids pass so
/// that the command stays idempotent.
async fn require_owner(state: &SharedState, viewer: Viewer, id: Uuid) -> Result<(), AppError> {
    let owner = state.planner.read().await.roster.resource(id).map(|r| r.manager_id);
    match owner {
        Some(owner) => viewer.require_owner(owner),
        None => Ok(()),
    }
}
