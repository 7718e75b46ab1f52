use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use super::validate_name;
use crate::error::AppError;
use crate::models::ProjectManager;
use crate::state::SharedState;
use crate::viewer::Viewer;

#[derive(Deserialize)]
pub struct CreateManager {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub avatar: String,
}

pub async fn list(State(state): State<SharedState>) -> Json<Vec<ProjectManager>> {
    Json(state.planner.read().await.roster.managers().to_vec())
}

pub async fn create(
    viewer: Viewer,
    State(state): State<SharedState>,
    Json(req): Json<CreateManager>,
) -> Result<Json<ProjectManager>, AppError> {
    require_admin(viewer)?;
    validate_name(&req.name)?;

    let manager = ProjectManager {
        id: Uuid::now_v7(),
        name: req.name.trim().to_string(),
        email: req.email.trim().to_string(),
        department: req.department,
        avatar: req.avatar,
    };
    let manager = state.planner.add_manager(manager).await;

    tracing::info!("Project manager {} created", manager.id);
    Ok(Json(manager))
}

pub async fn delete(
    viewer: Viewer,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(viewer)?;

    if state.planner.delete_manager(id).await {
        tracing::info!("Project manager {id} deleted");
    }
    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}

fn require_admin(viewer: Viewer) -> Result<(), AppError> {
    match viewer {
        Viewer::Admin => Ok(()),
        Viewer::Manager(_) => Err(AppError::Forbidden(
            "Only admins can manage project managers".to_string(),
        )),
    }
}
