use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validate_percentage;
use crate::error::AppError;
use crate::ledger::allocations::capacity_hours as hours_for;
use crate::ledger::AllocationSummary;
use crate::models::{AllocationLink, Period};
use crate::state::SharedState;
use crate::viewer::Viewer;

#[derive(Deserialize)]
pub struct ListParams {
    pub manager_id: Option<Uuid>,
    pub resource_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
}

#[derive(Deserialize)]
pub struct CreateLink {
    pub project_id: Uuid,
    pub resource_id: Uuid,
    pub manager_id: Option<Uuid>,
    pub allocation_percentage: f64,
}

#[derive(Deserialize)]
pub struct UpdateLink {
    pub allocation_percentage: f64,
}

#[derive(Deserialize)]
pub struct CapacityParams {
    pub percentage: f64,
    #[serde(default)]
    pub period: Period,
}

#[derive(Serialize)]
pub struct CapacityHours {
    pub percentage: f64,
    pub period: Period,
    pub hours: f64,
}

pub async fn list(
    viewer: Viewer,
    State(state): State<SharedState>,
    Query(params): Query<ListParams>,
) -> Json<Vec<AllocationLink>> {
    let store = state.planner.read().await;
    let links = store
        .allocations
        .links_for_manager(viewer.scope(params.manager_id))
        .into_iter()
        .filter(|l| params.resource_id.is_none_or(|r| l.resource_id == r))
        .filter(|l| params.project_id.is_none_or(|p| l.project_id == p))
        .cloned()
        .collect();
    Json(links)
}

pub async fn create(
    viewer: Viewer,
    State(state): State<SharedState>,
    Json(req): Json<CreateLink>,
) -> Result<Json<AllocationLink>, AppError> {
    validate_percentage(req.allocation_percentage)?;

    {
        let store = state.planner.read().await;
        store
            .roster
            .project(req.project_id)
            .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;
        let resource = store
            .roster
            .resource(req.resource_id)
            .ok_or_else(|| AppError::NotFound("Resource not found".to_string()))?;
        viewer.require_owner(resource.manager_id)?;
    }

    let link = state
        .planner
        .link_resource(
            req.project_id,
            req.resource_id,
            viewer.scope(req.manager_id),
            req.allocation_percentage,
        )
        .await
        .map_err(|e| AppError::Conflict(e.to_string()))?;

    Ok(Json(link))
}

pub async fn update(
    viewer: Viewer,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateLink>,
) -> Result<Json<serde_json::Value>, AppError> {
    validate_percentage(req.allocation_percentage)?;
    require_owner(&state, viewer, id).await?;

    let link = state
        .planner
        .update_allocation(id, req.allocation_percentage)
        .await;

    Ok(Json(serde_json::json!({ "updated": link.is_some(), "link": link })))
}

pub async fn delete(
    viewer: Viewer,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_owner(&state, viewer, id).await?;
    state.planner.unlink_resource(id).await;
    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}

/// Allocation totals for one resource. Unknown resources report zero usage.
pub async fn allocation(
    State(state): State<SharedState>,
    Path(resource_id): Path<Uuid>,
) -> Json<AllocationSummary> {
    Json(state.planner.allocation_summary(resource_id).await)
}

pub async fn capacity_hours(
    Query(params): Query<CapacityParams>,
) -> Result<Json<CapacityHours>, AppError> {
    if !params.percentage.is_finite() || params.percentage < 0.0 {
        return Err(AppError::BadRequest(
            "percentage must be a non-negative number".to_string(),
        ));
    }

    Ok(Json(CapacityHours {
        percentage: params.percentage,
        period: params.period,
        hours: hours_for(params.percentage, params.period),
    }))
}

/// A link belongs to its recorded manager, or to the resource's manager when
/// none was recorded. Unknown ids pass so misses stay idempotent.
async fn require_owner(state: &SharedState, viewer: Viewer, id: Uuid) -> Result<(), AppError> {
    let store = state.planner.read().await;
    let Some(link) = store.allocations.get(id) else {
        return Ok(());
    };
    let owner = link
        .manager_id
        .or_else(|| store.roster.resource(link.resource_id).and_then(|r| r.manager_id));
    viewer.require_owner(owner)
}
