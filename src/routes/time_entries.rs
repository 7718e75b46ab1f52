use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validate_hours;
use crate::error::AppError;
use crate::ledger::TimeEntryFilter;
use crate::metrics::plan::{self, PlannedDay, PlannedWeek};
use crate::models::{NewTimeEntry, TimeEntry};
use crate::state::SharedState;
use crate::viewer::Viewer;

#[derive(Deserialize)]
pub struct TimeEntryBody {
    pub resource_id: Uuid,
    pub project_id: Uuid,
    pub manager_id: Option<Uuid>,
    pub date: NaiveDate,
    #[serde(default)]
    pub forecast_hours: f64,
    pub actual_hours: Option<f64>,
    #[serde(default)]
    pub notes: String,
}

impl TimeEntryBody {
    fn validate(&self) -> Result<(), AppError> {
        validate_hours("forecast_hours", self.forecast_hours)?;
        if let Some(actual) = self.actual_hours {
            validate_hours("actual_hours", actual)?;
        }
        Ok(())
    }

    fn into_new(self, viewer: Viewer) -> NewTimeEntry {
        NewTimeEntry {
            resource_id: self.resource_id,
            project_id: self.project_id,
            manager_id: viewer.scope(self.manager_id),
            date: self.date,
            forecast_hours: self.forecast_hours,
            actual_hours: self.actual_hours,
            notes: self.notes,
        }
    }
}

#[derive(Deserialize)]
pub struct PlanParams {
    pub resource_id: Uuid,
    pub project_id: Uuid,
    /// `YYYY-MM`
    pub month: String,
    #[serde(default)]
    pub granularity: Granularity,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Day,
    Week,
}

#[derive(Serialize)]
#[serde(tag = "granularity", rename_all = "lowercase")]
pub enum ForecastPlan {
    Day {
        link_id: Uuid,
        allocation_percentage: f64,
        days: Vec<PlannedDay>,
    },
    Week {
        link_id: Uuid,
        allocation_percentage: f64,
        weeks: Vec<PlannedWeek>,
    },
}

pub async fn list(
    viewer: Viewer,
    State(state): State<SharedState>,
    Query(mut filter): Query<TimeEntryFilter>,
) -> Result<Json<Vec<TimeEntry>>, AppError> {
    if let (Some(start), Some(end)) = (filter.start_date, filter.end_date)
        && start > end
    {
        return Err(AppError::BadRequest(
            "start_date must not be after end_date".to_string(),
        ));
    }
    filter.manager_id = viewer.scope(filter.manager_id);

    Ok(Json(state.planner.query_time_entries(&filter).await))
}

pub async fn create(
    viewer: Viewer,
    State(state): State<SharedState>,
    Json(req): Json<TimeEntryBody>,
) -> Result<Json<TimeEntry>, AppError> {
    req.validate()?;
    let entry = state.planner.add_time_entry(req.into_new(viewer)).await;
    Ok(Json(entry))
}

/// Commit several entries at once, typically a generated forecast plan.
pub async fn bulk_create(
    viewer: Viewer,
    State(state): State<SharedState>,
    Json(req): Json<Vec<TimeEntryBody>>,
) -> Result<Json<Vec<TimeEntry>>, AppError> {
    for body in &req {
        body.validate()?;
    }

    let entries = req.into_iter().map(|b| b.into_new(viewer)).collect();
    let added = state.planner.add_time_entries(entries).await;

    tracing::info!("Added {} time entries", added.len());
    Ok(Json(added))
}

pub async fn update(
    viewer: Viewer,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<TimeEntryBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    req.validate()?;

    let Some(stored) = entry_owner(&state, id).await else {
        return Ok(Json(serde_json::json!({ "updated": false })));
    };
    viewer.require_owner(stored.owner)?;

    let mut entry = req.into_new(viewer).into_entry(id);
    entry.manager_id = stored.manager_id;
    let updated = state.planner.update_time_entry(entry).await;

    Ok(Json(serde_json::json!({ "updated": updated })))
}

pub async fn delete(
    viewer: Viewer,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    if let Some(stored) = entry_owner(&state, id).await {
        viewer.require_owner(stored.owner)?;
    }
    state.planner.delete_time_entry(id).await;
    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}

struct EntryOwner {
    /// As recorded on the entry.
    manager_id: Option<Uuid>,
    /// Recorded manager, else the resource's manager.
    owner: Option<Uuid>,
}

async fn entry_owner(state: &SharedState, id: Uuid) -> Option<EntryOwner> {
    let store = state.planner.read().await;
    let entry = store.time.get(id)?;
    Some(EntryOwner {
        manager_id: entry.manager_id,
        owner: entry
            .manager_id
            .or_else(|| store.roster.resource(entry.resource_id).and_then(|r| r.manager_id)),
    })
}

/// Forecast hours for a month derived from an existing allocation link.
pub async fn forecast_plan(
    State(state): State<SharedState>,
    Query(params): Query<PlanParams>,
) -> Result<Json<ForecastPlan>, AppError> {
    let month = NaiveDate::parse_from_str(&format!("{}-01", params.month.trim()), "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest("month must be formatted as YYYY-MM".to_string()))?;

    let link = state
        .planner
        .read()
        .await
        .allocations
        .find_pair(params.resource_id, params.project_id)
        .cloned()
        .ok_or_else(|| {
            AppError::NotFound("Resource is not linked to this project".to_string())
        })?;

    let pct = link.allocation_percentage;
    let plan = match params.granularity {
        Granularity::Day => ForecastPlan::Day {
            link_id: link.id,
            allocation_percentage: pct,
            days: plan::daily_plan(pct, month),
        },
        Granularity::Week => ForecastPlan::Week {
            link_id: link.id,
            allocation_percentage: pct,
            weeks: plan::weekly_plan(pct, month),
        },
    };
    Ok(Json(plan))
}
