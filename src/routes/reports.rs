use axum::extract::{Query, State};
use axum::Json;
use chrono::{Duration, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::metrics::analytics::{AnalyticsReport, BurnoutRisk, HeatmapRow, ProjectPrediction};
use crate::metrics::dashboard::Dashboard;
use crate::metrics::utilization::{UtilizationFilter, UtilizationReport, UtilizationStatus};
use crate::metrics::DateRange;
use crate::state::SharedState;
use crate::viewer::Viewer;

/// Reports default to the 30 days ending today.
const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Longest window a report may cover, in inclusive days.
const MAX_WINDOW_DAYS: i64 = 366;

#[derive(Deserialize)]
pub struct ReportParams {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub manager_id: Option<Uuid>,
}

#[derive(Deserialize)]
pub struct UtilizationParams {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub manager_id: Option<Uuid>,
    pub department: Option<String>,
    pub status: Option<UtilizationStatus>,
}

fn resolve_range(
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<DateRange, AppError> {
    let end = end_date.unwrap_or_else(|| Utc::now().date_naive());
    let start = start_date.unwrap_or_else(|| {
        end.checked_sub_signed(Duration::days(DEFAULT_WINDOW_DAYS))
            .unwrap_or(NaiveDate::MIN)
    });
    let range = DateRange::new(start, end).ok_or_else(|| {
        AppError::BadRequest("start_date must not be after end_date".to_string())
    })?;

    if range.days() > MAX_WINDOW_DAYS {
        return Err(AppError::BadRequest(format!(
            "Report window must not exceed {MAX_WINDOW_DAYS} days"
        )));
    }
    Ok(range)
}

pub async fn utilization(
    viewer: Viewer,
    State(state): State<SharedState>,
    Query(params): Query<UtilizationParams>,
) -> Result<Json<UtilizationReport>, AppError> {
    let range = resolve_range(params.start_date, params.end_date)?;
    let filter = UtilizationFilter {
        manager_id: viewer.scope(params.manager_id),
        department: params.department,
        status: params.status,
    };
    Ok(Json(state.planner.utilization_report(&range, &filter).await))
}

pub async fn burnout(
    viewer: Viewer,
    State(state): State<SharedState>,
    Query(params): Query<ReportParams>,
) -> Result<Json<Vec<BurnoutRisk>>, AppError> {
    let range = resolve_range(params.start_date, params.end_date)?;
    let risks = state
        .planner
        .burnout_risks(&range, viewer.scope(params.manager_id))
        .await;
    Ok(Json(risks))
}

pub async fn predictions(
    viewer: Viewer,
    State(state): State<SharedState>,
    Query(params): Query<ReportParams>,
) -> Result<Json<Vec<ProjectPrediction>>, AppError> {
    let range = resolve_range(params.start_date, params.end_date)?;
    let predictions = state
        .planner
        .project_predictions(&range, viewer.scope(params.manager_id))
        .await;
    Ok(Json(predictions))
}

pub async fn analytics(
    viewer: Viewer,
    State(state): State<SharedState>,
    Query(params): Query<ReportParams>,
) -> Result<Json<AnalyticsReport>, AppError> {
    let range = resolve_range(params.start_date, params.end_date)?;
    let report = state
        .planner
        .analytics(&range, viewer.scope(params.manager_id))
        .await;
    Ok(Json(report))
}

pub async fn heatmap(
    viewer: Viewer,
    State(state): State<SharedState>,
    Query(params): Query<ReportParams>,
) -> Result<Json<Vec<HeatmapRow>>, AppError> {
    let range = resolve_range(params.start_date, params.end_date)?;
    let rows = state
        .planner
        .heatmap(&range, viewer.scope(params.manager_id))
        .await;
    Ok(Json(rows))
}

pub async fn dashboard(viewer: Viewer, State(state): State<SharedState>) -> Json<Dashboard> {
    let today = Utc::now().date_naive();
    Json(state.planner.dashboard(viewer.manager_id(), today).await)
}
