pub mod links;
pub mod managers;
pub mod projects;
pub mod reports;
pub mod resources;
pub mod sync;
pub mod time_entries;

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::error::AppError;
use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Roster
        .route("/api/v1/projects", get(projects::list).post(projects::create))
        .route(
            "/api/v1/projects/{id}",
            get(projects::get)
                .put(projects::update)
                .delete(projects::delete),
        )
        .route(
            "/api/v1/resources",
            get(resources::list).post(resources::create),
        )
        .route(
            "/api/v1/resources/{id}",
            get(resources::get)
                .put(resources::update)
                .delete(resources::delete),
        )
        .route(
            "/api/v1/managers",
            get(managers::list).post(managers::create),
        )
        .route("/api/v1/managers/{id}", delete(managers::delete))
        // Allocation ledger
        .route("/api/v1/links", get(links::list).post(links::create))
        .route(
            "/api/v1/links/{id}",
            put(links::update).delete(links::delete),
        )
        .route("/api/v1/resources/{id}/allocation", get(links::allocation))
        .route("/api/v1/capacity-hours", get(links::capacity_hours))
        // Time ledger
        .route(
            "/api/v1/time-entries",
            get(time_entries::list).post(time_entries::create),
        )
        .route("/api/v1/time-entries/bulk", post(time_entries::bulk_create))
        .route(
            "/api/v1/time-entries/{id}",
            put(time_entries::update).delete(time_entries::delete),
        )
        .route("/api/v1/forecast-plan", get(time_entries::forecast_plan))
        // Reports
        .route("/api/v1/reports/utilization", get(reports::utilization))
        .route("/api/v1/reports/burnout", get(reports::burnout))
        .route("/api/v1/reports/predictions", get(reports::predictions))
        .route("/api/v1/reports/analytics", get(reports::analytics))
        .route("/api/v1/reports/heatmap", get(reports::heatmap))
        .route("/api/v1/dashboard", get(reports::dashboard))
        // Mirror
        .route("/api/v1/sync/status", get(sync::status))
        .route("/api/v1/sync/connect", post(sync::connect))
        .route("/api/v1/sync/pull", post(sync::pull))
        .route("/api/v1/sync/push", post(sync::push))
        .route("/api/v1/sync/auto", put(sync::set_auto))
}

fn validate_percentage(percentage: f64) -> Result<(), AppError> {
    if !percentage.is_finite() || percentage <= 0.0 {
        return Err(AppError::BadRequest(
            "Allocation percentage must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

fn validate_hours(field: &str, hours: f64) -> Result<(), AppError> {
    if !hours.is_finite() || hours < 0.0 {
        return Err(AppError::BadRequest(format!(
            "{field} must be a non-negative number"
        )));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }
    Ok(())
}
