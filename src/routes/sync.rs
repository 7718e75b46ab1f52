use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::SharedState;
use crate::sync::SyncHealth;

#[derive(Deserialize)]
pub struct AutoSync {
    pub enabled: bool,
}

pub async fn status(State(state): State<SharedState>) -> Json<SyncHealth> {
    Json(state.planner.sync().health())
}

pub async fn connect(State(state): State<SharedState>) -> Result<Json<SyncHealth>, AppError> {
    let sync = state.planner.sync();
    sync.connect().await?;
    Ok(Json(sync.health()))
}

/// Replace local state with the mirror's contents.
pub async fn pull(State(state): State<SharedState>) -> Result<Json<SyncHealth>, AppError> {
    state.planner.pull().await?;
    Ok(Json(state.planner.sync().health()))
}

pub async fn push(State(state): State<SharedState>) -> Result<Json<SyncHealth>, AppError> {
    state.planner.push_all().await?;
    Ok(Json(state.planner.sync().health()))
}

pub async fn set_auto(
    State(state): State<SharedState>,
    Json(req): Json<AutoSync>,
) -> Json<SyncHealth> {
    let sync = state.planner.sync();
    sync.set_auto_sync(req.enabled);
    tracing::info!(
        "Auto sync {}",
        if req.enabled { "enabled" } else { "disabled" }
    );
    Json(sync.health())
}
