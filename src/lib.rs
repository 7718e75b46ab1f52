pub mod config;
pub mod error;
pub mod ledger;
pub mod metrics;
pub mod models;
pub mod planner;
pub mod routes;
pub mod seed;
pub mod state;
pub mod sync;
pub mod viewer;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::ledger::CapacityStore;
use crate::planner::Planner;
use crate::state::{AppState, SharedState};
use crate::sync::{Mirror, SyncDispatcher};

/// Assemble the shared state. `mirror` is `None` when no workbook is configured.
pub fn build_state(config: Config, mirror: Option<Arc<dyn Mirror>>) -> SharedState {
    let store = if config.seed_demo {
        tracing::info!("Loading demo roster");
        seed::demo_store()
    } else {
        CapacityStore::default()
    };

    let sync = SyncDispatcher::new(mirror, &config.sync);
    Arc::new(AppState {
        planner: Planner::new(store, sync),
        config,
    })
}

pub fn build_app(state: SharedState) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .route("/health", axum::routing::get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
