use std::sync::Arc;

use crate::config::Config;
use crate::planner::Planner;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub planner: Planner,
}
