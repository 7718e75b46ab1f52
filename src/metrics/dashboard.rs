use std::collections::HashSet;

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use crate::ledger::time_entries::total_actual;
use crate::ledger::{CapacityStore, TimeEntryFilter};
use crate::models::ProjectStatus;

const RECENT_ACTIVITY: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum DashboardStats {
    Admin {
        active_projects: usize,
        project_managers: usize,
        total_resources: usize,
        hours_logged: f64,
    },
    Manager {
        my_resources: usize,
        active_projects: usize,
        total_hours: f64,
        this_week_hours: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    pub entry_id: Uuid,
    pub date: NaiveDate,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub recent_activity: Vec<Activity>,
}

pub fn dashboard(store: &CapacityStore, manager_id: Option<Uuid>, today: NaiveDate) -> Dashboard {
    let entries = store.time.query(&TimeEntryFilter {
        manager_id,
        ..Default::default()
    });

    let stats = match manager_id {
        None => DashboardStats::Admin {
            active_projects: store
                .roster
                .projects()
                .iter()
                .filter(|p| p.status == ProjectStatus::Active)
                .count(),
            project_managers: store.roster.managers().len(),
            total_resources: store.roster.resources().len(),
            hours_logged: total_actual(entries.iter().copied()),
        },
        Some(id) => {
            let week_ago = today - Duration::days(7);
            DashboardStats::Manager {
                my_resources: store.roster.resources_by_manager(Some(id)).len(),
                active_projects: entries
                    .iter()
                    .map(|e| e.project_id)
                    .collect::<HashSet<_>>()
                    .len(),
                total_hours: total_actual(entries.iter().copied()),
                this_week_hours: total_actual(
                    entries.iter().copied().filter(|e| e.date >= week_ago),
                ),
            }
        }
    };

    let recent_activity = entries
        .iter()
        .rev()
        .take(RECENT_ACTIVITY)
        .map(|e| {
            let resource = store.roster.resource(e.resource_id).map(|r| r.name.as_str());
            let project = store.roster.project(e.project_id).map(|p| p.name.as_str());
            Activity {
                entry_id: e.id,
                date: e.date,
                message: format!(
                    "{} logged {}h on {}",
                    resource.unwrap_or("Unknown resource"),
                    e.actual_or_zero(),
                    project.unwrap_or("unknown project"),
                ),
            }
        })
        .collect();

    Dashboard {
        stats,
        recent_activity,
    }
}
