use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{percent_of, DateRange};
use crate::ledger::time_entries::{total_actual, total_forecast};
use crate::ledger::{CapacityStore, TimeEntryFilter};
use crate::models::{Period, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UtilizationStatus {
    Overloaded,
    High,
    Optimal,
    Available,
}

impl UtilizationStatus {
    /// Bands are checked top-down with strict comparisons, so a boundary
    /// value lands in the next band up (100 is `High`, 50 is `Optimal`).
    pub fn classify(utilization: f64) -> Self {
        if utilization > 100.0 {
            UtilizationStatus::Overloaded
        } else if utilization > 90.0 {
            UtilizationStatus::High
        } else if utilization < 50.0 {
            UtilizationStatus::Available
        } else {
            UtilizationStatus::Optimal
        }
    }
}

/// The arithmetic core of a utilization row, free of any ledger lookups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UtilizationFigures {
    pub allocation_percentage: f64,
    pub weekly_allocated_hours: f64,
    pub expected_capacity: f64,
    pub actual_hours: f64,
    pub forecast_hours: f64,
    pub utilization: f64,
    pub efficiency: f64,
    pub variance: f64,
    pub available_hours: f64,
    pub status: UtilizationStatus,
}

impl UtilizationFigures {
    pub fn compute(allocation_percentage: f64, actual_hours: f64, forecast_hours: f64, weeks: f64) -> Self {
        let weekly_allocated_hours = Period::Week.capacity_hours(allocation_percentage);
        let expected_capacity = weekly_allocated_hours * weeks;
        let utilization = percent_of(actual_hours, expected_capacity);

        Self {
            allocation_percentage,
            weekly_allocated_hours,
            expected_capacity,
            actual_hours,
            forecast_hours,
            utilization,
            efficiency: percent_of(actual_hours, forecast_hours),
            variance: actual_hours - forecast_hours,
            available_hours: (expected_capacity - actual_hours).max(0.0),
            status: UtilizationStatus::classify(utilization),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceUtilization {
    pub resource_id: Uuid,
    pub name: String,
    pub department: String,
    pub manager_id: Option<Uuid>,
    pub manager_name: Option<String>,
    #[serde(flatten)]
    pub figures: UtilizationFigures,
}

impl ResourceUtilization {
    pub fn utilization(&self) -> f64 {
        self.figures.utilization
    }

    pub fn efficiency(&self) -> f64 {
        self.figures.efficiency
    }

    pub fn status(&self) -> UtilizationStatus {
        self.figures.status
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UtilizationFilter {
    pub manager_id: Option<Uuid>,
    pub department: Option<String>,
    pub status: Option<UtilizationStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UtilizationSummary {
    pub total: usize,
    pub overloaded: usize,
    pub high: usize,
    pub optimal: usize,
    pub available: usize,
    pub avg_utilization: f64,
    pub total_available_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UtilizationReport {
    pub range: DateRange,
    pub resources: Vec<ResourceUtilization>,
    pub summary: UtilizationSummary,
}

pub fn resource_utilization(
    store: &CapacityStore,
    resource: &Resource,
    range: &DateRange,
) -> ResourceUtilization {
    let entries = store.time.query(&TimeEntryFilter {
        resource_id: Some(resource.id),
        ..range.filter()
    });

    let figures = UtilizationFigures::compute(
        store.allocations.total_allocation(resource.id),
        total_actual(entries.iter().copied()),
        total_forecast(entries.iter().copied()),
        range.weeks(),
    );

    let manager_name = resource
        .manager_id
        .and_then(|id| store.roster.manager(id))
        .map(|m| m.name.clone());

    ResourceUtilization {
        resource_id: resource.id,
        name: resource.name.clone(),
        department: resource.department.clone(),
        manager_id: resource.manager_id,
        manager_name,
        figures,
    }
}

/// One row per roster resource (optionally scoped to a manager), unfiltered.
pub fn utilization_rows(
    store: &CapacityStore,
    range: &DateRange,
    manager_id: Option<Uuid>,
) -> Vec<ResourceUtilization> {
    store
        .roster
        .resources_by_manager(manager_id)
        .into_iter()
        .map(|r| resource_utilization(store, r, range))
        .collect()
}

pub fn utilization_report(
    store: &CapacityStore,
    range: &DateRange,
    filter: &UtilizationFilter,
) -> UtilizationReport {
    let resources: Vec<_> = utilization_rows(store, range, filter.manager_id)
        .into_iter()
        .filter(|r| {
            filter
                .department
                .as_deref()
                .is_none_or(|d| d.is_empty() || r.department == d)
        })
        .filter(|r| filter.status.is_none_or(|s| r.status() == s))
        .collect();

    let summary = summarize(&resources);
    UtilizationReport {
        range: *range,
        resources,
        summary,
    }
}

pub fn summarize(rows: &[ResourceUtilization]) -> UtilizationSummary {
    let count = |status| rows.iter().filter(|r| r.status() == status).count();
    let total = rows.len();

    UtilizationSummary {
        total,
        overloaded: count(UtilizationStatus::Overloaded),
        high: count(UtilizationStatus::High),
        optimal: count(UtilizationStatus::Optimal),
        available: count(UtilizationStatus::Available),
        avg_utilization: if total > 0 {
            rows.iter().map(|r| r.utilization()).sum::<f64>() / total as f64
        } else {
            0.0
        },
        total_available_hours: rows.iter().map(|r| r.figures.available_hours).sum(),
    }
}
