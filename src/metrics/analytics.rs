use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::utilization::{utilization_rows, ResourceUtilization};
use super::{percent_of, DateRange};
use crate::ledger::time_entries::{total_actual, total_forecast};
use crate::ledger::{CapacityStore, TimeEntryFilter};
use crate::models::{Period, TimeEntry};

/// Share of high-risk resources above which hiring is recommended.
const CRITICAL_RISK_SHARE: f64 = 0.3;

/// Flat growth applied to the weekly baseline for the next-week projection.
const NEXT_WEEK_GROWTH: f64 = 1.1;

const HISTORY_WEEKS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: u32) -> Self {
        if score >= 50 {
            RiskLevel::High
        } else if score >= 30 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn recommendation(self, utilization: f64) -> &'static str {
        match self {
            RiskLevel::High => "Immediate action needed: Reduce workload or add resources",
            RiskLevel::Medium if utilization > 90.0 => {
                "Monitor closely and consider workload adjustment"
            }
            RiskLevel::Medium => "Provide additional support",
            RiskLevel::Low => "Continue current allocation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BurnoutRisk {
    pub resource_id: Uuid,
    pub name: String,
    pub risk_score: u32,
    pub risk_level: RiskLevel,
    pub recommendation: &'static str,
}

/// Additive score: every threshold a resource crosses contributes.
pub fn risk_score(utilization: f64, efficiency: f64) -> u32 {
    let mut score = 0;
    if utilization > 90.0 {
        score += 30;
    }
    if efficiency < 80.0 {
        score += 20;
    }
    if utilization > 100.0 {
        score += 40;
    }
    score
}

pub fn burnout_risk(row: &ResourceUtilization) -> BurnoutRisk {
    let risk_score = risk_score(row.utilization(), row.efficiency());
    let risk_level = RiskLevel::from_score(risk_score);

    BurnoutRisk {
        resource_id: row.resource_id,
        name: row.name.clone(),
        risk_score,
        risk_level,
        recommendation: risk_level.recommendation(row.utilization()),
    }
}

/// Only medium and high risks are surfaced.
pub fn burnout_risks(rows: &[ResourceUtilization]) -> Vec<BurnoutRisk> {
    rows.iter()
        .map(burnout_risk)
        .filter(|r| r.risk_level != RiskLevel::Low)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectMetrics {
    pub project_id: Uuid,
    pub name: String,
    pub actual_hours: f64,
    pub forecast_hours: f64,
    pub resource_count: usize,
    pub efficiency: f64,
    pub variance: f64,
}

/// Per-project totals for projects that have any hours in the filtered entries.
pub fn project_metrics(store: &CapacityStore, entries: &[&TimeEntry]) -> Vec<ProjectMetrics> {
    store
        .roster
        .projects()
        .iter()
        .filter_map(|project| {
            let project_entries: Vec<_> = entries
                .iter()
                .copied()
                .filter(|e| e.project_id == project.id)
                .collect();
            let actual_hours = total_actual(project_entries.iter().copied());
            let forecast_hours = total_forecast(project_entries.iter().copied());
            if actual_hours <= 0.0 && forecast_hours <= 0.0 {
                return None;
            }

            let resource_count = project_entries
                .iter()
                .map(|e| e.resource_id)
                .collect::<HashSet<_>>()
                .len();

            Some(ProjectMetrics {
                project_id: project.id,
                name: project.name.clone(),
                actual_hours,
                forecast_hours,
                resource_count,
                efficiency: percent_of(actual_hours, forecast_hours),
                variance: actual_hours - forecast_hours,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectPrediction {
    pub project_id: Uuid,
    pub name: String,
    pub remaining_hours: f64,
    pub predicted_completion_hours: f64,
    pub confidence_level: f64,
    pub on_track: bool,
}

pub fn predict_completion(metrics: &ProjectMetrics) -> ProjectPrediction {
    let efficiency = metrics.efficiency;
    let remaining_hours = (metrics.forecast_hours - metrics.actual_hours).max(0.0);

    ProjectPrediction {
        project_id: metrics.project_id,
        name: metrics.name.clone(),
        remaining_hours,
        predicted_completion_hours: remaining_hours * (efficiency / 100.0),
        confidence_level: (efficiency - 10.0).clamp(60.0, 95.0),
        on_track: (efficiency - 100.0).abs() <= 15.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Critical,
    Optimization,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacityRecommendation {
    pub kind: RecommendationKind,
    pub message: &'static str,
}

pub fn capacity_recommendations(rows: &[ResourceUtilization]) -> Vec<CapacityRecommendation> {
    let mut recommendations = Vec::new();

    let high_risk = rows
        .iter()
        .filter(|r| burnout_risk(r).risk_level == RiskLevel::High)
        .count();
    if high_risk as f64 > rows.len() as f64 * CRITICAL_RISK_SHARE {
        recommendations.push(CapacityRecommendation {
            kind: RecommendationKind::Critical,
            message: "Consider hiring additional resources - 30%+ of team at high burnout risk",
        });
    }

    if rows.iter().any(|r| r.utilization() < 50.0) {
        recommendations.push(CapacityRecommendation {
            kind: RecommendationKind::Optimization,
            message: "Some resources are underutilized - consider workload rebalancing",
        });
    }

    recommendations
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub label: String,
    pub historical: Option<f64>,
    pub predicted: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacityForecast {
    pub avg_daily_hours: f64,
    pub weekly_baseline: f64,
    pub next_week_forecast: f64,
    pub series: Vec<ForecastPoint>,
}

/// Next-week projection from the window's average daily actual hours. This is
/// a flat growth assumption, not a fitted trend.
pub fn capacity_forecast(entries: &[&TimeEntry], range: &DateRange) -> CapacityForecast {
    let days = range.days();
    let avg_daily_hours = if days > 0 {
        total_actual(entries.iter().copied()) / days as f64
    } else {
        0.0
    };
    let weekly_baseline = avg_daily_hours * 7.0;
    let next_week_forecast = weekly_baseline * NEXT_WEEK_GROWTH;

    let mut series: Vec<_> = (1..=HISTORY_WEEKS)
        .map(|week| ForecastPoint {
            label: format!("Week {week}"),
            historical: Some(weekly_baseline),
            predicted: (week == HISTORY_WEEKS).then_some(weekly_baseline),
        })
        .collect();
    series.push(ForecastPoint {
        label: "Next Week (Predicted)".to_string(),
        historical: None,
        predicted: Some(next_week_forecast),
    });

    CapacityForecast {
        avg_daily_hours,
        weekly_baseline,
        next_week_forecast,
        series,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTrend {
    pub date: NaiveDate,
    pub forecast: f64,
    pub actual: f64,
    pub entries: usize,
}

pub fn daily_trends(entries: &[&TimeEntry]) -> Vec<DailyTrend> {
    let mut by_date: BTreeMap<NaiveDate, DailyTrend> = BTreeMap::new();
    for entry in entries {
        let trend = by_date.entry(entry.date).or_insert_with(|| DailyTrend {
            date: entry.date,
            forecast: 0.0,
            actual: 0.0,
            entries: 0,
        });
        trend.forecast += entry.forecast_hours;
        trend.actual += entry.actual_or_zero();
        trend.entries += 1;
    }
    by_date.into_values().collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub range: DateRange,
    pub total_forecast: f64,
    pub total_actual: f64,
    pub variance: f64,
    pub accuracy: f64,
    pub resources: Vec<ResourceUtilization>,
    pub projects: Vec<ProjectMetrics>,
    pub daily_trends: Vec<DailyTrend>,
    pub burnout_risks: Vec<BurnoutRisk>,
    pub predictions: Vec<ProjectPrediction>,
    pub recommendations: Vec<CapacityRecommendation>,
    pub forecast: CapacityForecast,
}

fn scoped_entries<'a>(
    store: &'a CapacityStore,
    range: &DateRange,
    manager_id: Option<Uuid>,
) -> Vec<&'a TimeEntry> {
    store.time.query(&TimeEntryFilter {
        manager_id,
        ..range.filter()
    })
}

pub fn project_predictions(
    store: &CapacityStore,
    range: &DateRange,
    manager_id: Option<Uuid>,
) -> Vec<ProjectPrediction> {
    let entries = scoped_entries(store, range, manager_id);
    project_metrics(store, &entries)
        .iter()
        .map(predict_completion)
        .collect()
}

pub fn analytics_report(
    store: &CapacityStore,
    range: &DateRange,
    manager_id: Option<Uuid>,
) -> AnalyticsReport {
    let entries = scoped_entries(store, range, manager_id);
    let total_forecast = total_forecast(entries.iter().copied());
    let total_actual = total_actual(entries.iter().copied());

    let rows = utilization_rows(store, range, manager_id);
    let projects = project_metrics(store, &entries);

    AnalyticsReport {
        range: *range,
        total_forecast,
        total_actual,
        variance: total_actual - total_forecast,
        accuracy: percent_of(total_actual, total_forecast),
        burnout_risks: burnout_risks(&rows),
        recommendations: capacity_recommendations(&rows),
        predictions: projects.iter().map(predict_completion).collect(),
        daily_trends: daily_trends(&entries),
        forecast: capacity_forecast(&entries, range),
        resources: rows
            .into_iter()
            .filter(|r| r.figures.actual_hours > 0.0 || r.figures.forecast_hours > 0.0)
            .collect(),
        projects,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub date: NaiveDate,
    pub actual_hours: f64,
    pub utilization: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapRow {
    pub resource_id: Uuid,
    pub name: String,
    pub daily_capacity: f64,
    pub cells: Vec<HeatmapCell>,
}

/// Per resource per day, logged hours against the daily hours implied by
/// the resource's total allocation.
pub fn utilization_heatmap(
    store: &CapacityStore,
    range: &DateRange,
    manager_id: Option<Uuid>,
) -> Vec<HeatmapRow> {
    let entries = store.time.query(&range.filter());

    store
        .roster
        .resources_by_manager(manager_id)
        .into_iter()
        .map(|resource| {
            let daily_capacity = Period::Day
                .capacity_hours(store.allocations.total_allocation(resource.id));
            let cells = range
                .dates()
                .map(|date| {
                    let actual_hours = total_actual(
                        entries
                            .iter()
                            .copied()
                            .filter(|e| e.resource_id == resource.id && e.date == date),
                    );
                    HeatmapCell {
                        date,
                        actual_hours,
                        utilization: percent_of(actual_hours, daily_capacity).round() as i64,
                    }
                })
                .collect();

            HeatmapRow {
                resource_id: resource.id,
                name: resource.name.clone(),
                daily_capacity,
                cells,
            }
        })
        .collect()
}
