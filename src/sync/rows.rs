//! Loosely typed worksheet rows and their conversion to domain records.
//!
//! Everything read from the mirror passes through the coercion helpers here
//! exactly once. A cell that cannot be parsed becomes a safe default (zero,
//! empty, nil id) instead of failing the pull.

use chrono::{Duration, NaiveDate};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::Table;
use crate::ledger::Snapshot;
use crate::models::{AllocationLink, Project, ProjectManager, ProjectStatus, Resource, TimeEntry};

/// A worksheet row keyed by header name.
pub type SheetRow = Map<String, Value>;

/// Raw rows for all five worksheets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetSnapshot {
    pub projects: Vec<SheetRow>,
    pub resources: Vec<SheetRow>,
    pub project_links: Vec<SheetRow>,
    pub time_entries: Vec<SheetRow>,
    pub project_managers: Vec<SheetRow>,
}

impl SheetSnapshot {
    pub fn rows(&self, table: Table) -> &[SheetRow] {
        match table {
            Table::Projects => &self.projects,
            Table::Resources => &self.resources,
            Table::ProjectLinks => &self.project_links,
            Table::TimeEntries => &self.time_entries,
            Table::ProjectManagers => &self.project_managers,
        }
    }

    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            projects: to_rows(&snapshot.projects),
            resources: to_rows(&snapshot.resources),
            project_links: to_rows(&snapshot.project_links),
            time_entries: to_rows(&snapshot.time_entries),
            project_managers: to_rows(&snapshot.project_managers),
        }
    }

    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            projects: from_rows(&self.projects),
            resources: from_rows(&self.resources),
            project_links: from_rows(&self.project_links),
            time_entries: from_rows(&self.time_entries),
            project_managers: from_rows(&self.project_managers),
        }
    }
}

fn to_rows<R: SheetRecord>(records: &[R]) -> Vec<SheetRow> {
    records.iter().map(SheetRecord::to_row).collect()
}

fn from_rows<R: SheetRecord>(rows: &[SheetRow]) -> Vec<R> {
    rows.iter().map(R::from_row).collect()
}

pub trait SheetRecord: Sized {
    const TABLE: Table;
    fn to_row(&self) -> SheetRow;
    fn from_row(row: &SheetRow) -> Self;
}

/// Spreadsheet serial dates count days from this epoch.
fn serial_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or_default()
}

pub fn text(row: &SheetRow, key: &str) -> String {
    match row.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

pub fn optional_number(row: &SheetRow, key: &str) -> Option<f64> {
    let value = match row.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    value.is_finite().then_some(value)
}

pub fn number(row: &SheetRow, key: &str) -> f64 {
    optional_number(row, key).unwrap_or(0.0)
}

pub fn date(row: &SheetRow, key: &str) -> Option<NaiveDate> {
    match row.get(key)? {
        Value::String(s) => {
            let s = s.trim();
            NaiveDate::parse_from_str(s.get(..10).unwrap_or(s), "%Y-%m-%d").ok()
        }
        Value::Number(n) => {
            let days = n.as_f64().filter(|d| d.is_finite() && *d > 0.0)?;
            serial_epoch().checked_add_signed(Duration::try_days(days as i64)?)
        }
        _ => None,
    }
}

pub fn id(row: &SheetRow, key: &str) -> Option<Uuid> {
    Uuid::parse_str(&text(row, key)).ok()
}

/// A JSON-encoded list of strings, e.g. `["Rust","SQL"]`.
pub fn list(row: &SheetRow, key: &str) -> Vec<String> {
    match row.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        Some(Value::String(s)) => serde_json::from_str(s).unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// A record's own id. Unreadable ids get a fresh one so the row survives.
fn record_id(row: &SheetRow) -> Uuid {
    id(row, "ID").unwrap_or_else(Uuid::now_v7)
}

fn opt_id_value(id: Option<Uuid>) -> Value {
    id.map(|i| Value::String(i.to_string()))
        .unwrap_or_else(|| Value::String(String::new()))
}

fn opt_date_value(date: Option<NaiveDate>) -> Value {
    Value::String(date.map(|d| d.to_string()).unwrap_or_default())
}

fn number_value(n: f64) -> Value {
    serde_json::Number::from_f64(n)
        .map(Value::Number)
        .unwrap_or(Value::from(0))
}

fn row<const N: usize>(cells: [(&str, Value); N]) -> SheetRow {
    cells
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

impl SheetRecord for Project {
    const TABLE: Table = Table::Projects;

    fn to_row(&self) -> SheetRow {
        row([
            ("ID", Value::from(self.id.to_string())),
            ("Name", Value::from(self.name.clone())),
            ("Description", Value::from(self.description.clone())),
            ("Status", Value::from(self.status.as_str())),
            ("StartDate", opt_date_value(self.start_date)),
            ("EndDate", opt_date_value(self.end_date)),
            ("CreatedBy", Value::from(self.created_by.clone())),
        ])
    }

    fn from_row(row: &SheetRow) -> Self {
        Project {
            id: record_id(row),
            name: text(row, "Name"),
            description: text(row, "Description"),
            status: ProjectStatus::parse(&text(row, "Status")).unwrap_or_default(),
            start_date: date(row, "StartDate"),
            end_date: date(row, "EndDate"),
            created_by: text(row, "CreatedBy"),
        }
    }
}

impl SheetRecord for Resource {
    const TABLE: Table = Table::Resources;

    fn to_row(&self) -> SheetRow {
        row([
            ("ID", Value::from(self.id.to_string())),
            ("Name", Value::from(self.name.clone())),
            ("Email", Value::from(self.email.clone())),
            ("Role", Value::from(self.role.clone())),
            ("Department", Value::from(self.department.clone())),
            ("ManagerID", opt_id_value(self.manager_id)),
            (
                "Skills",
                Value::from(serde_json::to_string(&self.skills).unwrap_or_else(|_| "[]".into())),
            ),
            ("Avatar", Value::from(self.avatar.clone())),
        ])
    }

    fn from_row(row: &SheetRow) -> Self {
        Resource {
            id: record_id(row),
            name: text(row, "Name"),
            email: text(row, "Email"),
            role: text(row, "Role"),
            department: text(row, "Department"),
            manager_id: id(row, "ManagerID"),
            skills: list(row, "Skills"),
            avatar: text(row, "Avatar"),
        }
    }
}

impl SheetRecord for AllocationLink {
    const TABLE: Table = Table::ProjectLinks;

    fn to_row(&self) -> SheetRow {
        row([
            ("ID", Value::from(self.id.to_string())),
            ("ProjectID", Value::from(self.project_id.to_string())),
            ("ResourceID", Value::from(self.resource_id.to_string())),
            ("ManagerID", opt_id_value(self.manager_id)),
            ("AllocationPercentage", number_value(self.allocation_percentage)),
        ])
    }

    fn from_row(row: &SheetRow) -> Self {
        AllocationLink {
            id: record_id(row),
            project_id: id(row, "ProjectID").unwrap_or_default(),
            resource_id: id(row, "ResourceID").unwrap_or_default(),
            manager_id: id(row, "ManagerID"),
            allocation_percentage: number(row, "AllocationPercentage"),
        }
    }
}

impl SheetRecord for TimeEntry {
    const TABLE: Table = Table::TimeEntries;

    fn to_row(&self) -> SheetRow {
        row([
            ("ID", Value::from(self.id.to_string())),
            ("ResourceID", Value::from(self.resource_id.to_string())),
            ("ProjectID", Value::from(self.project_id.to_string())),
            ("ManagerID", opt_id_value(self.manager_id)),
            ("Date", Value::from(self.date.to_string())),
            ("ForecastHours", number_value(self.forecast_hours)),
            (
                "ActualHours",
                self.actual_hours
                    .map(number_value)
                    .unwrap_or_else(|| Value::from("")),
            ),
            ("Notes", Value::from(self.notes.clone())),
        ])
    }

    fn from_row(row: &SheetRow) -> Self {
        TimeEntry {
            id: record_id(row),
            resource_id: id(row, "ResourceID").unwrap_or_default(),
            project_id: id(row, "ProjectID").unwrap_or_default(),
            manager_id: id(row, "ManagerID"),
            date: date(row, "Date").unwrap_or_default(),
            forecast_hours: number(row, "ForecastHours").max(0.0),
            actual_hours: optional_number(row, "ActualHours").map(|h| h.max(0.0)),
            notes: text(row, "Notes"),
        }
    }
}

impl SheetRecord for ProjectManager {
    const TABLE: Table = Table::ProjectManagers;

    fn to_row(&self) -> SheetRow {
        row([
            ("ID", Value::from(self.id.to_string())),
            ("Name", Value::from(self.name.clone())),
            ("Email", Value::from(self.email.clone())),
            ("Department", Value::from(self.department.clone())),
            ("Avatar", Value::from(self.avatar.clone())),
        ])
    }

    fn from_row(row: &SheetRow) -> Self {
        ProjectManager {
            id: record_id(row),
            name: text(row, "Name"),
            email: text(row, "Email"),
            department: text(row, "Department"),
            avatar: text(row, "Avatar"),
        }
    }
}
