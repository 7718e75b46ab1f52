use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: Uuid,
    pub resource_id: Uuid,
    pub project_id: Uuid,
    pub manager_id: Option<Uuid>,
    pub date: NaiveDate,
    pub forecast_hours: f64,
    /// `None` until hours have been logged.
    pub actual_hours: Option<f64>,
    #[serde(default)]
    pub notes: String,
}

impl TimeEntry {
    pub fn actual_or_zero(&self) -> f64 {
        self.actual_hours.unwrap_or(0.0)
    }
}

/// A time entry before the ledger has assigned it an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTimeEntry {
    pub resource_id: Uuid,
    pub project_id: Uuid,
    pub manager_id: Option<Uuid>,
    pub date: NaiveDate,
    pub forecast_hours: f64,
    pub actual_hours: Option<f64>,
    #[serde(default)]
    pub notes: String,
}

impl NewTimeEntry {
    pub fn into_entry(self, id: Uuid) -> TimeEntry {
        TimeEntry {
            id,
            resource_id: self.resource_id,
            project_id: self.project_id,
            manager_id: self.manager_id,
            date: self.date,
            forecast_hours: self.forecast_hours,
            actual_hours: self.actual_hours,
            notes: self.notes,
        }
    }
}
