use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::WEEKLY_CAPACITY_HOURS;

/// Average number of weeks in a calendar month.
pub const WEEKS_PER_MONTH: f64 = 4.33;

/// Working days in a full-time week.
pub const WORKDAYS_PER_WEEK: f64 = 5.0;

/// A percentage of one resource's week committed to one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationLink {
    pub id: Uuid,
    pub project_id: Uuid,
    pub resource_id: Uuid,
    pub manager_id: Option<Uuid>,
    pub allocation_percentage: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    #[default]
    Week,
    Month,
}

impl Period {
    /// Hours equivalent of `percentage` of a full-time week over this period.
    pub fn capacity_hours(self, percentage: f64) -> f64 {
        let weekly = percentage / 100.0 * WEEKLY_CAPACITY_HOURS;
        match self {
            Period::Day => weekly / WORKDAYS_PER_WEEK,
            Period::Week => weekly,
            Period::Month => weekly * WEEKS_PER_MONTH,
        }
    }
}
