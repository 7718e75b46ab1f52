pub mod analytics;
pub mod dashboard;
pub mod plan;
pub mod utilization;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ledger::TimeEntryFilter;

/// Inclusive calendar window used by every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DateRange {
    /// `None` when the window is inverted.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Option<Self> {
        (start_date <= end_date).then_some(Self {
            start_date,
            end_date,
        })
    }

    pub fn days(&self) -> i64 {
        ((self.end_date - self.start_date).num_days() + 1).max(0)
    }

    /// Fractional, never rounded.
    pub fn weeks(&self) -> f64 {
        self.days() as f64 / 7.0
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        self.start_date.iter_days().take(self.days() as usize)
    }

    pub fn filter(&self) -> TimeEntryFilter {
        TimeEntryFilter::window(self.start_date, self.end_date)
    }
}

/// `numerator / denominator * 100`, or zero when the denominator is not positive.
pub(crate) fn percent_of(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator * 100.0
    } else {
        0.0
    }
}
