use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{NewTimeEntry, TimeEntry};

/// Daily forecast/actual records in insertion order. Duplicate
/// (resource, project, date) tuples are allowed and always summed.
#[derive(Debug, Default, Clone)]
pub struct TimeLedger {
    entries: Vec<TimeEntry>,
}

/// Conjunction of optional predicates. An empty filter matches everything.
#[derive(Debug, Default, Clone, Copy, PartialEq, Deserialize)]
pub struct TimeEntryFilter {
    pub manager_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub resource_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl TimeEntryFilter {
    pub fn window(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date: Some(start_date),
            end_date: Some(end_date),
            ..Default::default()
        }
    }

    pub fn matches(&self, entry: &TimeEntry) -> bool {
        self.manager_id.is_none_or(|m| entry.manager_id == Some(m))
            && self.project_id.is_none_or(|p| entry.project_id == p)
            && self.resource_id.is_none_or(|r| entry.resource_id == r)
            && self.start_date.is_none_or(|d| entry.date >= d)
            && self.end_date.is_none_or(|d| entry.date <= d)
    }
}

impl TimeLedger {
    pub fn from_entries(entries: Vec<TimeEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[TimeEntry] {
        &self.entries
    }

    pub fn get(&self, entry_id: Uuid) -> Option<&TimeEntry> {
        self.entries.iter().find(|e| e.id == entry_id)
    }

    pub fn add(&mut self, entry: NewTimeEntry) -> TimeEntry {
        let entry = entry.into_entry(Uuid::now_v7());
        self.entries.push(entry.clone());
        entry
    }

    /// Replace the entry with the same id in place. Returns false on a miss.
    pub fn update(&mut self, entry: TimeEntry) -> bool {
        match self.entries.iter_mut().find(|e| e.id == entry.id) {
            Some(slot) => {
                *slot = entry;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, entry_id: Uuid) -> Option<TimeEntry> {
        let pos = self.entries.iter().position(|e| e.id == entry_id)?;
        Some(self.entries.remove(pos))
    }

    pub fn query(&self, filter: &TimeEntryFilter) -> Vec<&TimeEntry> {
        self.entries.iter().filter(|e| filter.matches(e)).collect()
    }
}

/// Sum of logged hours, treating unlogged entries as zero.
pub fn total_actual<'a>(entries: impl IntoIterator<Item = &'a TimeEntry>) -> f64 {
    entries.into_iter().map(TimeEntry::actual_or_zero).sum()
}

pub fn total_forecast<'a>(entries: impl IntoIterator<Item = &'a TimeEntry>) -> f64 {
    entries.into_iter().map(|e| e.forecast_hours).sum()
}
