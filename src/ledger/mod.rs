pub mod allocations;
pub mod roster;
pub mod time_entries;

use serde::{Deserialize, Serialize};

use crate::models::{AllocationLink, Project, ProjectManager, Resource, TimeEntry};

pub use allocations::{AllocationLedger, AllocationSummary, DuplicateLink};
pub use roster::Roster;
pub use time_entries::{TimeEntryFilter, TimeLedger};

/// The single in-memory source of truth for every table.
#[derive(Debug, Default)]
pub struct CapacityStore {
    pub roster: Roster,
    pub allocations: AllocationLedger,
    pub time: TimeLedger,
}

/// A full copy of all five tables, used for mirror pushes and pulls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub projects: Vec<Project>,
    pub resources: Vec<Resource>,
    pub project_links: Vec<AllocationLink>,
    pub time_entries: Vec<TimeEntry>,
    pub project_managers: Vec<ProjectManager>,
}

impl CapacityStore {
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            roster: Roster::new(
                snapshot.projects,
                snapshot.resources,
                snapshot.project_managers,
            ),
            allocations: AllocationLedger::from_links(snapshot.project_links),
            time: TimeLedger::from_entries(snapshot.time_entries),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            projects: self.roster.projects().to_vec(),
            resources: self.roster.resources().to_vec(),
            project_links: self.allocations.links().to_vec(),
            time_entries: self.time.entries().to_vec(),
            project_managers: self.roster.managers().to_vec(),
        }
    }

    /// Replace every table wholesale. Nothing from the previous state survives.
    pub fn replace(&mut self, snapshot: Snapshot) {
        *self = Self::from_snapshot(snapshot);
    }
}
