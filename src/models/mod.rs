mod allocation;
mod manager;
mod project;
mod resource;
mod time_entry;

pub use allocation::{AllocationLink, Period};
pub use manager::ProjectManager;
pub use project::{Project, ProjectStatus};
pub use resource::Resource;
pub use time_entry::{NewTimeEntry, TimeEntry};

use uuid::Uuid;

/// Full-time weekly hours for one resource. Never stored per resource.
pub const WEEKLY_CAPACITY_HOURS: f64 = 40.0;

/// Anything kept in a ledger or roster collection.
pub trait Record {
    fn id(&self) -> Uuid;
}

macro_rules! impl_record {
    ($($ty:ty),*) => {
        $(impl Record for $ty {
            fn id(&self) -> Uuid {
                self.id
            }
        })*
    };
}

impl_record!(AllocationLink, ProjectManager, Project, Resource, TimeEntry);
