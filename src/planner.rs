use chrono::NaiveDate;
use tokio::sync::{RwLock, RwLockReadGuard};
use uuid::Uuid;

use crate::ledger::{AllocationSummary, CapacityStore, DuplicateLink, Snapshot, TimeEntryFilter};
use crate::metrics::analytics::{self, AnalyticsReport, BurnoutRisk, HeatmapRow, ProjectPrediction};
use crate::metrics::dashboard::{self, Dashboard};
use crate::metrics::utilization::{self, UtilizationFilter, UtilizationReport};
use crate::metrics::DateRange;
use crate::models::{AllocationLink, NewTimeEntry, Project, ProjectManager, Resource, TimeEntry};
use crate::sync::rows::SheetSnapshot;
use crate::sync::{SyncDispatcher, SyncError, Table};

/// Owns the capacity store. Commands commit locally first and then hand the
/// change to the sync dispatcher; queries run against a read guard.
pub struct Planner {
    store: RwLock<CapacityStore>,
    sync: SyncDispatcher,
}

impl Planner {
    pub fn new(store: CapacityStore, sync: SyncDispatcher) -> Self {
        Self {
            store: RwLock::new(store),
            sync,
        }
    }

    pub fn sync(&self) -> &SyncDispatcher {
        &self.sync
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, CapacityStore> {
        self.store.read().await
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.store.read().await.snapshot()
    }

    // Projects

    pub async fn add_project(&self, project: Project) -> Project {
        self.store.write().await.roster.add_project(project.clone());
        self.sync.upserted(&project);
        project
    }

    pub async fn update_project(&self, project: Project) -> bool {
        let updated = self.store.write().await.roster.update_project(project.clone());
        if updated {
            self.sync.upserted(&project);
        }
        updated
    }

    /// Removes the project and every allocation link pointing at it.
    pub async fn delete_project(&self, id: Uuid) -> bool {
        let (removed, links) = {
            let mut store = self.store.write().await;
            let removed = store.roster.remove_project(id).is_some();
            let links = store.allocations.remove_where(|l| l.project_id == id);
            (removed, links)
        };
        self.dispatch_removed(removed, Table::Projects, id, &links);
        removed
    }

    // Resources

    pub async fn add_resource(&self, resource: Resource) -> Resource {
        self.store.write().await.roster.add_resource(resource.clone());
        self.sync.upserted(&resource);
        resource
    }

    pub async fn update_resource(&self, resource: Resource) -> bool {
        let updated = self.store.write().await.roster.update_resource(resource.clone());
        if updated {
            self.sync.upserted(&resource);
        }
        updated
    }

    /// Removes the resource and every allocation link pointing at it.
    pub async fn delete_resource(&self, id: Uuid) -> bool {
        let (removed, links) = {
            let mut store = self.store.write().await;
            let removed = store.roster.remove_resource(id).is_some();
            let links = store.allocations.remove_where(|l| l.resource_id == id);
            (removed, links)
        };
        self.dispatch_removed(removed, Table::Resources, id, &links);
        removed
    }

    fn dispatch_removed(&self, removed: bool, table: Table, id: Uuid, links: &[AllocationLink]) {
        if removed {
            self.sync.removed(table, id);
        }
        for link in links {
            self.sync.removed(Table::ProjectLinks, link.id);
        }
    }

    // Managers

    pub async fn add_manager(&self, manager: ProjectManager) -> ProjectManager {
        self.store.write().await.roster.add_manager(manager.clone());
        self.sync.upserted(&manager);
        manager
    }

    pub async fn delete_manager(&self, id: Uuid) -> bool {
        let removed = self.store.write().await.roster.remove_manager(id).is_some();
        if removed {
            self.sync.removed(Table::ProjectManagers, id);
        }
        removed
    }

    // Allocation ledger

    pub async fn link_resource(
        &self,
        project_id: Uuid,
        resource_id: Uuid,
        manager_id: Option<Uuid>,
        percentage: f64,
    ) -> Result<AllocationLink, DuplicateLink> {
        let link = self
            .store
            .write()
            .await
            .allocations
            .link(project_id, resource_id, manager_id, percentage)?;

        let total = self.total_allocation(resource_id).await;
        if total > 100.0 {
            tracing::warn!("Resource {resource_id} is over-allocated at {total}%");
        }
        self.sync.upserted(&link);
        Ok(link)
    }

    pub async fn unlink_resource(&self, link_id: Uuid) -> bool {
        let removed = self.store.write().await.allocations.unlink(link_id).is_some();
        if removed {
            self.sync.removed(Table::ProjectLinks, link_id);
        }
        removed
    }

    pub async fn update_allocation(&self, link_id: Uuid, percentage: f64) -> Option<AllocationLink> {
        let link = self
            .store
            .write()
            .await
            .allocations
            .update_allocation(link_id, percentage)?;
        self.sync.upserted(&link);
        Some(link)
    }

    pub async fn total_allocation(&self, resource_id: Uuid) -> f64 {
        self.store.read().await.allocations.total_allocation(resource_id)
    }

    pub async fn available_allocation(&self, resource_id: Uuid) -> f64 {
        self.store.read().await.allocations.available_allocation(resource_id)
    }

    pub async fn allocation_summary(&self, resource_id: Uuid) -> AllocationSummary {
        self.store.read().await.allocations.summary(resource_id)
    }

    // Time ledger

    pub async fn add_time_entry(&self, entry: NewTimeEntry) -> TimeEntry {
        let entry = self.store.write().await.time.add(entry);
        self.sync.upserted(&entry);
        entry
    }

    pub async fn add_time_entries(&self, entries: Vec<NewTimeEntry>) -> Vec<TimeEntry> {
        let added: Vec<TimeEntry> = {
            let mut store = self.store.write().await;
            entries.into_iter().map(|e| store.time.add(e)).collect()
        };
        for entry in &added {
            self.sync.upserted(entry);
        }
        added
    }

    pub async fn update_time_entry(&self, entry: TimeEntry) -> bool {
        let updated = self.store.write().await.time.update(entry.clone());
        if updated {
            self.sync.upserted(&entry);
        }
        updated
    }

    pub async fn delete_time_entry(&self, id: Uuid) -> bool {
        let removed = self.store.write().await.time.remove(id).is_some();
        if removed {
            self.sync.removed(Table::TimeEntries, id);
        }
        removed
    }

    pub async fn query_time_entries(&self, filter: &TimeEntryFilter) -> Vec<TimeEntry> {
        self.store
            .read()
            .await
            .time
            .query(filter)
            .into_iter()
            .cloned()
            .collect()
    }

    // Reports

    pub async fn utilization_report(
        &self,
        range: &DateRange,
        filter: &UtilizationFilter,
    ) -> UtilizationReport {
        utilization::utilization_report(&*self.store.read().await, range, filter)
    }

    pub async fn burnout_risks(&self, range: &DateRange, manager_id: Option<Uuid>) -> Vec<BurnoutRisk> {
        let store = self.store.read().await;
        analytics::burnout_risks(&utilization::utilization_rows(&store, range, manager_id))
    }

    pub async fn project_predictions(
        &self,
        range: &DateRange,
        manager_id: Option<Uuid>,
    ) -> Vec<ProjectPrediction> {
        analytics::project_predictions(&*self.store.read().await, range, manager_id)
    }

    pub async fn analytics(&self, range: &DateRange, manager_id: Option<Uuid>) -> AnalyticsReport {
        analytics::analytics_report(&*self.store.read().await, range, manager_id)
    }

    pub async fn heatmap(&self, range: &DateRange, manager_id: Option<Uuid>) -> Vec<HeatmapRow> {
        analytics::utilization_heatmap(&*self.store.read().await, range, manager_id)
    }

    pub async fn dashboard(&self, manager_id: Option<Uuid>, today: NaiveDate) -> Dashboard {
        dashboard::dashboard(&*self.store.read().await, manager_id, today)
    }

    // Mirror

    /// Replace the whole store with the mirror's contents. Local edits that
    /// were not pushed yet are lost.
    pub async fn pull(&self) -> Result<(), SyncError> {
        let mirror = self.sync.mirror()?.clone();
        let sheets = match mirror.pull_all().await {
            Ok(sheets) => sheets,
            Err(e) => {
                self.sync.record_failure(&e);
                return Err(e);
            }
        };

        let snapshot = sheets.to_snapshot();
        tracing::info!(
            "Pulled {} projects, {} resources, {} links, {} time entries",
            snapshot.projects.len(),
            snapshot.resources.len(),
            snapshot.project_links.len(),
            snapshot.time_entries.len()
        );
        self.store.write().await.replace(snapshot);
        self.sync.record_success();
        Ok(())
    }

    pub async fn push_all(&self) -> Result<(), SyncError> {
        let mirror = self.sync.mirror()?.clone();
        let sheets = SheetSnapshot::from_snapshot(&self.snapshot().await);
        match mirror.push_all(sheets).await {
            Ok(()) => {
                self.sync.record_success();
                Ok(())
            }
            Err(e) => {
                self.sync.record_failure(&e);
                Err(e)
            }
        }
    }

    /// Push the coalesced changes the debouncer has been holding.
    pub async fn flush_pending(&self) -> Result<(), SyncError> {
        let debouncer = self.sync.debouncer();
        debouncer.begin_flush();
        let result = self.push_all().await;
        debouncer.finish_flush();
        result
    }
}
