use serde::Serialize;
use uuid::Uuid;

use crate::models::{AllocationLink, Period};

/// Upper bound on a resource's summed allocation under normal operation.
pub const FULL_ALLOCATION: f64 = 100.0;

/// Resource-to-project allocation links, in insertion order.
///
/// Over-allocation is advisory: the ledger records whatever percentage it is
/// given and reports the resulting totals. Only one link may exist per
/// (resource, project) pair.
#[derive(Debug, Default, Clone)]
pub struct AllocationLedger {
    links: Vec<AllocationLink>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateLink {
    pub existing: Uuid,
}

impl std::fmt::Display for DuplicateLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "resource is already linked to this project (link {})", self.existing)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationSummary {
    pub resource_id: Uuid,
    pub total_allocation: f64,
    pub available_allocation: f64,
    pub over_allocated: bool,
    pub daily_hours: f64,
    pub weekly_hours: f64,
    pub monthly_hours: f64,
}

impl AllocationLedger {
    pub fn from_links(links: Vec<AllocationLink>) -> Self {
        Self { links }
    }

    pub fn links(&self) -> &[AllocationLink] {
        &self.links
    }

    pub fn get(&self, link_id: Uuid) -> Option<&AllocationLink> {
        self.links.iter().find(|l| l.id == link_id)
    }

    pub fn find_pair(&self, resource_id: Uuid, project_id: Uuid) -> Option<&AllocationLink> {
        self.links
            .iter()
            .find(|l| l.resource_id == resource_id && l.project_id == project_id)
    }

    pub fn link(
        &mut self,
        project_id: Uuid,
        resource_id: Uuid,
        manager_id: Option<Uuid>,
        percentage: f64,
    ) -> Result<AllocationLink, DuplicateLink> {
        if let Some(existing) = self.find_pair(resource_id, project_id) {
            return Err(DuplicateLink {
                existing: existing.id,
            });
        }

        let link = AllocationLink {
            id: Uuid::now_v7(),
            project_id,
            resource_id,
            manager_id,
            allocation_percentage: percentage,
        };
        self.links.push(link.clone());
        Ok(link)
    }

    /// Returns the removed link, or `None` when the id was unknown.
    pub fn unlink(&mut self, link_id: Uuid) -> Option<AllocationLink> {
        let pos = self.links.iter().position(|l| l.id == link_id)?;
        Some(self.links.remove(pos))
    }

    pub fn update_allocation(&mut self, link_id: Uuid, percentage: f64) -> Option<AllocationLink> {
        let link = self.links.iter_mut().find(|l| l.id == link_id)?;
        link.allocation_percentage = percentage;
        Some(link.clone())
    }

    /// Drop every link matching `pred`, returning the removed links.
    pub fn remove_where(&mut self, mut pred: impl FnMut(&AllocationLink) -> bool) -> Vec<AllocationLink> {
        let (removed, kept) = std::mem::take(&mut self.links)
            .into_iter()
            .partition(|l| pred(l));
        self.links = kept;
        removed
    }

    pub fn links_for_manager(&self, manager_id: Option<Uuid>) -> Vec<&AllocationLink> {
        self.links
            .iter()
            .filter(|l| manager_id.is_none() || l.manager_id == manager_id)
            .collect()
    }

    pub fn links_for_resource(&self, resource_id: Uuid) -> impl Iterator<Item = &AllocationLink> {
        self.links.iter().filter(move |l| l.resource_id == resource_id)
    }

    pub fn total_allocation(&self, resource_id: Uuid) -> f64 {
        self.links_for_resource(resource_id)
            .map(|l| l.allocation_percentage)
            .sum()
    }

    pub fn available_allocation(&self, resource_id: Uuid) -> f64 {
        (FULL_ALLOCATION - self.total_allocation(resource_id)).max(0.0)
    }

    pub fn summary(&self, resource_id: Uuid) -> AllocationSummary {
        let total = self.total_allocation(resource_id);
        AllocationSummary {
            resource_id,
            total_allocation: total,
            available_allocation: (FULL_ALLOCATION - total).max(0.0),
            over_allocated: total > FULL_ALLOCATION,
            daily_hours: capacity_hours(total, Period::Day),
            weekly_hours: capacity_hours(total, Period::Week),
            monthly_hours: capacity_hours(total, Period::Month),
        }
    }
}

/// Hours equivalent of an allocation percentage. Independent of ledger state.
pub fn capacity_hours(percentage: f64, period: Period) -> f64 {
    period.capacity_hours(percentage)
}
