use uuid::Uuid;

use crate::models::{Project, ProjectManager, Record, Resource};

/// Projects, resources and project managers.
#[derive(Debug, Default, Clone)]
pub struct Roster {
    projects: Vec<Project>,
    resources: Vec<Resource>,
    managers: Vec<ProjectManager>,
}

impl Roster {
    pub fn new(
        projects: Vec<Project>,
        resources: Vec<Resource>,
        managers: Vec<ProjectManager>,
    ) -> Self {
        Self {
            projects,
            resources,
            managers,
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn managers(&self) -> &[ProjectManager] {
        &self.managers
    }

    pub fn project(&self, id: Uuid) -> Option<&Project> {
        find(&self.projects, id)
    }

    pub fn resource(&self, id: Uuid) -> Option<&Resource> {
        find(&self.resources, id)
    }

    pub fn manager(&self, id: Uuid) -> Option<&ProjectManager> {
        find(&self.managers, id)
    }

    pub fn resources_by_manager(&self, manager_id: Option<Uuid>) -> Vec<&Resource> {
        self.resources
            .iter()
            .filter(|r| manager_id.is_none() || r.manager_id == manager_id)
            .collect()
    }

    pub fn add_project(&mut self, project: Project) {
        self.projects.push(project);
    }

    pub fn update_project(&mut self, project: Project) -> bool {
        replace(&mut self.projects, project)
    }

    pub fn remove_project(&mut self, id: Uuid) -> Option<Project> {
        remove(&mut self.projects, id)
    }

    pub fn add_resource(&mut self, resource: Resource) {
        self.resources.push(resource);
    }

    pub fn update_resource(&mut self, resource: Resource) -> bool {
        replace(&mut self.resources, resource)
    }

    pub fn remove_resource(&mut self, id: Uuid) -> Option<Resource> {
        remove(&mut self.resources, id)
    }

    pub fn add_manager(&mut self, manager: ProjectManager) {
        self.managers.push(manager);
    }

    pub fn remove_manager(&mut self, id: Uuid) -> Option<ProjectManager> {
        remove(&mut self.managers, id)
    }
}

fn find<T: Record>(items: &[T], id: Uuid) -> Option<&T> {
    items.iter().find(|item| item.id() == id)
}

fn replace<T: Record>(items: &mut [T], item: T) -> bool {
    match items.iter_mut().find(|existing| existing.id() == item.id()) {
        Some(slot) => {
            *slot = item;
            true
        }
        None => false,
    }
}

fn remove<T: Record>(items: &mut Vec<T>, id: Uuid) -> Option<T> {
    let pos = items.iter().position(|item| item.id() == id)?;
    Some(items.remove(pos))
}
