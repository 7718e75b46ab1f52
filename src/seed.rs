use chrono::NaiveDate;
use uuid::Uuid;

use crate::ledger::{CapacityStore, Snapshot};
use crate::models::{AllocationLink, Project, ProjectManager, ProjectStatus, Resource, TimeEntry};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn manager(name: &str, email: &str, department: &str) -> ProjectManager {
    ProjectManager {
        id: Uuid::now_v7(),
        name: name.to_string(),
        email: email.to_string(),
        department: department.to_string(),
        avatar: String::new(),
    }
}

fn project(name: &str, description: &str, status: ProjectStatus, start: NaiveDate, end: NaiveDate) -> Project {
    Project {
        id: Uuid::now_v7(),
        name: name.to_string(),
        description: description.to_string(),
        status,
        start_date: Some(start),
        end_date: Some(end),
        created_by: "admin".to_string(),
    }
}

fn resource(name: &str, email: &str, role: &str, pm: &ProjectManager, skills: &[&str]) -> Resource {
    Resource {
        id: Uuid::now_v7(),
        name: name.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        department: pm.department.clone(),
        manager_id: Some(pm.id),
        skills: skills.iter().map(|s| s.to_string()).collect(),
        avatar: String::new(),
    }
}

fn link(p: &Project, r: &Resource, percentage: f64) -> AllocationLink {
    AllocationLink {
        id: Uuid::now_v7(),
        project_id: p.id,
        resource_id: r.id,
        manager_id: r.manager_id,
        allocation_percentage: percentage,
    }
}

fn entry(r: &Resource, p: &Project, date: NaiveDate, forecast: f64, actual: f64, notes: &str) -> TimeEntry {
    TimeEntry {
        id: Uuid::now_v7(),
        resource_id: r.id,
        project_id: p.id,
        manager_id: r.manager_id,
        date,
        forecast_hours: forecast,
        actual_hours: Some(actual),
        notes: notes.to_string(),
    }
}

/// A small engineering/design roster for trying the service out.
pub fn demo_store() -> CapacityStore {
    let sarah = manager("Sarah Johnson", "sarah@company.com", "Engineering");
    let michael = manager("Michael Chen", "michael@company.com", "Design");

    let ecommerce = project(
        "E-commerce Platform",
        "Building new e-commerce platform",
        ProjectStatus::Active,
        day(2024, 1, 15),
        day(2024, 6, 30),
    );
    let mobile = project(
        "Mobile App Redesign",
        "Redesigning mobile application UI/UX",
        ProjectStatus::Active,
        day(2024, 2, 1),
        day(2024, 5, 15),
    );
    let api = project(
        "API Integration",
        "Third-party API integrations",
        ProjectStatus::Planning,
        day(2024, 3, 1),
        day(2024, 4, 30),
    );

    let john = resource("John Smith", "john@company.com", "Frontend Developer", &sarah, &["React", "TypeScript"]);
    let emma = resource("Emma Wilson", "emma@company.com", "Backend Developer", &sarah, &["Python", "PostgreSQL"]);
    let david = resource("David Brown", "david@company.com", "UI/UX Designer", &michael, &["Figma", "Prototyping"]);
    let lisa = resource("Lisa Garcia", "lisa@company.com", "Product Designer", &michael, &["Design Systems"]);

    let project_links = vec![
        link(&ecommerce, &john, 60.0),
        link(&ecommerce, &emma, 70.0),
        link(&mobile, &david, 80.0),
        link(&mobile, &lisa, 50.0),
        link(&api, &john, 40.0),
    ];

    let time_entries = vec![
        entry(&john, &ecommerce, day(2024, 1, 15), 8.0, 7.5, "Frontend development work"),
        entry(&john, &ecommerce, day(2024, 1, 16), 8.0, 8.0, "Component development"),
        entry(&emma, &ecommerce, day(2024, 1, 15), 6.0, 6.5, "API development"),
        entry(&david, &mobile, day(2024, 2, 1), 7.0, 6.5, "Design mockups created"),
    ];

    CapacityStore::from_snapshot(Snapshot {
        projects: vec![ecommerce, mobile, api],
        resources: vec![john, emma, david, lisa],
        project_links,
        time_entries,
        project_managers: vec![sarah, michael],
    })
}
