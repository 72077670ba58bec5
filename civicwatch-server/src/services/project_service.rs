use std::sync::{PoisonError, RwLock};

use chrono::Utc;

use civicwatch_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{
    NewProject, Project, ProjectFilter, ProjectListing, ProjectStats, ProjectStatus, ProjectUpdate,
};

/// In-memory directory of tracked projects, session scope.
///
/// Seeded at startup; projects are created and merged, never deleted.
pub struct ProjectService {
    inner: RwLock<Directory>,
}

struct Directory {
    projects: Vec<Project>,
    next_id: u32,
}

impl ProjectService {
    pub fn new(seed: Vec<Project>) -> Self {
        let next_id = seed.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        Self {
            inner: RwLock::new(Directory { projects: seed, next_id }),
        }
    }

    /// Filtered listing plus aggregate stats over the filtered set.
    pub fn list(&self, filter: &ProjectFilter) -> ProjectListing {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let projects: Vec<Project> = inner
            .projects
            .iter()
            .filter(|p| matches_filter(p, filter))
            .cloned()
            .collect();
        let stats = ProjectStats::compute(&projects);
        ProjectListing { total: projects.len(), stats, projects }
    }

    pub fn get(&self, id: u32) -> AppResult<Project> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner
            .projects
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| AppError::new(ErrorCode::ProjectNotFound, format!("project {id} not found")))
    }

    pub fn create(&self, new: NewProject) -> Project {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let now = Utc::now();
        let project = Project {
            id: inner.next_id,
            title: new.title,
            description: new.description,
            category: new.category,
            state: new.state,
            lga: new.lga,
            budget: new.budget,
            progress: 0,
            contractor: new.contractor.unwrap_or_else(|| "Unassigned".to_string()),
            status: ProjectStatus::Planned,
            created_at: now,
            updated_at: now,
        };
        inner.next_id += 1;
        inner.projects.push(project.clone());
        tracing::debug!(project_id = project.id, title = %project.title, "project created");
        project
    }

    /// Partial merge: only supplied fields change. Progress is clamped to
    /// 0..=100; reaching 100 without an explicit status moves the project
    /// to Completed.
    pub fn update(&self, id: u32, update: ProjectUpdate) -> AppResult<Project> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let project = inner
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::new(ErrorCode::ProjectNotFound, format!("project {id} not found")))?;

        if let Some(title) = update.title {
            project.title = title;
        }
        if let Some(description) = update.description {
            project.description = description;
        }
        if let Some(category) = update.category {
            project.category = category;
        }
        if let Some(state) = update.state {
            project.state = state;
        }
        if let Some(lga) = update.lga {
            project.lga = lga;
        }
        if let Some(budget) = update.budget {
            project.budget = budget;
        }
        if let Some(progress) = update.progress {
            project.progress = progress.min(100);
            if project.progress == 100 && update.status.is_none() {
                project.status = ProjectStatus::Completed;
            }
        }
        if let Some(contractor) = update.contractor {
            project.contractor = contractor;
        }
        if let Some(status) = update.status {
            project.status = status;
        }
        project.updated_at = Utc::now();

        Ok(project.clone())
    }
}

fn matches_filter(project: &Project, filter: &ProjectFilter) -> bool {
    if let Some(ref state) = filter.state {
        if !project.state.eq_ignore_ascii_case(state) {
            return false;
        }
    }
    if let Some(ref category) = filter.category {
        if !project.category.eq_ignore_ascii_case(category) {
            return false;
        }
    }
    if let Some(status) = filter.status {
        if project.status != status {
            return false;
        }
    }
    if let Some(ref search) = filter.search {
        let needle = search.to_lowercase();
        if !needle.is_empty()
            && !project.title.to_lowercase().contains(&needle)
            && !project.description.to_lowercase().contains(&needle)
        {
            return false;
        }
    }
    true
}
