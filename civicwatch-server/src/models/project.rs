use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    Planned,
    Ongoing,
    Completed,
    Abandoned,
    Suspended,
}

/// A government infrastructure project under citizen watch.
///
/// Projects live in an in-memory directory for the lifetime of the
/// process: created via POST, updated via partial merge, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub state: String,
    pub lga: String,
    /// Allocated budget in naira.
    pub budget: u64,
    /// Completion percentage, clamped to 0..=100.
    pub progress: u8,
    pub contractor: String,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub category: String,
    pub state: String,
    pub lga: String,
    pub budget: u64,
    #[serde(default)]
    pub contractor: Option<String>,
}

/// Partial merge payload: only the supplied fields change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub state: Option<String>,
    pub lga: Option<String>,
    pub budget: Option<u64>,
    pub progress: Option<u8>,
    pub contractor: Option<String>,
    pub status: Option<ProjectStatus>,
}

/// Filter parameters accepted by the project listing endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectFilter {
    pub state: Option<String>,
    pub category: Option<String>,
    pub status: Option<ProjectStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectStats {
    pub total: usize,
    pub planned: usize,
    pub ongoing: usize,
    pub completed: usize,
    pub abandoned: usize,
    pub suspended: usize,
    pub total_budget: u64,
}

impl ProjectStats {
    pub fn compute(projects: &[Project]) -> Self {
        let mut stats = Self {
            total: projects.len(),
            ..Self::default()
        };
        for p in projects {
            stats.total_budget += p.budget;
            match p.status {
                ProjectStatus::Planned => stats.planned += 1,
                ProjectStatus::Ongoing => stats.ongoing += 1,
                ProjectStatus::Completed => stats.completed += 1,
                ProjectStatus::Abandoned => stats.abandoned += 1,
                ProjectStatus::Suspended => stats.suspended += 1,
            }
        }
        stats
    }
}

/// Response shape of the project listing endpoint.
#[derive(Debug, Serialize)]
pub struct ProjectListing {
    pub projects: Vec<Project>,
    pub total: usize,
    pub stats: ProjectStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_as_capitalized_string() {
        assert_eq!(serde_json::to_string(&ProjectStatus::Ongoing).unwrap(), "\"Ongoing\"");
        let parsed: ProjectStatus = serde_json::from_str("\"Abandoned\"").unwrap();
        assert_eq!(parsed, ProjectStatus::Abandoned);
    }

    #[test]
    fn stats_count_by_status_and_sum_budget() {
        let now = Utc::now();
        let mk = |status, budget| Project {
            id: 1,
            title: "t".into(),
            description: "d".into(),
            category: "Road".into(),
            state: "Lagos".into(),
            lga: "Ikeja".into(),
            budget,
            progress: 0,
            contractor: "c".into(),
            status,
            created_at: now,
            updated_at: now,
        };
        let projects = vec![
            mk(ProjectStatus::Ongoing, 100),
            mk(ProjectStatus::Ongoing, 200),
            mk(ProjectStatus::Completed, 50),
        ];
        let stats = ProjectStats::compute(&projects);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.ongoing, 2);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.total_budget, 350);
    }
}
