use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportStatus {
    Submitted,
    UnderReview,
    Verified,
    Rejected,
}

/// A citizen-submitted report on a tracked project, reviewed by a
/// community champion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: u32,
    pub project_id: u32,
    pub reporter_id: String,
    pub title: String,
    pub details: String,
    pub state: String,
    pub lga: String,
    pub status: ReportStatus,
    pub submitted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl Report {
    pub fn is_reviewed(&self) -> bool {
        matches!(self.status, ReportStatus::Verified | ReportStatus::Rejected)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewReport {
    pub project_id: u32,
    pub title: String,
    pub details: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyRequest {
    pub approved: bool,
}
