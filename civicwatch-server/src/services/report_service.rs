use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;

use civicwatch_shared::errors::{AppError, AppResult, ErrorCode};
use civicwatch_shared::types::auth::AuthUser;

use crate::models::{
    NewGlobalNotification, NewReport, NotificationType, Priority, Report, ReportStatus,
    TargetAudience,
};
use crate::services::{NotificationService, ProjectService};

/// Citizen reports on tracked projects, reviewed by community champions.
///
/// Report lifecycle changes feed back into the shared notification pool:
/// submission and review outcomes notify the reporter, and approved
/// verifications announce champion activity to the report's LGA.
pub struct ReportService {
    reports: RwLock<ReportLog>,
    notifications: Arc<NotificationService>,
    projects: Arc<ProjectService>,
}

struct ReportLog {
    entries: Vec<Report>,
    next_id: u32,
}

impl ReportService {
    pub fn new(notifications: Arc<NotificationService>, projects: Arc<ProjectService>) -> Self {
        Self {
            reports: RwLock::new(ReportLog { entries: Vec::new(), next_id: 1 }),
            notifications,
            projects,
        }
    }

    pub fn submit(&self, reporter: &AuthUser, new: NewReport) -> AppResult<Report> {
        let project = self.projects.get(new.project_id)?;

        let report = {
            let mut log = self.reports.write().unwrap_or_else(PoisonError::into_inner);
            let report = Report {
                id: log.next_id,
                project_id: project.id,
                reporter_id: reporter.id.clone(),
                title: new.title,
                details: new.details,
                state: project.state.clone(),
                lga: project.lga.clone(),
                status: ReportStatus::Submitted,
                submitted_at: Utc::now(),
                reviewed_by: None,
                reviewed_at: None,
            };
            log.next_id += 1;
            log.entries.push(report.clone());
            report
        };

        self.notifications.add_global(NewGlobalNotification {
            notification_type: NotificationType::ReportStatus,
            title: "Report received".into(),
            message: format!("Your report on \"{}\" has been received and is awaiting review.", project.title),
            priority: Priority::Low,
            source: Some("CivicWatch Reports".into()),
            state: Some(report.state.clone()),
            lga: Some(report.lga.clone()),
            target_audience: TargetAudience::Specific,
            user_id: Some(report.reporter_id.clone()),
        })?;

        tracing::info!(report_id = report.id, project_id = report.project_id, "report submitted");
        Ok(report)
    }

    /// Champion review. A report can be reviewed once; the outcome
    /// notifies the reporter, and approvals announce champion activity to
    /// the report's LGA audience.
    pub fn verify(&self, id: u32, champion: &AuthUser, approved: bool) -> AppResult<Report> {
        let report = {
            let mut log = self.reports.write().unwrap_or_else(PoisonError::into_inner);
            let report = log
                .entries
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| AppError::new(ErrorCode::ReportNotFound, format!("report {id} not found")))?;

            if report.is_reviewed() {
                return Err(AppError::new(
                    ErrorCode::ReportAlreadyReviewed,
                    format!("report {id} has already been reviewed"),
                ));
            }

            report.status = if approved { ReportStatus::Verified } else { ReportStatus::Rejected };
            report.reviewed_by = Some(champion.id.clone());
            report.reviewed_at = Some(Utc::now());
            report.clone()
        };

        let outcome = if approved { "verified" } else { "rejected" };
        self.notifications.add_global(NewGlobalNotification {
            notification_type: NotificationType::ReportStatus,
            title: format!("Report {outcome}"),
            message: format!("Your report \"{}\" was {outcome} by a community champion.", report.title),
            priority: Priority::Medium,
            source: Some("CivicWatch Reports".into()),
            state: Some(report.state.clone()),
            lga: Some(report.lga.clone()),
            target_audience: TargetAudience::Specific,
            user_id: Some(report.reporter_id.clone()),
        })?;

        if approved {
            self.notifications.add_global(NewGlobalNotification {
                notification_type: NotificationType::ChampionActivity,
                title: "Report verified in your area".into(),
                message: format!("A community champion verified the report \"{}\".", report.title),
                priority: Priority::Low,
                source: Some("CivicWatch Champions".into()),
                state: Some(report.state.clone()),
                lga: Some(report.lga.clone()),
                target_audience: TargetAudience::Lga,
                user_id: None,
            })?;
        }

        tracing::info!(report_id = report.id, outcome, champion_id = %champion.id, "report reviewed");
        Ok(report)
    }

    pub fn list_all(&self) -> Vec<Report> {
        let log = self.reports.read().unwrap_or_else(PoisonError::into_inner);
        log.entries.clone()
    }

    pub fn list_for_project(&self, project_id: u32) -> Vec<Report> {
        let log = self.reports.read().unwrap_or_else(PoisonError::into_inner);
        log.entries.iter().filter(|r| r.project_id == project_id).cloned().collect()
    }
}
