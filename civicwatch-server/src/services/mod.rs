pub mod notification_service;
pub mod project_service;
pub mod report_service;

pub use notification_service::NotificationService;
pub use project_service::ProjectService;
pub use report_service::ReportService;
