//! Core domain logic for FreelanceHub.
//! Project/payment records, the record store, and dashboard analytics.

pub mod analytics;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use analytics::dashboard::{assemble_dashboard, DashboardPayload, StatusComparison};
pub use analytics::earnings::{
    aggregate_monthly_earnings, BucketingMode, EarningsSeries, MonthlyEarnings,
};
pub use analytics::status::{summarize_project_statuses, StatusSummary};
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::payment::{Payment, PaymentId, PaymentStatus};
pub use model::project::{Project, ProjectId, ProjectStatus};
pub use model::{MalformedReason, MalformedRecord, RecordKind, UNREADABLE_ID};
pub use repo::payment_repo::{PaymentRepository, SqlitePaymentRepository};
pub use repo::project_repo::{ProjectRepository, SqliteProjectRepository};
pub use repo::{RepoError, RepoResult, Snapshot};
pub use service::dashboard_service::{
    DashboardOutcome, DashboardReport, DashboardService, DataSource,
};
pub use service::project_service::{
    AddPaymentRequest, ProjectPatch, ProjectService, ProjectServiceError,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
