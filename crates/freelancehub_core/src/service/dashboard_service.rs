//! Dashboard use-case service.
//!
//! # Responsibility
//! - Fetch project and payment snapshots from the record store.
//! - Run the pure analytics over them and assemble the payload.
//!
//! # Invariants
//! - A store failure yields `DashboardOutcome::Unavailable`, never a zeroed
//!   `Ready` payload.
//! - Malformed records never abort a build; they are listed in the report.
//! - No state is kept between builds.

use crate::analytics::dashboard::{assemble_dashboard, DashboardPayload};
use crate::analytics::earnings::{aggregate_monthly_earnings, BucketingMode};
use crate::analytics::status::summarize_project_statuses;
use crate::model::payment::PaymentId;
use crate::model::MalformedRecord;
use crate::repo::payment_repo::PaymentRepository;
use crate::repo::project_repo::ProjectRepository;
use chrono::{Local, NaiveDate};
use log::{error, info, warn};
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Store read that failed while building a dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Projects,
    Payments,
}

impl Display for DataSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Projects => f.write_str("projects"),
            Self::Payments => f.write_str("payments"),
        }
    }
}

/// Successful dashboard build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardReport {
    pub payload: DashboardPayload,
    /// Records skipped by the store or the aggregator.
    pub data_issues: Vec<MalformedRecord>,
    /// Payments outside the window under strict bucketing.
    pub out_of_window: Vec<PaymentId>,
}

/// Result of a dashboard build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardOutcome {
    Ready(DashboardReport),
    /// The record store could not be read. Distinct from an empty store.
    Unavailable { source: DataSource, reason: String },
}

impl DashboardOutcome {
    pub fn payload(&self) -> Option<&DashboardPayload> {
        match self {
            Self::Ready(report) => Some(&report.payload),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Builds dashboards from repository snapshots.
pub struct DashboardService<P: ProjectRepository, Q: PaymentRepository> {
    projects: P,
    payments: Q,
    bucketing: BucketingMode,
}

impl<P: ProjectRepository, Q: PaymentRepository> DashboardService<P, Q> {
    pub fn new(projects: P, payments: Q) -> Self {
        Self {
            projects,
            payments,
            bucketing: BucketingMode::default(),
        }
    }

    pub fn with_bucketing(mut self, bucketing: BucketingMode) -> Self {
        self.bucketing = bucketing;
        self
    }

    /// Builds the dashboard for the local current date.
    pub fn build_dashboard(&self) -> DashboardOutcome {
        self.build_dashboard_at(Local::now().date_naive())
    }

    /// Builds the dashboard as of `today`.
    pub fn build_dashboard_at(&self, today: NaiveDate) -> DashboardOutcome {
        let started_at = Instant::now();

        let projects = match self.projects.list_projects() {
            Ok(snapshot) => snapshot,
            Err(err) => return unavailable(DataSource::Projects, &err, started_at),
        };
        let payments = match self.payments.list_payments() {
            Ok(snapshot) => snapshot,
            Err(err) => return unavailable(DataSource::Payments, &err, started_at),
        };

        let statuses = summarize_project_statuses(&projects.records);
        let earnings = aggregate_monthly_earnings(&payments.records, today, self.bucketing);
        let payload = assemble_dashboard(earnings.months, statuses, payments.total_rows());

        let mut data_issues = projects.malformed;
        data_issues.extend(payments.malformed);
        data_issues.extend(earnings.malformed);

        if !data_issues.is_empty() {
            warn!(
                "event=dashboard_build module=service status=degraded malformed_records={}",
                data_issues.len()
            );
        }
        info!(
            "event=dashboard_build module=service status=ok bucketing={} projects={} payments={} out_of_window={} duration_ms={}",
            self.bucketing.as_str(),
            projects.records.len(),
            payload.processed_payments,
            earnings.out_of_window.len(),
            started_at.elapsed().as_millis()
        );

        DashboardOutcome::Ready(DashboardReport {
            payload,
            data_issues,
            out_of_window: earnings.out_of_window,
        })
    }
}

fn unavailable(
    source: DataSource,
    err: &dyn std::error::Error,
    started_at: Instant,
) -> DashboardOutcome {
    error!(
        "event=dashboard_build module=service status=error error_code=upstream_unavailable source={} duration_ms={} error={}",
        source,
        started_at.elapsed().as_millis(),
        err
    );
    DashboardOutcome::Unavailable {
        source,
        reason: err.to_string(),
    }
}
