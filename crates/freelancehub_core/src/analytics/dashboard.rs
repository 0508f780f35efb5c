//! Dashboard payload composition.
//!
//! # Invariants
//! - Assembly is pure and infallible; empty inputs give a zeroed payload.
//! - `status_comparison` always lists active before completed.

use crate::analytics::earnings::MonthlyEarnings;
use crate::analytics::status::StatusSummary;
use serde::{Deserialize, Serialize};

pub const ACTIVE_PROJECTS_LABEL: &str = "Active Projects";
pub const COMPLETED_PROJECTS_LABEL: &str = "Completed Projects";

/// One bar of the active/completed comparison chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusComparison {
    pub name: String,
    pub value: usize,
}

/// Analytics payload handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPayload {
    pub active_projects: usize,
    pub completed_projects: usize,
    pub processed_payments: usize,
    pub monthly_earnings: Vec<MonthlyEarnings>,
    pub status_comparison: Vec<StatusComparison>,
}

/// Composes aggregator and summarizer output into the dashboard payload.
pub fn assemble_dashboard(
    monthly_earnings: Vec<MonthlyEarnings>,
    statuses: StatusSummary,
    processed_payments: usize,
) -> DashboardPayload {
    DashboardPayload {
        active_projects: statuses.active,
        completed_projects: statuses.completed,
        processed_payments,
        monthly_earnings,
        status_comparison: vec![
            StatusComparison {
                name: ACTIVE_PROJECTS_LABEL.to_string(),
                value: statuses.active,
            },
            StatusComparison {
                name: COMPLETED_PROJECTS_LABEL.to_string(),
                value: statuses.completed,
            },
        ],
    }
}
