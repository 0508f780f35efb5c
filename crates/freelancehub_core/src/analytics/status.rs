//! Project status summary.

use crate::model::project::{Project, ProjectStatus};
use serde::Serialize;

/// Project counts partitioned by status.
///
/// `active + completed + unclassified` always equals the number of projects
/// summarized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatusSummary {
    pub active: usize,
    pub completed: usize,
    /// Projects whose status is neither `Active` nor `Completed`.
    pub unclassified: usize,
}

pub fn summarize_project_statuses(projects: &[Project]) -> StatusSummary {
    projects
        .iter()
        .fold(StatusSummary::default(), |mut summary, project| {
            match project.status {
                ProjectStatus::Active => summary.active += 1,
                ProjectStatus::Completed => summary.completed += 1,
                ProjectStatus::Unclassified(_) => summary.unclassified += 1,
            }
            summary
        })
}
