//! Project domain model.
//!
//! # Responsibility
//! - Define the project record and its lifecycle status.
//! - Validate write-side invariants before persistence.
//!
//! # Invariants
//! - `id` is stable and never reused for another project.
//! - `name` is never empty or whitespace-only.
//! - Unknown status text is preserved verbatim as `Unclassified`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a project.
pub type ProjectId = Uuid;

/// Lifecycle status of a project.
///
/// Storage keeps status as free text, so values other than `Active` and
/// `Completed` round-trip unchanged instead of being rejected.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProjectStatus {
    #[default]
    Active,
    Completed,
    Unclassified(String),
}

impl ProjectStatus {
    /// Maps stored text to a status. Matching is exact, `"active"` is unclassified.
    pub fn parse(value: &str) -> Self {
        match value {
            "Active" => Self::Active,
            "Completed" => Self::Completed,
            other => Self::Unclassified(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "Active",
            Self::Completed => "Completed",
            Self::Unclassified(value) => value.as_str(),
        }
    }
}

impl From<String> for ProjectStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<ProjectStatus> for String {
    fn from(value: ProjectStatus) -> Self {
        match value {
            ProjectStatus::Unclassified(text) => text,
            other => other.as_str().to_string(),
        }
    }
}

impl Display for ProjectStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of freelance work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub due_date: Option<NaiveDate>,
    pub status: ProjectStatus,
}

/// Validation failures for project writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectValidationError {
    EmptyName,
}

impl Display for ProjectValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "project name cannot be empty"),
        }
    }
}

impl Error for ProjectValidationError {}

impl Project {
    /// Creates an `Active` project with a generated id.
    pub fn new(name: impl Into<String>, due_date: Option<NaiveDate>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            due_date,
            status: ProjectStatus::Active,
        }
    }

    /// Checks write-side invariants.
    pub fn validate(&self) -> Result<(), ProjectValidationError> {
        if self.name.trim().is_empty() {
            return Err(ProjectValidationError::EmptyName);
        }
        Ok(())
    }

    pub fn is_completed(&self) -> bool {
        self.status == ProjectStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::{Project, ProjectStatus, ProjectValidationError};

    #[test]
    fn new_project_defaults_to_active() {
        let project = Project::new("Logo redesign", None);
        assert_eq!(project.status, ProjectStatus::Active);
        assert!(!project.is_completed());
        assert!(project.validate().is_ok());
    }

    #[test]
    fn whitespace_name_is_rejected() {
        let project = Project::new("   ", None);
        assert_eq!(project.validate(), Err(ProjectValidationError::EmptyName));
    }

    #[test]
    fn status_matching_is_exact_and_keeps_unknown_text() {
        assert_eq!(ProjectStatus::parse("Active"), ProjectStatus::Active);
        assert_eq!(ProjectStatus::parse("Completed"), ProjectStatus::Completed);
        assert_eq!(
            ProjectStatus::parse("active"),
            ProjectStatus::Unclassified("active".to_string())
        );
        assert_eq!(ProjectStatus::parse("On hold").as_str(), "On hold");
    }

    #[test]
    fn project_serializes_with_camel_case_and_status_text() {
        let mut project = Project::new("Site audit", chrono::NaiveDate::from_ymd_opt(2024, 7, 1));
        project.status = ProjectStatus::Unclassified("Paused".to_string());

        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["dueDate"], "2024-07-01");
        assert_eq!(json["status"], "Paused");

        let decoded: Project = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, project);
    }
}
