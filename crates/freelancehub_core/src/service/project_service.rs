//! Project and payment use-case service.
//!
//! # Responsibility
//! - Provide the write paths (create/update/delete project, add payment).
//! - Validate loosely typed form input at the write boundary.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - Writes return the record as read back from the store.

use crate::model::payment::{Payment, PaymentStatus};
use crate::model::project::{Project, ProjectId, ProjectStatus};
use crate::model::parse_calendar_date;
use crate::repo::payment_repo::PaymentRepository;
use crate::repo::project_repo::ProjectRepository;
use crate::repo::{RepoError, RepoResult, Snapshot};
use chrono::NaiveDate;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Service error for project and payment use-cases.
#[derive(Debug)]
pub enum ProjectServiceError {
    /// Form input could not be parsed.
    InvalidInput(String),
    /// Target project does not exist.
    ProjectNotFound(ProjectId),
    /// Payment references a project that does not exist.
    UnknownProject(ProjectId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Write succeeded but the read-back did not find the record.
    InconsistentState(&'static str),
}

impl Display for ProjectServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::ProjectNotFound(id) => write!(f, "project not found: {id}"),
            Self::UnknownProject(id) => write!(f, "payment references unknown project: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent state: {details}"),
        }
    }
}

impl Error for ProjectServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ProjectServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::ProjectNotFound(id) => Self::ProjectNotFound(id),
            RepoError::UnknownProject(id) => Self::UnknownProject(id),
            other => Self::Repo(other),
        }
    }
}

/// Partial update for a project. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectPatch {
    pub name: Option<String>,
    /// `Some(None)` clears the due date.
    pub due_date: Option<Option<NaiveDate>>,
    pub status: Option<ProjectStatus>,
}

/// Request model for recording a payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddPaymentRequest {
    pub project_id: ProjectId,
    pub amount: u64,
    pub date: NaiveDate,
    pub status: PaymentStatus,
}

impl AddPaymentRequest {
    /// Parses the text fields submitted by the payment entry form.
    ///
    /// An empty `status` falls back to `unpaid`, matching the form default.
    pub fn parse(
        project_id: &str,
        amount: &str,
        date: &str,
        status: &str,
    ) -> Result<Self, ProjectServiceError> {
        let project_id = Uuid::parse_str(project_id.trim()).map_err(|_| {
            ProjectServiceError::InvalidInput(format!("project id `{project_id}` is not a UUID"))
        })?;
        let amount = amount.trim().parse::<u64>().map_err(|_| {
            ProjectServiceError::InvalidInput(format!(
                "amount `{amount}` must be a non-negative whole number"
            ))
        })?;
        let date = parse_calendar_date(date).ok_or_else(|| {
            ProjectServiceError::InvalidInput(format!("date `{date}` is not a calendar date"))
        })?;
        let status = match status.trim() {
            "" => PaymentStatus::default(),
            text => PaymentStatus::parse(text).ok_or_else(|| {
                ProjectServiceError::InvalidInput(format!(
                    "status `{text}` must be `paid` or `unpaid`"
                ))
            })?,
        };

        Ok(Self {
            project_id,
            amount,
            date,
            status,
        })
    }
}

/// Use-case service over project and payment repositories.
pub struct ProjectService<P: ProjectRepository, Q: PaymentRepository> {
    projects: P,
    payments: Q,
}

impl<P: ProjectRepository, Q: PaymentRepository> ProjectService<P, Q> {
    pub fn new(projects: P, payments: Q) -> Self {
        Self { projects, payments }
    }

    /// Creates an `Active` project.
    pub fn create_project(
        &self,
        name: impl Into<String>,
        due_date: Option<NaiveDate>,
    ) -> Result<Project, ProjectServiceError> {
        let project = Project::new(name.into().trim(), due_date);
        let id = self.projects.create_project(&project)?;
        info!("event=project_create module=service status=ok project_id={id}");

        self.projects
            .get_project(id)?
            .ok_or(ProjectServiceError::InconsistentState(
                "created project not found in read-back",
            ))
    }

    /// Applies a partial update and returns the stored result.
    pub fn update_project(
        &self,
        id: ProjectId,
        patch: ProjectPatch,
    ) -> Result<Project, ProjectServiceError> {
        let mut project = self
            .projects
            .get_project(id)?
            .ok_or(ProjectServiceError::ProjectNotFound(id))?;

        if let Some(name) = patch.name {
            project.name = name.trim().to_string();
        }
        if let Some(due_date) = patch.due_date {
            project.due_date = due_date;
        }
        if let Some(status) = patch.status {
            project.status = status;
        }

        self.projects.update_project(&project)?;
        info!("event=project_update module=service status=ok project_id={id}");

        self.projects
            .get_project(id)?
            .ok_or(ProjectServiceError::InconsistentState(
                "updated project not found in read-back",
            ))
    }

    pub fn set_project_status(
        &self,
        id: ProjectId,
        status: ProjectStatus,
    ) -> Result<Project, ProjectServiceError> {
        self.update_project(
            id,
            ProjectPatch {
                status: Some(status),
                ..ProjectPatch::default()
            },
        )
    }

    /// Deletes a project. Its payments stay in the store as orphans.
    pub fn delete_project(&self, id: ProjectId) -> Result<(), ProjectServiceError> {
        self.projects.delete_project(id)?;
        info!("event=project_delete module=service status=ok project_id={id}");
        Ok(())
    }

    pub fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        self.projects.get_project(id)
    }

    pub fn list_projects(&self) -> RepoResult<Snapshot<Project>> {
        self.projects.list_projects()
    }

    /// Records a payment against an existing project.
    pub fn add_payment(&self, request: &AddPaymentRequest) -> Result<Payment, ProjectServiceError> {
        let payment = Payment::new(request.project_id, request.amount, request.date)
            .with_status(request.status);
        let id = self.payments.add_payment(&payment)?;
        info!(
            "event=payment_add module=service status=ok payment_id={} project_id={}",
            id, request.project_id
        );

        self.payments
            .get_payment(id)?
            .ok_or(ProjectServiceError::InconsistentState(
                "added payment not found in read-back",
            ))
    }

    pub fn list_payments_for_project(
        &self,
        project_id: ProjectId,
    ) -> RepoResult<Snapshot<Payment>> {
        self.payments.list_payments_for_project(project_id)
    }
}
