//! Record store contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define the data access contracts analytics and services consume.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Write paths validate records before SQL mutations.
//! - List paths skip undecodable rows and report them in `Snapshot::malformed`
//!   instead of failing the whole read.
//! - Single-record reads reject undecodable rows with `InvalidData`.

pub mod payment_repo;
pub mod project_repo;

use crate::db::DbError;
use crate::model::payment::PaymentValidationError;
use crate::model::project::{ProjectId, ProjectValidationError};
use crate::model::{MalformedReason, MalformedRecord};
use rusqlite::types::ValueRef;
use rusqlite::Row;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for project and payment persistence.
#[derive(Debug)]
pub enum RepoError {
    ProjectValidation(ProjectValidationError),
    PaymentValidation(PaymentValidationError),
    Db(DbError),
    ProjectNotFound(ProjectId),
    /// A payment write referenced a project that does not exist.
    UnknownProject(ProjectId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProjectValidation(err) => write!(f, "{err}"),
            Self::PaymentValidation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::ProjectNotFound(id) => write!(f, "project not found: {id}"),
            Self::UnknownProject(id) => write!(f, "payment references unknown project: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted record: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ProjectValidation(err) => Some(err),
            Self::PaymentValidation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::ProjectNotFound(_) | Self::UnknownProject(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ProjectValidationError> for RepoError {
    fn from(value: ProjectValidationError) -> Self {
        Self::ProjectValidation(value)
    }
}

impl From<PaymentValidationError> for RepoError {
    fn from(value: PaymentValidationError) -> Self {
        Self::PaymentValidation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Result of a bulk read: decodable records plus the rows that were skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<T> {
    pub records: Vec<T>,
    pub malformed: Vec<MalformedRecord>,
}

impl<T> Snapshot<T> {
    pub fn new(records: Vec<T>, malformed: Vec<MalformedRecord>) -> Self {
        Self { records, malformed }
    }

    /// Number of rows the store returned, decodable or not.
    pub fn total_rows(&self) -> usize {
        self.records.len() + self.malformed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_rows() == 0
    }
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

/// Reads a nullable text column without letting its storage class fail the row.
///
/// Numbers are rendered as text so the caller's parser reports them. Blobs and
/// non-UTF-8 text come back as `MalformedReason::InvalidText`.
pub(crate) fn read_text_column(
    row: &Row<'_>,
    column: &'static str,
) -> RepoResult<Result<Option<String>, MalformedReason>> {
    let invalid = |value| Err(MalformedReason::InvalidText { column, value });

    Ok(match row.get_ref(column)? {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(value) => Ok(Some(value.to_string())),
        ValueRef::Real(value) => Ok(Some(value.to_string())),
        ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => Ok(Some(text.to_string())),
            Err(_) => invalid(String::from_utf8_lossy(bytes).into_owned()),
        },
        ValueRef::Blob(bytes) => invalid(format!("<blob {} bytes>", bytes.len())),
    })
}
