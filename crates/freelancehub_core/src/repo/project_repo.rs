//! Project repository contract and SQLite implementation.
//!
//! # Invariants
//! - Write paths call `Project::validate()` before SQL mutations.
//! - Deleting a project does not touch its payments.
//! - `list_projects` returns rows in creation order.
//! - A row whose text columns hold blobs or invalid UTF-8 is malformed, not a
//!   read failure.

use crate::model::project::{Project, ProjectId, ProjectStatus};
use crate::model::{
    format_calendar_date, parse_calendar_date, MalformedReason, MalformedRecord, RecordKind,
    UNREADABLE_ID,
};
use crate::repo::{read_text_column, RepoError, RepoResult, Snapshot};
use log::warn;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const PROJECT_SELECT_SQL: &str = "SELECT
    id,
    name,
    due_date,
    status
FROM projects";

/// Repository interface for project CRUD operations.
pub trait ProjectRepository {
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId>;
    fn update_project(&self, project: &Project) -> RepoResult<()>;
    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>>;
    fn list_projects(&self) -> RepoResult<Snapshot<Project>>;
    fn delete_project(&self, id: ProjectId) -> RepoResult<()>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId> {
        project.validate()?;

        self.conn.execute(
            "INSERT INTO projects (id, name, due_date, status) VALUES (?1, ?2, ?3, ?4);",
            params![
                project.id.to_string(),
                project.name.as_str(),
                project.due_date.map(format_calendar_date),
                project.status.as_str(),
            ],
        )?;

        Ok(project.id)
    }

    fn update_project(&self, project: &Project) -> RepoResult<()> {
        project.validate()?;

        let changed = self.conn.execute(
            "UPDATE projects
             SET
                name = ?1,
                due_date = ?2,
                status = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?4;",
            params![
                project.name.as_str(),
                project.due_date.map(format_calendar_date),
                project.status.as_str(),
                project.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::ProjectNotFound(project.id));
        }

        Ok(())
    }

    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => decode_project_row(row)?
                .map(Some)
                .map_err(|malformed| RepoError::InvalidData(malformed.to_string())),
            None => Ok(None),
        }
    }

    fn list_projects(&self) -> RepoResult<Snapshot<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} ORDER BY created_at ASC, rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut snapshot = Snapshot::default();

        while let Some(row) = rows.next()? {
            match decode_project_row(row)? {
                Ok(project) => snapshot.records.push(project),
                Err(malformed) => {
                    warn!(
                        "event=record_skipped module=repo kind=project status=skipped reason={}",
                        malformed.reason
                    );
                    snapshot.malformed.push(malformed);
                }
            }
        }

        Ok(snapshot)
    }

    fn delete_project(&self, id: ProjectId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM projects WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::ProjectNotFound(id));
        }

        Ok(())
    }
}

/// Decodes one row. The outer error is a transport failure, the inner one a
/// row that exists but cannot become a `Project`.
fn decode_project_row(row: &Row<'_>) -> RepoResult<Result<Project, MalformedRecord>> {
    let id_text = match read_text_column(row, "id")? {
        Ok(text) => text.unwrap_or_default(),
        Err(reason) => {
            return Ok(Err(MalformedRecord::new(
                RecordKind::Project,
                UNREADABLE_ID,
                reason,
            )));
        }
    };
    let malformed = |reason| MalformedRecord::new(RecordKind::Project, id_text.clone(), reason);

    let Ok(id) = Uuid::parse_str(&id_text) else {
        return Ok(Err(malformed(MalformedReason::InvalidId(id_text.clone()))));
    };

    let name = match read_text_column(row, "name")? {
        Ok(text) => text.unwrap_or_default(),
        Err(reason) => return Ok(Err(malformed(reason))),
    };

    let due_date = match read_text_column(row, "due_date")? {
        Ok(Some(text)) => match parse_calendar_date(&text) {
            Some(date) => Some(date),
            None => return Ok(Err(malformed(MalformedReason::UnparseableDate(text)))),
        },
        Ok(None) => None,
        Err(reason) => return Ok(Err(malformed(reason))),
    };

    let status_text = match read_text_column(row, "status")? {
        Ok(text) => text.unwrap_or_default(),
        Err(reason) => return Ok(Err(malformed(reason))),
    };

    Ok(Ok(Project {
        id,
        name,
        due_date,
        status: ProjectStatus::parse(&status_text),
    }))
}
