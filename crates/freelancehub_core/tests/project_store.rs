use chrono::NaiveDate;
use freelancehub_core::db::open_db_in_memory;
use freelancehub_core::{
    MalformedReason, Project, ProjectPatch, ProjectRepository, ProjectService,
    ProjectServiceError, ProjectStatus, RepoError, SqlitePaymentRepository,
    SqliteProjectRepository,
};
use uuid::Uuid;

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::new(&conn);

    let project = Project::new("Brand refresh", Some(day(2024, 9, 30)));
    let id = repo.create_project(&project).unwrap();

    let loaded = repo.get_project(id).unwrap().unwrap();
    assert_eq!(loaded, project);
    assert_eq!(loaded.status, ProjectStatus::Active);
}

#[test]
fn get_missing_project_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::new(&conn);

    assert!(repo.get_project(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn create_rejects_empty_name() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::new(&conn);

    let err = repo.create_project(&Project::new("  ", None)).unwrap_err();
    assert!(matches!(err, RepoError::ProjectValidation(_)));
    assert!(repo.list_projects().unwrap().is_empty());
}

#[test]
fn update_keeps_free_form_status_text() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::new(&conn);

    let mut project = Project::new("Landing page", None);
    repo.create_project(&project).unwrap();

    project.status = ProjectStatus::parse("On hold");
    project.due_date = Some(day(2024, 12, 1));
    repo.update_project(&project).unwrap();

    let loaded = repo.get_project(project.id).unwrap().unwrap();
    assert_eq!(loaded.status.as_str(), "On hold");
    assert_eq!(loaded.due_date, Some(day(2024, 12, 1)));
}

#[test]
fn update_and_delete_missing_project_return_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::new(&conn);

    let project = Project::new("ghost", None);
    assert!(matches!(
        repo.update_project(&project).unwrap_err(),
        RepoError::ProjectNotFound(id) if id == project.id
    ));
    assert!(matches!(
        repo.delete_project(project.id).unwrap_err(),
        RepoError::ProjectNotFound(id) if id == project.id
    ));
}

#[test]
fn list_returns_creation_order_and_skips_malformed_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::new(&conn);

    let first = Project::new("first", None);
    let second = Project::new("second", None);
    repo.create_project(&first).unwrap();
    repo.create_project(&second).unwrap();
    conn.execute(
        "INSERT INTO projects (id, name, due_date, status) VALUES (?1, 'legacy', 'next friday', 'Active');",
        [Uuid::new_v4().to_string()],
    )
    .unwrap();

    let snapshot = repo.list_projects().unwrap();
    let names: Vec<&str> = snapshot.records.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["first", "second"]);
    assert_eq!(snapshot.malformed.len(), 1);
    assert_eq!(
        snapshot.malformed[0].reason,
        MalformedReason::UnparseableDate("next friday".to_string())
    );
    assert_eq!(snapshot.total_rows(), 3);
}

#[test]
fn list_skips_rows_with_non_text_name_or_due_date() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::new(&conn);
    let kept = Project::new("kept", None);
    repo.create_project(&kept).unwrap();
    let blob_name = Uuid::new_v4();
    let blob_due = Uuid::new_v4();
    conn.execute_batch(&format!(
        "INSERT INTO projects (id, name, status) VALUES ('{blob_name}', X'00', 'Active');
         INSERT INTO projects (id, name, due_date, status)
         VALUES ('{blob_due}', 'legacy', X'FFFE', 'Completed');"
    ))
    .unwrap();

    let snapshot = repo.list_projects().unwrap();

    assert_eq!(snapshot.records, vec![kept]);
    let skipped: Vec<(String, &MalformedReason)> = snapshot
        .malformed
        .iter()
        .map(|m| (m.record_id.clone(), &m.reason))
        .collect();
    assert_eq!(skipped.len(), 2);
    assert!(skipped.iter().any(|(id, reason)| *id == blob_name.to_string()
        && matches!(reason, MalformedReason::InvalidText { column: "name", .. })));
    assert!(skipped.iter().any(|(id, reason)| *id == blob_due.to_string()
        && matches!(reason, MalformedReason::InvalidText { column: "due_date", .. })));
    assert!(matches!(
        repo.get_project(blob_due),
        Err(RepoError::InvalidData(_))
    ));
}

#[test]
fn service_create_trims_name_and_defaults_to_active() {
    let conn = open_db_in_memory().unwrap();
    let service = ProjectService::new(
        SqliteProjectRepository::new(&conn),
        SqlitePaymentRepository::new(&conn),
    );

    let project = service.create_project("  Mobile app  ", None).unwrap();
    assert_eq!(project.name, "Mobile app");
    assert_eq!(project.status, ProjectStatus::Active);
}

#[test]
fn service_patch_updates_only_given_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = ProjectService::new(
        SqliteProjectRepository::new(&conn),
        SqlitePaymentRepository::new(&conn),
    );
    let project = service
        .create_project("Copywriting", Some(day(2024, 8, 1)))
        .unwrap();

    let renamed = service
        .update_project(
            project.id,
            ProjectPatch {
                name: Some("Copywriting, phase 2".to_string()),
                ..ProjectPatch::default()
            },
        )
        .unwrap();
    assert_eq!(renamed.name, "Copywriting, phase 2");
    assert_eq!(renamed.due_date, Some(day(2024, 8, 1)));

    let cleared = service
        .update_project(
            project.id,
            ProjectPatch {
                due_date: Some(None),
                ..ProjectPatch::default()
            },
        )
        .unwrap();
    assert_eq!(cleared.due_date, None);

    let completed = service
        .set_project_status(project.id, ProjectStatus::Completed)
        .unwrap();
    assert!(completed.is_completed());
    assert_eq!(completed.name, "Copywriting, phase 2");
}

#[test]
fn service_maps_missing_project_to_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = ProjectService::new(
        SqliteProjectRepository::new(&conn),
        SqlitePaymentRepository::new(&conn),
    );

    let missing = Uuid::new_v4();
    assert!(matches!(
        service.set_project_status(missing, ProjectStatus::Completed),
        Err(ProjectServiceError::ProjectNotFound(id)) if id == missing
    ));
    assert!(matches!(
        service.delete_project(missing),
        Err(ProjectServiceError::ProjectNotFound(id)) if id == missing
    ));
}
