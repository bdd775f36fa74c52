use quizcraft_core::db::open_db_in_memory;
use quizcraft_core::{ProjectService, ProjectServiceError, SqliteProjectRepository};
use rusqlite::Connection;
use uuid::Uuid;

fn service(conn: &Connection) -> ProjectService<SqliteProjectRepository<'_>> {
    ProjectService::new(SqliteProjectRepository::try_new(conn).unwrap())
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let created = service
        .create_project(
            "  Capitals of Europe ",
            "Geography warm-up",
            vec!["Geo".to_string(), " europe".to_string(), "geo".to_string()],
        )
        .unwrap();

    assert_eq!(created.title, "Capitals of Europe");
    assert_eq!(created.tags, vec!["europe".to_string(), "geo".to_string()]);
    assert!(!created.is_published());
    assert!(created.created_at > 0);
    assert_eq!(created.created_at, created.updated_at);

    let loaded = service.get_project(created.uuid).unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn invalid_metadata_is_rejected_without_write() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    assert!(matches!(
        service.create_project(" ", "", Vec::new()),
        Err(ProjectServiceError::TitleTooShort)
    ));
    assert!(matches!(
        service.create_project("Quiz", "d".repeat(2001), Vec::new()),
        Err(ProjectServiceError::DescriptionTooLong { max: 2000, actual: 2001 })
    ));
    assert!(matches!(
        service.create_project("Quiz", "", vec!["".to_string()]),
        Err(ProjectServiceError::InvalidTag(_))
    ));
    assert!(service.list_projects().unwrap().is_empty());
}

#[test]
fn list_returns_every_project() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let first = service.create_project("First", "", Vec::new()).unwrap();
    let second = service.create_project("Second", "", Vec::new()).unwrap();

    let listed: Vec<Uuid> = service
        .list_projects()
        .unwrap()
        .into_iter()
        .map(|project| project.uuid)
        .collect();

    assert_eq!(listed.len(), 2);
    assert!(listed.contains(&first.uuid));
    assert!(listed.contains(&second.uuid));
}

#[test]
fn missing_project_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let missing = Uuid::new_v4();

    assert!(matches!(
        service.get_project(missing),
        Err(ProjectServiceError::ProjectNotFound(id)) if id == missing
    ));
    assert!(matches!(
        service.delete_project(missing),
        Err(ProjectServiceError::ProjectNotFound(id)) if id == missing
    ));
}

#[test]
fn delete_removes_project() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let project = service.create_project("Gone soon", "", Vec::new()).unwrap();

    service.delete_project(project.uuid).unwrap();

    assert!(matches!(
        service.get_project(project.uuid),
        Err(ProjectServiceError::ProjectNotFound(_))
    ));
}
