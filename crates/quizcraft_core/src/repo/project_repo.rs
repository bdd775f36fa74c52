//! Project repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist projects and answer the existence check item writes depend on.
//! - Delete projects together with all their items.
//!
//! # Invariants
//! - Project delete cascades to `items` through the foreign key.
//! - `tags` are stored as a JSON array of normalized names.

use super::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use crate::model::project::{Project, ProjectId};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

const PROJECT_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    description,
    tags,
    created_at,
    updated_at,
    published_at
FROM projects";

/// Existence check consumed by item mutations.
pub trait ProjectLookup {
    fn project_exists(&self, project_uuid: ProjectId) -> RepoResult<bool>;
}

/// Repository interface for project operations.
pub trait ProjectRepository: ProjectLookup {
    /// Inserts one project and returns the persisted row.
    fn create_project(&self, title: &str, description: &str, tags: &[String])
        -> RepoResult<Project>;
    fn get_project(&self, project_uuid: ProjectId) -> RepoResult<Option<Project>>;
    /// Lists projects, most recently updated first.
    fn list_projects(&self) -> RepoResult<Vec<Project>>;
    /// Deletes one project and, by cascade, all of its items.
    fn delete_project(&self, project_uuid: ProjectId) -> RepoResult<()>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            "projects",
            &[
                "uuid",
                "title",
                "description",
                "tags",
                "created_at",
                "updated_at",
                "published_at",
            ],
        )?;
        Ok(Self { conn })
    }
}

impl ProjectLookup for SqliteProjectRepository<'_> {
    fn project_exists(&self, project_uuid: ProjectId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM projects WHERE uuid = ?1);",
            [project_uuid.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create_project(
        &self,
        title: &str,
        description: &str,
        tags: &[String],
    ) -> RepoResult<Project> {
        let project_uuid = Uuid::new_v4();
        let tags_json = serde_json::to_string(tags)
            .map_err(|err| RepoError::InvalidData(format!("cannot encode project tags: {err}")))?;

        self.conn.execute(
            "INSERT INTO projects (uuid, title, description, tags)
             VALUES (?1, ?2, ?3, ?4);",
            params![project_uuid.to_string(), title, description, tags_json],
        )?;

        self.get_project(project_uuid)?
            .ok_or(RepoError::ProjectNotFound(project_uuid))
    }

    fn get_project(&self, project_uuid: ProjectId) -> RepoResult<Option<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} WHERE uuid = ?1;"))?;
        let project = stmt
            .query_row([project_uuid.to_string()], |row| Ok(parse_project_row(row)))
            .optional()?;
        project.transpose()
    }

    fn list_projects(&self) -> RepoResult<Vec<Project>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROJECT_SELECT_SQL} ORDER BY updated_at DESC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }
        Ok(projects)
    }

    fn delete_project(&self, project_uuid: ProjectId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM projects WHERE uuid = ?1;",
            [project_uuid.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::ProjectNotFound(project_uuid));
        }
        Ok(())
    }
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    let uuid_text: String = row.get("uuid")?;
    let tags_text: String = row.get("tags")?;
    let tags: Vec<String> = serde_json::from_str(&tags_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid tag list `{tags_text}` in projects.tags"))
    })?;

    Ok(Project {
        uuid: parse_uuid(&uuid_text, "projects.uuid")?,
        title: row.get("title")?,
        description: row.get("description")?,
        tags,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        published_at: row.get("published_at")?,
    })
}
