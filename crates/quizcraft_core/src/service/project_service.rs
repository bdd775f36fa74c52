//! Project use-case service.
//!
//! # Responsibility
//! - Validate project metadata before persistence.
//! - Provide create/get/list/delete entry points.
//!
//! # Invariants
//! - Titles are trimmed and 1-200 characters.
//! - Tags are trimmed, lowercased and deduplicated; blank tags are rejected.
//! - Deleting a project deletes all of its items.

use crate::model::project::{
    Project, ProjectId, PROJECT_DESCRIPTION_MAX_CHARS, PROJECT_TITLE_MAX_CHARS,
};
use crate::repo::project_repo::ProjectRepository;
use crate::repo::RepoError;
use log::info;
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors from project service operations.
#[derive(Debug, Error)]
pub enum ProjectServiceError {
    #[error("project title must not be blank")]
    TitleTooShort,
    #[error("project title must be at most {max} characters, got {actual}")]
    TitleTooLong { max: usize, actual: usize },
    #[error("project description must be at most {max} characters, got {actual}")]
    DescriptionTooLong { max: usize, actual: usize },
    #[error("invalid tag: `{0}`")]
    InvalidTag(String),
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for ProjectServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::ProjectNotFound(project_uuid) => Self::ProjectNotFound(project_uuid),
            other => Self::Repo(other),
        }
    }
}

/// Project service facade over repository implementations.
pub struct ProjectService<R: ProjectRepository> {
    repo: R,
}

impl<R: ProjectRepository> ProjectService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one project.
    pub fn create_project(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
        tags: Vec<String>,
    ) -> Result<Project, ProjectServiceError> {
        let title = normalize_title(title.into())?;
        let description = description.into();
        let description_length = description.chars().count();
        if description_length > PROJECT_DESCRIPTION_MAX_CHARS {
            return Err(ProjectServiceError::DescriptionTooLong {
                max: PROJECT_DESCRIPTION_MAX_CHARS,
                actual: description_length,
            });
        }
        let tags = normalize_tags(&tags)?;

        let project = self
            .repo
            .create_project(title.as_str(), description.as_str(), &tags)?;
        info!(
            "event=project_create module=project status=ok project_id={} tag_count={}",
            project.uuid,
            project.tags.len()
        );
        Ok(project)
    }

    pub fn get_project(&self, project_uuid: ProjectId) -> Result<Project, ProjectServiceError> {
        self.repo
            .get_project(project_uuid)?
            .ok_or(ProjectServiceError::ProjectNotFound(project_uuid))
    }

    pub fn list_projects(&self) -> Result<Vec<Project>, ProjectServiceError> {
        Ok(self.repo.list_projects()?)
    }

    /// Deletes one project together with its items.
    pub fn delete_project(&self, project_uuid: ProjectId) -> Result<(), ProjectServiceError> {
        self.repo.delete_project(project_uuid)?;
        info!("event=project_delete module=project status=ok project_id={project_uuid}");
        Ok(())
    }
}

fn normalize_title(value: String) -> Result<String, ProjectServiceError> {
    let trimmed = value.trim();
    let length = trimmed.chars().count();
    if length == 0 {
        return Err(ProjectServiceError::TitleTooShort);
    }
    if length > PROJECT_TITLE_MAX_CHARS {
        return Err(ProjectServiceError::TitleTooLong {
            max: PROJECT_TITLE_MAX_CHARS,
            actual: length,
        });
    }
    Ok(trimmed.to_string())
}

fn normalize_tags(tags: &[String]) -> Result<Vec<String>, ProjectServiceError> {
    let mut normalized = BTreeSet::new();
    for tag in tags {
        let value = tag.trim().to_lowercase();
        if value.is_empty() {
            return Err(ProjectServiceError::InvalidTag(tag.clone()));
        }
        normalized.insert(value);
    }
    Ok(normalized.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::{normalize_tags, normalize_title, ProjectServiceError};

    #[test]
    fn tags_are_normalized_sorted_and_deduplicated() {
        let tags = vec![" Math ".to_string(), "math".to_string(), "Algebra".to_string()];
        assert_eq!(
            normalize_tags(&tags).unwrap(),
            vec!["algebra".to_string(), "math".to_string()]
        );
    }

    #[test]
    fn blank_tag_is_rejected() {
        let err = normalize_tags(&["ok".to_string(), "  ".to_string()]).unwrap_err();
        assert!(matches!(err, ProjectServiceError::InvalidTag(_)));
    }

    #[test]
    fn title_bounds_are_enforced() {
        assert!(matches!(
            normalize_title("   ".to_string()),
            Err(ProjectServiceError::TitleTooShort)
        ));
        assert!(matches!(
            normalize_title("t".repeat(201)),
            Err(ProjectServiceError::TitleTooLong { actual: 201, .. })
        ));
        assert_eq!(normalize_title("  Quiz ".to_string()).unwrap(), "Quiz");
    }
}
