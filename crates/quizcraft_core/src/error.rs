//! Item-level error taxonomy shared by the item and position services.
//!
//! # Invariants
//! - Every variant except `TransientStoreFailure` and `Store` requires the
//!   caller to change its input before retrying.
//! - Field-level variants expose the offending field through
//!   `ItemError::field()`.

use crate::model::item::ItemId;
use crate::model::project::ProjectId;
use crate::repo::RepoError;
use crate::validation::ContentError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ItemError {
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),
    #[error("title must not be blank")]
    TitleTooShort,
    #[error("title must be at most {max} characters, got {actual}")]
    TitleTooLong { max: usize, actual: usize },
    #[error("invalid item type `{0}`")]
    TypeInvalid(String),
    #[error("position must be non-negative, got {0}")]
    PositionInvalid(i64),
    #[error("points must be between 0 and {max}, got {actual}")]
    PointsOutOfRange { max: i64, actual: i64 },
    #[error("explanation must be at most {max} characters, got {actual}")]
    ExplanationTooLong { max: usize, actual: usize },
    #[error("invalid content: {0}")]
    ContentInvalid(#[source] ContentError),
    /// Detected by the store at commit time; nothing was written.
    #[error("position {position} is already taken (item {item_uuid})")]
    PositionConflict { item_uuid: ItemId, position: i64 },
    /// Busy/locked store; safe to retry unchanged.
    #[error("transient store failure: {0}")]
    TransientStoreFailure(#[source] RepoError),
    /// Any other persistence failure.
    #[error("store failure: {0}")]
    Store(#[source] RepoError),
}

impl ItemError {
    /// Whether the caller may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientStoreFailure(_))
    }

    /// Name of the offending input field, if the error is field-level.
    ///
    /// Content errors are reported as `content.<path>`.
    pub fn field(&self) -> Option<String> {
        match self {
            Self::TitleTooShort | Self::TitleTooLong { .. } => Some("title".to_string()),
            Self::TypeInvalid(_) => Some("type".to_string()),
            Self::PositionInvalid(_) | Self::PositionConflict { .. } => {
                Some("position".to_string())
            }
            Self::PointsOutOfRange { .. } => Some("points".to_string()),
            Self::ExplanationTooLong { .. } => Some("explanation".to_string()),
            Self::ContentInvalid(err) => Some(match err.field() {
                Some("content") | None => "content".to_string(),
                Some(path) => format!("content.{path}"),
            }),
            Self::ProjectNotFound(_)
            | Self::ItemNotFound(_)
            | Self::TransientStoreFailure(_)
            | Self::Store(_) => None,
        }
    }
}

impl From<ContentError> for ItemError {
    fn from(value: ContentError) -> Self {
        match value {
            ContentError::TypeInvalid(tag) => Self::TypeInvalid(tag),
            other => Self::ContentInvalid(other),
        }
    }
}

impl From<RepoError> for ItemError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::ProjectNotFound(project_uuid) => Self::ProjectNotFound(project_uuid),
            RepoError::ItemNotFound(item_uuid) => Self::ItemNotFound(item_uuid),
            RepoError::PositionConflict {
                item_uuid,
                position,
            } => Self::PositionConflict {
                item_uuid,
                position,
            },
            other if other.is_transient() => Self::TransientStoreFailure(other),
            other => Self::Store(other),
        }
    }
}
