//! Project domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a project.
pub type ProjectId = Uuid;

/// Maximum project title length in characters.
pub const PROJECT_TITLE_MAX_CHARS: usize = 200;
/// Maximum project description length in characters.
pub const PROJECT_DESCRIPTION_MAX_CHARS: usize = 2000;

/// A quiz project owning an ordered sequence of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub uuid: ProjectId,
    pub title: String,
    pub description: String,
    /// Normalized (trimmed, lowercase, deduplicated) tag names.
    pub tags: Vec<String>,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Epoch ms update timestamp.
    pub updated_at: i64,
    /// Epoch ms publish timestamp. Publishing itself is handled outside core.
    pub published_at: Option<i64>,
}

impl Project {
    pub fn is_published(&self) -> bool {
        self.published_at.is_some()
    }
}
