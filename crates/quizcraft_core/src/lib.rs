//! Core domain logic for quiz authoring.
//! This crate is the single source of truth for item content and position
//! invariants; HTTP, auth and storage of uploaded files live elsewhere.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validation;

pub use config::{ConfigError, CoreConfig};
pub use error::ItemError;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::content::{
    Choice, ChoiceContent, Hotspot, HotspotContent, HotspotShape, ItemContent, MediaContent,
    MediaKind, OrderingContent, OrderingEntry, TextEntryContent, TitleContent,
};
pub use model::item::{Item, ItemDraft, ItemFields, ItemId, ItemType, PositionUpdate};
pub use model::project::{Project, ProjectId};
pub use repo::item_repo::{ItemRepository, SqliteItemRepository};
pub use repo::project_repo::{ProjectLookup, ProjectRepository, SqliteProjectRepository};
pub use repo::{RepoError, RepoResult};
pub use service::item_service::ItemService;
pub use service::position_service::PositionService;
pub use service::project_service::{ProjectService, ProjectServiceError};
pub use validation::{validate, validate_content, ContentError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
