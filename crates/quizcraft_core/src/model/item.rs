//! Item domain model.
//!
//! # Responsibility
//! - Define the closed set of item type tags.
//! - Define the persisted item record and its writable attribute set.
//!
//! # Invariants
//! - `ItemType` is a closed enumeration; unknown tags never parse.
//! - `position` is non-negative and unique within the owning project.
//! - `title` is 1-500 characters, `points` 0-1000, `explanation` <= 1000.

use crate::model::content::ItemContent;
use crate::model::project::ProjectId;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of an item, generated at creation.
pub type ItemId = Uuid;

pub const ITEM_TITLE_MAX_CHARS: usize = 500;
pub const ITEM_POINTS_MAX: i64 = 1000;
pub const ITEM_EXPLANATION_MAX_CHARS: usize = 1000;

/// Closed enumeration of item type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// Section heading without content.
    Title,
    /// Image, video or audio block.
    Media,
    /// Single-answer question.
    Choice,
    /// Multiple-answer question.
    MultiChoice,
    /// Free-text answer.
    TextEntry,
    /// Put records into the correct order.
    Ordering,
    /// Click the correct regions of an image.
    Hotspot,
}

impl ItemType {
    pub const ALL: [ItemType; 7] = [
        ItemType::Title,
        ItemType::Media,
        ItemType::Choice,
        ItemType::MultiChoice,
        ItemType::TextEntry,
        ItemType::Ordering,
        ItemType::Hotspot,
    ];

    /// Returns the wire/storage tag for this type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Media => "media",
            Self::Choice => "choice",
            Self::MultiChoice => "multi_choice",
            Self::TextEntry => "text_entry",
            Self::Ordering => "ordering",
            Self::Hotspot => "hotspot",
        }
    }

    /// Parses an exact type tag. Matching is case-sensitive.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }
}

impl Display for ItemType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted quiz item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub uuid: ItemId,
    pub project_uuid: ProjectId,
    pub title: String,
    /// Serialized as sibling `type` and `content` keys.
    #[serde(flatten)]
    pub content: ItemContent,
    pub position: i64,
    pub required: bool,
    pub points: Option<u32>,
    pub explanation: Option<String>,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Epoch ms update timestamp.
    pub updated_at: i64,
}

impl Item {
    pub fn kind(&self) -> ItemType {
        self.content.kind()
    }
}

/// Validated writable attributes of an item.
///
/// Produced by the item service after every field check has passed and
/// handed to the repository for full-replace writes.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFields {
    pub title: String,
    pub content: ItemContent,
    pub position: i64,
    pub required: bool,
    pub points: Option<u32>,
    pub explanation: Option<String>,
}

/// Unvalidated caller input for create/update.
///
/// Every field is sent on every write; update is a full replace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDraft {
    /// Raw type tag, checked against `ItemType`.
    #[serde(rename = "type")]
    pub type_tag: String,
    pub title: String,
    /// Raw content payload whose shape depends on `type_tag`.
    #[serde(default)]
    pub content: serde_json::Value,
    pub position: i64,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub points: Option<i64>,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl ItemDraft {
    pub fn new(
        type_tag: impl Into<String>,
        title: impl Into<String>,
        content: serde_json::Value,
        position: i64,
    ) -> Self {
        Self {
            type_tag: type_tag.into(),
            title: title.into(),
            content,
            position,
            required: false,
            points: None,
            explanation: None,
        }
    }
}

/// One `(item, new position)` pair of a batch reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionUpdate {
    pub item_uuid: ItemId,
    pub position: i64,
}

impl PositionUpdate {
    pub fn new(item_uuid: ItemId, position: i64) -> Self {
        Self {
            item_uuid,
            position,
        }
    }
}
