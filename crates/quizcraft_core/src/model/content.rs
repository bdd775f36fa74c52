//! Strongly typed item content, one payload per item type.
//!
//! # Responsibility
//! - Model each type's content shape as a concrete struct.
//! - Bind payloads to their type tag through the `ItemContent` sum type.
//!
//! # Invariants
//! - Payload structs are decoded only after structural validation passed,
//!   see `crate::validation`.
//! - JSON keys are camelCase; enum values are lowercase.

use crate::model::item::ItemType;
use serde::{Deserialize, Serialize};

/// Content of an item, tagged by its type.
///
/// Serializes as `{"type": "<tag>", "content": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum ItemContent {
    Title(TitleContent),
    Media(MediaContent),
    Choice(ChoiceContent),
    MultiChoice(ChoiceContent),
    TextEntry(TextEntryContent),
    Ordering(OrderingContent),
    Hotspot(HotspotContent),
}

impl ItemContent {
    pub fn kind(&self) -> ItemType {
        match self {
            Self::Title(_) => ItemType::Title,
            Self::Media(_) => ItemType::Media,
            Self::Choice(_) => ItemType::Choice,
            Self::MultiChoice(_) => ItemType::MultiChoice,
            Self::TextEntry(_) => ItemType::TextEntry,
            Self::Ordering(_) => ItemType::Ordering,
            Self::Hotspot(_) => ItemType::Hotspot,
        }
    }

    /// Serializes the payload alone, without the type tag.
    pub fn to_payload(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            Self::Title(content) => serde_json::to_value(content),
            Self::Media(content) => serde_json::to_value(content),
            Self::Choice(content) | Self::MultiChoice(content) => serde_json::to_value(content),
            Self::TextEntry(content) => serde_json::to_value(content),
            Self::Ordering(content) => serde_json::to_value(content),
            Self::Hotspot(content) => serde_json::to_value(content),
        }
    }
}

/// Title items carry no content; any submitted keys are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleContent {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaContent {
    pub url: String,
    pub media_type: MediaKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default)]
    pub autoplay: bool,
    #[serde(default = "default_controls")]
    pub controls: bool,
}

fn default_controls() -> bool {
    true
}

/// Shared payload of `choice` and `multi_choice` items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceContent {
    pub choices: Vec<Choice>,
}

impl ChoiceContent {
    pub fn correct_count(&self) -> usize {
        self.choices.iter().filter(|choice| choice.correct).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub id: String,
    pub text: String,
    pub correct: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEntryContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub multiline: bool,
    /// Sample answer shown to authors; never used for grading here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderingContent {
    pub items: Vec<OrderingEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderingEntry {
    pub id: String,
    pub text: String,
    /// 1-based target rank.
    pub correct_order: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HotspotShape {
    Rectangle,
    Circle,
    Polygon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotspotContent {
    pub image_url: String,
    pub hotspots: Vec<Hotspot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub id: String,
    pub shape: HotspotShape,
    pub coordinates: Vec<f64>,
    pub correct: bool,
}

#[cfg(test)]
mod tests {
    use super::{Choice, ChoiceContent, ItemContent, TitleContent};
    use crate::model::item::ItemType;
    use serde_json::json;

    #[test]
    fn content_serializes_with_sibling_type_tag() {
        let content = ItemContent::MultiChoice(ChoiceContent {
            choices: vec![Choice {
                id: "a".to_string(),
                text: "Yes".to_string(),
                correct: true,
            }],
        });

        let value = serde_json::to_value(&content).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "multi_choice",
                "content": {"choices": [{"id": "a", "text": "Yes", "correct": true}]}
            })
        );
        assert_eq!(content.kind(), ItemType::MultiChoice);
    }

    #[test]
    fn title_payload_is_empty_object() {
        let content = ItemContent::Title(TitleContent::default());
        assert_eq!(content.to_payload().unwrap(), json!({}));
    }
}
