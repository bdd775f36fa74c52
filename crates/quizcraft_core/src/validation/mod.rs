//! Item content validation.
//!
//! # Responsibility
//! - Hold the declarative per-type content schemas (`schema`).
//! - Decode raw payloads into typed `ItemContent` and apply semantic rules
//!   (`validator`).
//!
//! # Invariants
//! - Validation is a pure function of `(type tag, raw content)`.
//! - Semantic rules run only after structural validation succeeded.

pub mod schema;
pub mod validator;

use thiserror::Error;

pub use schema::{schema_for, schema_for_tag, ContentSchema, FieldKind, FieldSpec};
pub use validator::{validate, validate_content};

/// Reason an item content payload was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    /// Type tag is outside the closed enumeration.
    #[error("invalid item type `{0}`")]
    TypeInvalid(String),
    /// Payload does not match the schema bound to its type.
    #[error("content field `{field}` {reason}")]
    ContentStructureInvalid { field: String, reason: String },
    /// Choice content has no choice marked correct.
    #[error("at least one choice must be marked correct")]
    NoCorrectAnswer,
    /// Ordering ranks are not exactly `1..=count`.
    #[error("ordering ranks must be exactly 1..={count} without gaps or duplicates")]
    OrderingSequenceInvalid { count: usize },
    /// Hotspot content has no hotspot marked correct.
    #[error("at least one hotspot must be marked correct")]
    NoCorrectHotspot,
}

impl ContentError {
    /// Content-relative path of the offending field, e.g. `choices[1].text`.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::TypeInvalid(_) => None,
            Self::ContentStructureInvalid { field, .. } => Some(field.as_str()),
            Self::NoCorrectAnswer => Some("choices"),
            Self::OrderingSequenceInvalid { .. } => Some("items"),
            Self::NoCorrectHotspot => Some("hotspots"),
        }
    }

    pub(crate) fn structure(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ContentStructureInvalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
