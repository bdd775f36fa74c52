//! Content validator: structural decode against the schema registry,
//! followed by type-specific semantic rules.
//!
//! # Invariants
//! - No I/O and no shared state; identical input yields identical verdicts.
//! - Structural checks visit fields in schema order, so the first reported
//!   field is deterministic.
//! - Keys not named by a schema are ignored and dropped on decode.

use super::schema::{schema_for, FieldKind, FieldSpec};
use super::ContentError;
use crate::model::content::{
    ChoiceContent, HotspotContent, ItemContent, MediaContent, OrderingContent, TextEntryContent,
    TitleContent,
};
use crate::model::item::ItemType;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s/?#]+[^\s]*$").expect("valid url regex"));

/// Validates raw content against a raw type tag.
///
/// Unknown tags fail with `TypeInvalid` before the payload is inspected.
pub fn validate(type_tag: &str, raw: &Value) -> Result<ItemContent, ContentError> {
    let item_type =
        ItemType::parse(type_tag).ok_or_else(|| ContentError::TypeInvalid(type_tag.to_string()))?;
    validate_content(item_type, raw)
}

/// Validates raw content against a known item type.
pub fn validate_content(item_type: ItemType, raw: &Value) -> Result<ItemContent, ContentError> {
    let schema = schema_for(item_type);
    let empty = Map::new();
    let object = match raw {
        Value::Null if schema.allows_empty => &empty,
        Value::Object(object) => object,
        Value::Null => return Err(ContentError::structure("content", "is required")),
        other => {
            return Err(ContentError::structure(
                "content",
                format!("must be an object, got {}", json_kind(other)),
            ))
        }
    };

    check_object(object, schema.fields, "")?;
    let content = decode(item_type, object)?;
    check_semantics(&content)?;
    Ok(content)
}

fn check_object(
    object: &Map<String, Value>,
    fields: &[FieldSpec],
    prefix: &str,
) -> Result<(), ContentError> {
    for spec in fields {
        let path = format!("{prefix}{}", spec.name);
        match object.get(spec.name) {
            None | Some(Value::Null) => {
                if spec.required {
                    return Err(ContentError::structure(path, "is required"));
                }
            }
            Some(value) => check_value(value, spec.kind, &path)?,
        }
    }
    Ok(())
}

fn check_value(value: &Value, kind: FieldKind, path: &str) -> Result<(), ContentError> {
    match kind {
        FieldKind::Text { min, max } => {
            let text = expect_str(value, path)?;
            let length = text.chars().count();
            if length < min || length > max {
                return Err(ContentError::structure(
                    path,
                    format!("must be {min}-{max} characters, got {length}"),
                ));
            }
        }
        FieldKind::Url => {
            let text = expect_str(value, path)?;
            if !URL_RE.is_match(text) {
                return Err(ContentError::structure(path, "must be an http(s) URL"));
            }
        }
        FieldKind::OneOf(allowed) => {
            let text = expect_str(value, path)?;
            if !allowed.contains(&text) {
                return Err(ContentError::structure(
                    path,
                    format!("must be one of {}", allowed.join("|")),
                ));
            }
        }
        FieldKind::Bool => {
            if !value.is_boolean() {
                return Err(type_mismatch(path, "a boolean", value));
            }
        }
        FieldKind::Integer { min, max } => {
            let number = value
                .as_i64()
                .ok_or_else(|| type_mismatch(path, "an integer", value))?;
            if number < min || number > max {
                return Err(ContentError::structure(
                    path,
                    format!("must be between {min} and {max}, got {number}"),
                ));
            }
        }
        FieldKind::Numbers { min_len } => {
            let values = expect_array(value, path)?;
            if values.len() < min_len {
                return Err(ContentError::structure(
                    path,
                    format!("must contain at least {min_len} numbers"),
                ));
            }
            for (index, element) in values.iter().enumerate() {
                if !element.is_number() {
                    return Err(type_mismatch(&format!("{path}[{index}]"), "a number", element));
                }
            }
        }
        FieldKind::Records { min, max, fields } => {
            let records = expect_array(value, path)?;
            if records.len() < min || records.len() > max {
                return Err(ContentError::structure(
                    path,
                    format!("must contain {min}-{max} entries, got {}", records.len()),
                ));
            }
            for (index, record) in records.iter().enumerate() {
                let record_path = format!("{path}[{index}]");
                let object = record
                    .as_object()
                    .ok_or_else(|| type_mismatch(&record_path, "an object", record))?;
                check_object(object, fields, &format!("{record_path}."))?;
            }
        }
    }
    Ok(())
}

fn decode(item_type: ItemType, object: &Map<String, Value>) -> Result<ItemContent, ContentError> {
    let content = match item_type {
        ItemType::Title => ItemContent::Title(TitleContent::default()),
        ItemType::Media => ItemContent::Media(decode_payload::<MediaContent>(object)?),
        ItemType::Choice => ItemContent::Choice(decode_payload::<ChoiceContent>(object)?),
        ItemType::MultiChoice => {
            ItemContent::MultiChoice(decode_payload::<ChoiceContent>(object)?)
        }
        ItemType::TextEntry => ItemContent::TextEntry(decode_payload::<TextEntryContent>(object)?),
        ItemType::Ordering => ItemContent::Ordering(decode_payload::<OrderingContent>(object)?),
        ItemType::Hotspot => ItemContent::Hotspot(decode_payload::<HotspotContent>(object)?),
    };
    Ok(content)
}

fn decode_payload<T: DeserializeOwned>(object: &Map<String, Value>) -> Result<T, ContentError> {
    // Optional keys sent as explicit nulls were already accepted; drop them so
    // serde applies field defaults instead of failing on `null`.
    let cleaned: Map<String, Value> = object
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    serde_json::from_value(Value::Object(cleaned))
        .map_err(|err| ContentError::structure("content", err.to_string()))
}

fn check_semantics(content: &ItemContent) -> Result<(), ContentError> {
    match content {
        ItemContent::Choice(choices) | ItemContent::MultiChoice(choices) => {
            if choices.correct_count() == 0 {
                return Err(ContentError::NoCorrectAnswer);
            }
        }
        ItemContent::Ordering(ordering) => {
            let count = ordering.items.len();
            let mut ranks: Vec<u32> = ordering.items.iter().map(|entry| entry.correct_order).collect();
            ranks.sort_unstable();
            let is_sequence = ranks
                .iter()
                .enumerate()
                .all(|(index, rank)| u64::from(*rank) == index as u64 + 1);
            if !is_sequence {
                return Err(ContentError::OrderingSequenceInvalid { count });
            }
        }
        ItemContent::Hotspot(hotspot) => {
            if !hotspot.hotspots.iter().any(|spot| spot.correct) {
                return Err(ContentError::NoCorrectHotspot);
            }
        }
        ItemContent::Title(_) | ItemContent::Media(_) | ItemContent::TextEntry(_) => {}
    }
    Ok(())
}

fn expect_str<'v>(value: &'v Value, path: &str) -> Result<&'v str, ContentError> {
    value
        .as_str()
        .ok_or_else(|| type_mismatch(path, "a string", value))
}

fn expect_array<'v>(value: &'v Value, path: &str) -> Result<&'v Vec<Value>, ContentError> {
    value
        .as_array()
        .ok_or_else(|| type_mismatch(path, "an array", value))
}

fn type_mismatch(path: &str, expected: &str, value: &Value) -> ContentError {
    ContentError::structure(path, format!("must be {expected}, got {}", json_kind(value)))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::{validate, validate_content};
    use crate::model::content::{ItemContent, MediaKind};
    use crate::model::item::ItemType;
    use crate::validation::ContentError;
    use serde_json::{json, Value};

    fn choices(flags: &[bool]) -> Value {
        let choices: Vec<Value> = flags
            .iter()
            .enumerate()
            .map(|(index, correct)| {
                json!({"id": format!("c{index}"), "text": format!("Option {index}"), "correct": correct})
            })
            .collect();
        json!({ "choices": choices })
    }

    fn ordering(ranks: &[i64]) -> Value {
        let items: Vec<Value> = ranks
            .iter()
            .enumerate()
            .map(|(index, rank)| {
                json!({"id": format!("o{index}"), "text": format!("Step {index}"), "correctOrder": rank})
            })
            .collect();
        json!({ "items": items })
    }

    #[test]
    fn unknown_type_fails_before_content_is_inspected() {
        let err = validate("essay", &Value::String("garbage".into())).unwrap_err();
        assert_eq!(err, ContentError::TypeInvalid("essay".to_string()));
    }

    #[test]
    fn title_accepts_missing_or_arbitrary_object() {
        assert!(validate("title", &Value::Null).is_ok());
        assert!(validate("title", &json!({})).is_ok());
        assert!(validate("title", &json!({"ignored": 1})).is_ok());
        assert!(matches!(
            validate("title", &json!([1, 2])),
            Err(ContentError::ContentStructureInvalid { .. })
        ));
    }

    #[test]
    fn choice_without_correct_answer_fails_until_one_is_flipped() {
        for tag in ["choice", "multi_choice"] {
            let err = validate(tag, &choices(&[false, false])).unwrap_err();
            assert_eq!(err, ContentError::NoCorrectAnswer);
            assert!(validate(tag, &choices(&[false, true])).is_ok());
        }
    }

    #[test]
    fn choice_cardinality_is_bounded() {
        let err = validate("choice", &json!({"choices": []})).unwrap_err();
        assert_eq!(err.field(), Some("choices"));

        let mut flags = vec![false; 11];
        flags[0] = true;
        let err = validate("choice", &choices(&flags)).unwrap_err();
        assert!(matches!(
            err,
            ContentError::ContentStructureInvalid { ref field, .. } if field == "choices"
        ));
    }

    #[test]
    fn structural_errors_name_the_nested_field() {
        let content = json!({"choices": [
            {"id": "a", "text": "ok", "correct": true},
            {"id": "b", "text": "", "correct": false}
        ]});
        let err = validate("choice", &content).unwrap_err();
        assert_eq!(err.field(), Some("choices[1].text"));

        let content = json!({"choices": [{"id": "a", "text": "ok"}]});
        let err = validate("choice", &content).unwrap_err();
        assert_eq!(err.field(), Some("choices[0].correct"));

        let content = json!({"choices": [{"id": "a", "text": "ok", "correct": "yes"}]});
        let err = validate("choice", &content).unwrap_err();
        assert_eq!(err.field(), Some("choices[0].correct"));
    }

    #[test]
    fn ordering_requires_exact_one_based_sequence() {
        assert!(validate("ordering", &ordering(&[2, 1])).is_ok());
        assert!(validate("ordering", &ordering(&[3, 1, 2])).is_ok());

        for ranks in [&[1, 3][..], &[1, 1][..], &[2, 3][..], &[1, 2, 2][..]] {
            let err = validate("ordering", &ordering(ranks)).unwrap_err();
            assert_eq!(
                err,
                ContentError::OrderingSequenceInvalid { count: ranks.len() },
                "ranks {ranks:?}"
            );
        }
    }

    #[test]
    fn ordering_rank_must_be_positive_integer() {
        let err = validate("ordering", &ordering(&[0, 1])).unwrap_err();
        assert_eq!(err.field(), Some("items[0].correctOrder"));

        let content = json!({"items": [
            {"id": "a", "text": "A", "correctOrder": 1.5},
            {"id": "b", "text": "B", "correctOrder": 2}
        ]});
        let err = validate("ordering", &content).unwrap_err();
        assert_eq!(err.field(), Some("items[0].correctOrder"));
    }

    #[test]
    fn ordering_needs_at_least_two_entries() {
        let err = validate("ordering", &ordering(&[1])).unwrap_err();
        assert_eq!(err.field(), Some("items"));
    }

    #[test]
    fn media_decodes_with_defaults() {
        let content = validate(
            "media",
            &json!({"url": "https://cdn.example.com/a.png", "mediaType": "image", "alt": null}),
        )
        .unwrap();
        match content {
            ItemContent::Media(media) => {
                assert_eq!(media.media_type, MediaKind::Image);
                assert_eq!(media.alt, None);
                assert!(!media.autoplay);
                assert!(media.controls);
            }
            other => panic!("unexpected content: {other:?}"),
        }
    }

    #[test]
    fn media_rejects_bad_url_and_kind() {
        let err = validate("media", &json!({"url": "not a url", "mediaType": "image"})).unwrap_err();
        assert_eq!(err.field(), Some("url"));

        let err = validate(
            "media",
            &json!({"url": "https://example.com/a.gif", "mediaType": "gif"}),
        )
        .unwrap_err();
        assert_eq!(err.field(), Some("mediaType"));

        let long_alt = "x".repeat(201);
        let err = validate(
            "media",
            &json!({"url": "https://example.com/a.png", "mediaType": "image", "alt": long_alt}),
        )
        .unwrap_err();
        assert_eq!(err.field(), Some("alt"));
    }

    #[test]
    fn text_entry_is_all_optional_but_bounded() {
        assert!(validate_content(ItemType::TextEntry, &Value::Null).is_ok());
        assert!(validate("text_entry", &json!({"maxLength": 10000, "multiline": true})).is_ok());

        let err = validate("text_entry", &json!({"maxLength": 0})).unwrap_err();
        assert_eq!(err.field(), Some("maxLength"));
        let err = validate("text_entry", &json!({"placeholder": "p".repeat(101)})).unwrap_err();
        assert_eq!(err.field(), Some("placeholder"));
    }

    #[test]
    fn hotspot_requires_a_correct_region() {
        let content = |correct: bool| {
            json!({
                "imageUrl": "https://example.com/map.png",
                "hotspots": [
                    {"id": "h1", "shape": "circle", "coordinates": [10, 10, 5], "correct": false},
                    {"id": "h2", "shape": "rectangle", "coordinates": [0, 0, 4.5, 4.5], "correct": correct}
                ]
            })
        };
        assert_eq!(
            validate("hotspot", &content(false)).unwrap_err(),
            ContentError::NoCorrectHotspot
        );
        assert!(validate("hotspot", &content(true)).is_ok());
    }

    #[test]
    fn hotspot_coordinates_must_be_numeric() {
        let content = json!({
            "imageUrl": "https://example.com/map.png",
            "hotspots": [{"id": "h1", "shape": "polygon", "coordinates": [1, "2"], "correct": true}]
        });
        let err = validate("hotspot", &content).unwrap_err();
        assert_eq!(err.field(), Some("hotspots[0].coordinates[1]"));
    }

    #[test]
    fn validation_is_deterministic() {
        let inputs = [
            ("choice", choices(&[false, false])),
            ("ordering", ordering(&[1, 3])),
            ("media", json!({"url": 5})),
            ("hotspot", json!({})),
        ];
        for (tag, content) in inputs {
            assert_eq!(validate(tag, &content), validate(tag, &content));
        }
    }
}
