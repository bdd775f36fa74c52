//! Content schema registry.
//!
//! Schemas are plain data: each item type maps to a static table of field
//! specs that the validator interprets. Adding a constraint means editing a
//! table, not writing a new checking routine.

use crate::model::item::ItemType;

const ID_MAX_CHARS: usize = 100;
const CHOICE_TEXT_MAX_CHARS: usize = 500;

/// Primitive constraint applied to one content field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// String whose length in characters lies in `min..=max`.
    Text { min: usize, max: usize },
    /// Absolute `http`/`https` URL.
    Url,
    /// String restricted to a fixed set of values.
    OneOf(&'static [&'static str]),
    Bool,
    /// Integer in `min..=max`.
    Integer { min: i64, max: i64 },
    /// Array of at least `min_len` numbers.
    Numbers { min_len: usize },
    /// Array of `min..=max` objects, each checked against `fields`.
    Records {
        min: usize,
        max: usize,
        fields: &'static [FieldSpec],
    },
}

/// One named field of a content object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            required: true,
            kind,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            required: false,
            kind,
        }
    }
}

/// Expected content shape of one item type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentSchema {
    pub item_type: ItemType,
    /// Whether a missing or `null` payload is acceptable.
    pub allows_empty: bool,
    pub fields: &'static [FieldSpec],
}

impl ContentSchema {
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }
}

const MEDIA_KINDS: &[&str] = &["image", "video", "audio"];
const HOTSPOT_SHAPES: &[&str] = &["rectangle", "circle", "polygon"];

const RECORD_ID: FieldSpec = FieldSpec::required(
    "id",
    FieldKind::Text {
        min: 1,
        max: ID_MAX_CHARS,
    },
);

const CHOICE_FIELDS: &[FieldSpec] = &[
    RECORD_ID,
    FieldSpec::required(
        "text",
        FieldKind::Text {
            min: 1,
            max: CHOICE_TEXT_MAX_CHARS,
        },
    ),
    FieldSpec::required("correct", FieldKind::Bool),
];

const CHOICE_CONTENT: &[FieldSpec] = &[FieldSpec::required(
    "choices",
    FieldKind::Records {
        min: 1,
        max: 10,
        fields: CHOICE_FIELDS,
    },
)];

const ORDERING_FIELDS: &[FieldSpec] = &[
    RECORD_ID,
    FieldSpec::required(
        "text",
        FieldKind::Text {
            min: 1,
            max: CHOICE_TEXT_MAX_CHARS,
        },
    ),
    FieldSpec::required(
        "correctOrder",
        FieldKind::Integer {
            min: 1,
            max: u32::MAX as i64,
        },
    ),
];

const HOTSPOT_FIELDS: &[FieldSpec] = &[
    RECORD_ID,
    FieldSpec::required("shape", FieldKind::OneOf(HOTSPOT_SHAPES)),
    FieldSpec::required("coordinates", FieldKind::Numbers { min_len: 1 }),
    FieldSpec::required("correct", FieldKind::Bool),
];

static SCHEMAS: [ContentSchema; 7] = [
    ContentSchema {
        item_type: ItemType::Title,
        allows_empty: true,
        fields: &[],
    },
    ContentSchema {
        item_type: ItemType::Media,
        allows_empty: false,
        fields: &[
            FieldSpec::required("url", FieldKind::Url),
            FieldSpec::required("mediaType", FieldKind::OneOf(MEDIA_KINDS)),
            FieldSpec::optional("alt", FieldKind::Text { min: 0, max: 200 }),
            FieldSpec::optional("caption", FieldKind::Text { min: 0, max: 500 }),
            FieldSpec::optional("autoplay", FieldKind::Bool),
            FieldSpec::optional("controls", FieldKind::Bool),
        ],
    },
    ContentSchema {
        item_type: ItemType::Choice,
        allows_empty: false,
        fields: CHOICE_CONTENT,
    },
    ContentSchema {
        item_type: ItemType::MultiChoice,
        allows_empty: false,
        fields: CHOICE_CONTENT,
    },
    ContentSchema {
        item_type: ItemType::TextEntry,
        allows_empty: true,
        fields: &[
            FieldSpec::optional("maxLength", FieldKind::Integer { min: 1, max: 10_000 }),
            FieldSpec::optional("placeholder", FieldKind::Text { min: 0, max: 100 }),
            FieldSpec::optional("multiline", FieldKind::Bool),
            FieldSpec::optional("correctAnswer", FieldKind::Text { min: 0, max: 10_000 }),
        ],
    },
    ContentSchema {
        item_type: ItemType::Ordering,
        allows_empty: false,
        fields: &[FieldSpec::required(
            "items",
            FieldKind::Records {
                min: 2,
                max: 10,
                fields: ORDERING_FIELDS,
            },
        )],
    },
    ContentSchema {
        item_type: ItemType::Hotspot,
        allows_empty: false,
        fields: &[
            FieldSpec::required("imageUrl", FieldKind::Url),
            FieldSpec::required(
                "hotspots",
                FieldKind::Records {
                    min: 1,
                    max: 20,
                    fields: HOTSPOT_FIELDS,
                },
            ),
        ],
    },
];

/// Returns the schema bound to an item type.
pub fn schema_for(item_type: ItemType) -> &'static ContentSchema {
    match item_type {
        ItemType::Title => &SCHEMAS[0],
        ItemType::Media => &SCHEMAS[1],
        ItemType::Choice => &SCHEMAS[2],
        ItemType::MultiChoice => &SCHEMAS[3],
        ItemType::TextEntry => &SCHEMAS[4],
        ItemType::Ordering => &SCHEMAS[5],
        ItemType::Hotspot => &SCHEMAS[6],
    }
}

/// Looks up a schema by raw type tag; `None` for unknown tags.
pub fn schema_for_tag(tag: &str) -> Option<&'static ContentSchema> {
    ItemType::parse(tag).map(schema_for)
}
