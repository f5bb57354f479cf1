//! Raw metadata → template values.
//!
//! Each field is transformed according to its [`FieldPolicy`]. Missing, empty and
//! `unknown` values never fail; they fall back to the field's empty value.

use crate::constants::{LEGACY_IMAGE_KEY, PAINTINGS_TAG, UNKNOWN_SENTINEL};
use crate::fields::{FieldPolicy, FieldSet};
use gesso_types::{MetadataValue, RawMetadata};
use std::collections::BTreeMap;

/// A render-ready field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A single value: plain text, a wikilink, a year, a URL.
    Scalar(MetadataValue),
    /// A list of wikilinks.
    Links(Vec<String>),
}

impl FieldValue {
    pub fn empty() -> Self {
        FieldValue::Scalar(MetadataValue::default())
    }

    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Scalar(MetadataValue::Text(value.into()))
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Scalar(value) => value.is_truthy(),
            FieldValue::Links(items) => !items.is_empty(),
        }
    }

    /// String form of a scalar; empty for lists.
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Scalar(value) => value.to_text(),
            FieldValue::Links(_) => String::new(),
        }
    }

    /// The inner string of a text scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Scalar(value) => value.as_str(),
            FieldValue::Links(_) => None,
        }
    }

    /// Items of a list value; empty for scalars.
    pub fn links(&self) -> &[String] {
        match self {
            FieldValue::Links(items) => items,
            FieldValue::Scalar(_) => &[],
        }
    }
}

/// Template values for one painting.
///
/// Always holds `title`, `artist` and `tags`, plus one entry per queried field.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedMetadata {
    values: BTreeMap<String, FieldValue>,
}

impl NormalizedMetadata {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    pub fn title(&self) -> String {
        self.values
            .get("title")
            .map(FieldValue::to_text)
            .unwrap_or_default()
    }

    /// The wikilinked artist, or an empty string.
    pub fn artist(&self) -> String {
        self.values
            .get("artist")
            .map(FieldValue::to_text)
            .unwrap_or_default()
    }

    /// The image URL, or an empty string when `image` was not queried or is not text.
    pub fn image(&self) -> &str {
        self.values
            .get("image")
            .and_then(FieldValue::as_str)
            .unwrap_or("")
    }

    pub fn tags(&self) -> &[String] {
        self.values
            .get("tags")
            .map(FieldValue::links)
            .unwrap_or(&[])
    }
}

fn wikilink(value: &str) -> String {
    format!("[[{value}]]")
}

fn is_known(value: &MetadataValue) -> bool {
    value.is_truthy() && !value.matches_sentinel(UNKNOWN_SENTINEL)
}

/// Verbatim copy of a known value, or the empty value.
fn known_or_empty(value: Option<&MetadataValue>) -> FieldValue {
    match value {
        Some(value) if is_known(value) => FieldValue::Scalar(value.clone()),
        _ => FieldValue::empty(),
    }
}

fn link_list(value: Option<&MetadataValue>) -> FieldValue {
    let items = match value {
        Some(value) if is_known(value) => value
            .to_text()
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(wikilink)
            .collect(),
        _ => Vec::new(),
    };
    FieldValue::Links(items)
}

fn wrapped_artist(value: Option<&MetadataValue>) -> FieldValue {
    match value {
        Some(value) if value.is_truthy() => FieldValue::text(wikilink(&value.to_text())),
        _ => FieldValue::empty(),
    }
}

fn normalise_field(field: &str, raw: &RawMetadata) -> FieldValue {
    let value = raw.get(field);

    match FieldPolicy::for_field(field) {
        FieldPolicy::Title | FieldPolicy::Description => {
            FieldValue::Scalar(value.cloned().unwrap_or_default())
        }
        FieldPolicy::Artist => wrapped_artist(value),
        FieldPolicy::LinkList => link_list(value),
        FieldPolicy::Image => known_or_empty(value.or_else(|| raw.get(LEGACY_IMAGE_KEY))),
        FieldPolicy::Year | FieldPolicy::Scalar => known_or_empty(value),
    }
}

/// Transforms raw query results into template values for the given fields.
///
/// `title` and `artist` are always computed from `raw`, whether or not they are in
/// `fields`, and `tags` is always `["paintings"]`.
pub fn normalise(raw: &RawMetadata, fields: &FieldSet) -> NormalizedMetadata {
    let mut values = BTreeMap::new();

    values.insert("title".to_owned(), normalise_field("title", raw));
    for field in fields.iter() {
        values.insert(field.to_owned(), normalise_field(field, raw));
    }
    values
        .entry("artist".to_owned())
        .or_insert_with(|| normalise_field("artist", raw));
    values.insert(
        "tags".to_owned(),
        FieldValue::Links(vec![PAINTINGS_TAG.to_owned()]),
    );

    NormalizedMetadata { values }
}
