//! Untyped painting metadata as returned by the query service.
//!
//! The service answers with loosely typed JSON: years arrive as integers or strings, lists
//! sometimes arrive as arrays, and missing data is spelled in several ways. [`MetadataValue`]
//! keeps whatever came back so that the field policies in the core crate can decide what
//! counts as empty.

use std::collections::BTreeMap;

/// A single scalar-ish value from a metadata response.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    /// Arrays are tolerated and rendered as a comma separated string.
    List(Vec<MetadataValue>),
}

impl MetadataValue {
    /// Whether the value carries any data.
    ///
    /// Zero, empty strings, empty lists, `false` and `null` are all empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            MetadataValue::Null => false,
            MetadataValue::Bool(b) => *b,
            MetadataValue::Integer(i) => *i != 0,
            MetadataValue::Float(f) => *f != 0.0,
            MetadataValue::Text(s) => !s.is_empty(),
            MetadataValue::List(items) => !items.is_empty(),
        }
    }

    /// Returns the string form used for comparisons and rendering.
    pub fn to_text(&self) -> String {
        match self {
            MetadataValue::Null => String::new(),
            MetadataValue::Bool(b) => b.to_string(),
            MetadataValue::Integer(i) => i.to_string(),
            MetadataValue::Float(f) => f.to_string(),
            MetadataValue::Text(s) => s.clone(),
            MetadataValue::List(items) => items
                .iter()
                .map(MetadataValue::to_text)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Returns the inner string slice for text values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Case-insensitive comparison of the string form against `sentinel`.
    pub fn matches_sentinel(&self, sentinel: &str) -> bool {
        self.to_text().to_lowercase() == sentinel.to_lowercase()
    }
}

impl std::fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl Default for MetadataValue {
    fn default() -> Self {
        MetadataValue::Text(String::new())
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::Text(value.to_owned())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::Text(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        MetadataValue::Integer(value)
    }
}

impl From<serde_json::Value> for MetadataValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => MetadataValue::Null,
            Value::Bool(b) => MetadataValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => MetadataValue::Integer(i),
                None => MetadataValue::Float(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => MetadataValue::Text(s),
            Value::Array(items) => {
                MetadataValue::List(items.into_iter().map(MetadataValue::from).collect())
            }
            // Nested objects are outside the flat model; keep their JSON text.
            Value::Object(_) => MetadataValue::Text(value.to_string()),
        }
    }
}

impl serde::Serialize for MetadataValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            MetadataValue::Null => serializer.serialize_unit(),
            MetadataValue::Bool(b) => serializer.serialize_bool(*b),
            MetadataValue::Integer(i) => serializer.serialize_i64(*i),
            MetadataValue::Float(f) => serializer.serialize_f64(*f),
            MetadataValue::Text(s) => serializer.serialize_str(s),
            MetadataValue::List(items) => serializer.collect_seq(items),
        }
    }
}

impl<'de> serde::Deserialize<'de> for MetadataValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(MetadataValue::from(value))
    }
}

/// Flat mapping from field name to value for one painting.
///
/// An empty mapping means the query failed.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct RawMetadata(BTreeMap<String, MetadataValue>);

impl RawMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON object into metadata.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if `input` is not a JSON object.
    pub fn from_json_str(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    pub fn get(&self, field: &str) -> Option<&MetadataValue> {
        self.0.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<MetadataValue>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &MetadataValue)> {
        self.0.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for RawMetadata
where
    K: Into<String>,
    V: Into<MetadataValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl IntoIterator for RawMetadata {
    type Item = (String, MetadataValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, MetadataValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
