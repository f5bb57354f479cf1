//! Field classification tables and the field set collected for a run.
//!
//! Which template keys are filled in by the user (reserved) and how each queried key is
//! transformed (policy) are data, not code: both are plain tables looked up by name.

use crate::{GessoError, GessoResult};

/// Frontmatter keys the user maintains by hand. They are never sent to the query service.
pub const RESERVED_FIELDS: &[&str] = &[
    "title", "date", "created", "category", "rating", "seen", "tags", "artist",
];

/// How a field's raw value becomes a template value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPolicy {
    /// Copied verbatim.
    Title,
    /// Wrapped as a single wikilink.
    Artist,
    /// Comma separated string turned into a list of wikilinks.
    LinkList,
    /// URL copied verbatim, never quoted.
    Image,
    /// Integer or string copied verbatim.
    Year,
    /// Copied verbatim, including the `unknown` sentinel.
    Description,
    /// Any other field: copied verbatim unless empty or `unknown`.
    Scalar,
}

/// Policies of the well-known fields. Every other name is [`FieldPolicy::Scalar`].
pub const FIELD_POLICIES: &[(&str, FieldPolicy)] = &[
    ("title", FieldPolicy::Title),
    ("artist", FieldPolicy::Artist),
    ("style", FieldPolicy::LinkList),
    ("medium", FieldPolicy::LinkList),
    ("museum", FieldPolicy::LinkList),
    ("image", FieldPolicy::Image),
    ("year", FieldPolicy::Year),
    ("description", FieldPolicy::Description),
];

impl FieldPolicy {
    pub fn for_field(name: &str) -> Self {
        FIELD_POLICIES
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, policy)| *policy)
            .unwrap_or(FieldPolicy::Scalar)
    }
}

pub fn is_reserved(name: &str) -> bool {
    RESERVED_FIELDS.contains(&name)
}

/// Fields that must be populated from the query service, in template order.
///
/// Never empty and never contains a reserved name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet(Vec<String>);

impl FieldSet {
    /// Builds the set from declared field names.
    ///
    /// Reserved names are dropped and repeated names are kept once, at their first position.
    ///
    /// # Errors
    ///
    /// Returns `GessoError::NoFieldsToCollect` if nothing remains.
    pub fn new<I, S>(declared: I) -> GessoResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut fields: Vec<String> = Vec::new();
        for name in declared {
            let name = name.into();
            if is_reserved(&name) || fields.contains(&name) {
                continue;
            }
            fields.push(name);
        }

        if fields.is_empty() {
            return Err(GessoError::NoFieldsToCollect);
        }

        Ok(Self(fields))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|field| field == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for FieldSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}
