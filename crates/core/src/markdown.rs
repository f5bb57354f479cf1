//! Note rendering: substitutes normalised values into a template.
//!
//! Rendering happens in two passes over the template text:
//!
//! 1. The literal placeholders `{{date}}`, `{{title}}` and `{{image}}` are replaced
//!    everywhere, body included.
//! 2. Inside the frontmatter, bare anchor lines (`<field>:` with nothing after the colon)
//!    receive their value. `artist:` is always filled when an artist is known; every other
//!    anchor is filled only for fields in the run's [`FieldSet`].
//!
//! Anchors bind to whole lines, so `year:` never matches `birth_year:`. Lines outside the
//! frontmatter are only touched by the first pass.

use crate::constants::{DATE_PLACEHOLDER, IMAGE_PLACEHOLDER, TITLE_PLACEHOLDER};
use crate::fields::{FieldPolicy, FieldSet};
use crate::frontmatter::{anchor_key, line_content, locate};
use crate::normalise::{FieldValue, NormalizedMetadata};
use std::path::Path;

/// A rendered note.
///
/// An empty document means rendering failed and nothing should be written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedDocument(String);

impl RenderedDocument {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RenderedDocument {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Wraps `value` in double quotes when `needs_quotes` holds.
fn quoted(value: &str, needs_quotes: bool) -> String {
    if needs_quotes {
        format!("\"{value}\"")
    } else {
        value.to_owned()
    }
}

/// YAML list item; wikilinks must be quoted or YAML reads them as nested lists.
fn list_item(item: &str) -> String {
    format!("  - {}", quoted(item, item.contains("[[") && item.contains("]]")))
}

/// Renders the replacement for a bare `<field>:` anchor line.
fn render_anchor(field: &str, value: &FieldValue, newline: &str) -> String {
    match FieldPolicy::for_field(field) {
        FieldPolicy::LinkList => {
            let mut out = format!("{field}:");
            for item in value.links() {
                out.push_str(newline);
                out.push_str(&list_item(item));
            }
            out
        }
        FieldPolicy::Year => {
            let year = if value.is_truthy() {
                value.to_text()
            } else {
                String::new()
            };
            format!("{field}: {year}")
        }
        FieldPolicy::Image => format!("{field}: {}", value.as_str().unwrap_or("")),
        _ => {
            let text = if value.is_truthy() {
                value.to_text()
            } else {
                String::new()
            };
            let needs_quotes = text.contains("[[") || text.contains("]]");
            format!("{field}: {}", quoted(&text, needs_quotes))
        }
    }
}

/// Renders a note from template text.
///
/// See the module documentation for the substitution rules. Fields in `fields` without a
/// matching anchor in the template are skipped.
pub fn render(
    template_text: &str,
    normalized: &NormalizedMetadata,
    today: &str,
    fields: &FieldSet,
) -> RenderedDocument {
    let content = template_text
        .replace(DATE_PLACEHOLDER, today)
        .replace(TITLE_PLACEHOLDER, &normalized.title())
        .replace(IMAGE_PLACEHOLDER, normalized.image());

    let lines: Vec<&str> = content.split_inclusive('\n').collect();
    let Some(bounds) = locate(&lines) else {
        return RenderedDocument(content);
    };

    let artist = normalized.artist();
    let empty = FieldValue::empty();
    let mut out = String::with_capacity(content.len());

    for (index, line) in lines.iter().enumerate() {
        let body = line_content(line);
        let key = bounds.contains(index).then(|| anchor_key(body)).flatten();

        let replacement = match key {
            Some("artist") if !artist.is_empty() => Some(format!("artist: \"{artist}\"")),
            Some(field) if fields.contains(field) => {
                let terminator = &line[body.len()..];
                let newline = if terminator == "\r\n" { "\r\n" } else { "\n" };
                let value = normalized.get(field).unwrap_or(&empty);
                Some(render_anchor(field, value, newline))
            }
            _ => None,
        };

        match replacement {
            Some(replacement) => {
                out.push_str(&replacement);
                out.push_str(&line[body.len()..]);
            }
            None => out.push_str(line),
        }
    }

    RenderedDocument(out)
}

/// Reads a template file and renders it.
///
/// A template that cannot be read is logged and yields an empty document; callers skip
/// writing for that painting and carry on.
pub fn render_file(
    template_path: &Path,
    normalized: &NormalizedMetadata,
    today: &str,
    fields: &FieldSet,
) -> RenderedDocument {
    match std::fs::read_to_string(template_path) {
        Ok(text) => render(&text, normalized, today, fields),
        Err(e) => {
            tracing::error!("template not readable {}: {}", template_path.display(), e);
            RenderedDocument::empty()
        }
    }
}
