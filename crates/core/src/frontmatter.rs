//! Frontmatter scanning and field schema extraction.
//!
//! Templates are treated as line-oriented text, not parsed as YAML. The frontmatter is the
//! block between a `---` first line and the next `---` line, and a field is any line that
//! starts with an identifier followed directly by a colon:
//!
//! ```markdown
//! ---
//! created: {{date}}
//! title: "{{title}}"
//! style:
//! tags:
//!   - paintings
//! ---
//! ```

use crate::constants::FRONTMATTER_DELIMITER;
use crate::fields::FieldSet;
use crate::{GessoError, GessoResult};
use std::path::Path;

/// Line indices of the opening and closing delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FrontmatterBounds {
    pub open: usize,
    pub close: usize,
}

impl FrontmatterBounds {
    /// Whether line `index` lies strictly between the delimiters.
    pub fn contains(&self, index: usize) -> bool {
        index > self.open && index < self.close
    }
}

/// Strips the line terminator (`\n` or `\r\n`).
pub(crate) fn line_content(line: &str) -> &str {
    line.strip_suffix('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .unwrap_or(line)
}

/// Finds the frontmatter block in lines produced by `split_inclusive('\n')`.
pub(crate) fn locate(lines: &[&str]) -> Option<FrontmatterBounds> {
    let is_delimiter = |line: &str| line_content(line).trim_end() == FRONTMATTER_DELIMITER;

    if !lines.first().is_some_and(|line| is_delimiter(line)) {
        return None;
    }

    lines
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, line)| is_delimiter(line))
        .map(|(close, _)| FrontmatterBounds { open: 0, close })
}

/// Returns the key of a `<identifier>:<anything>` line.
pub(crate) fn declared_key(line: &str) -> Option<&str> {
    let end = line
        .char_indices()
        .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
        .map(|(i, _)| i)
        .unwrap_or(line.len());

    if end == 0 || !line[end..].starts_with(':') {
        return None;
    }
    Some(&line[..end])
}

/// Returns the key of a bare anchor line: `<identifier>:` with only whitespace after it.
pub(crate) fn anchor_key(line: &str) -> Option<&str> {
    let key = declared_key(line)?;
    let rest = &line[key.len() + 1..];
    rest.trim().is_empty().then_some(key)
}

/// The field names a template's frontmatter declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSpec {
    declared: Vec<String>,
}

impl TemplateSpec {
    /// Scans template text for its declared fields.
    ///
    /// # Errors
    ///
    /// Returns `GessoError::NoFrontmatter` if the text does not start with a delimited
    /// frontmatter block.
    pub fn parse(text: &str) -> GessoResult<Self> {
        let lines: Vec<&str> = text.split_inclusive('\n').collect();
        let bounds = locate(&lines).ok_or(GessoError::NoFrontmatter)?;

        let declared = lines[bounds.open + 1..bounds.close]
            .iter()
            .filter_map(|line| declared_key(line_content(line)))
            .map(str::to_owned)
            .collect();

        Ok(Self { declared })
    }

    /// Reads and scans a template file.
    ///
    /// # Errors
    ///
    /// Returns `GessoError::TemplateNotFound` if the file does not exist,
    /// `GessoError::TemplateRead` if it cannot be read, and the errors of [`TemplateSpec::parse`].
    pub fn load(path: &Path) -> GessoResult<Self> {
        if !path.is_file() {
            return Err(GessoError::TemplateNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path).map_err(GessoError::TemplateRead)?;
        Self::parse(&text)
    }

    /// Every declared field name, in file order, reserved names included.
    pub fn declared_fields(&self) -> &[String] {
        &self.declared
    }

    /// Declared fields minus the reserved ones.
    ///
    /// # Errors
    ///
    /// Returns `GessoError::NoFieldsToCollect` if no queryable field is declared.
    pub fn field_set(&self) -> GessoResult<FieldSet> {
        FieldSet::new(self.declared.iter().cloned())
    }
}

/// Determines which fields of a template must be requested from the query service.
///
/// # Errors
///
/// Returns `GessoError::NoFrontmatter` when the frontmatter delimiters are missing and
/// `GessoError::NoFieldsToCollect` when every declared field is reserved (or none is declared).
pub fn extract_fields(template_text: &str) -> GessoResult<FieldSet> {
    TemplateSpec::parse(template_text)?.field_set()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STANDARD_TEMPLATE: &str = "---
created: {{date}}
category: \"[[Painting]]\"
title: \"{{title}}\"
artist:
year:
style:
medium:
museum:
image:
rating:
seen:
tags:
  - paintings
---

# {{title}}
";

    #[test]
    fn test_extract_standard_fields() {
        let fields = extract_fields(STANDARD_TEMPLATE).unwrap();
        assert_eq!(fields.as_slice(), ["year", "style", "medium", "museum", "image"]);
    }

    #[test]
    fn test_declared_fields_include_reserved() {
        let spec = TemplateSpec::parse(STANDARD_TEMPLATE).unwrap();
        assert_eq!(spec.declared_fields().len(), 12);
        assert_eq!(spec.declared_fields()[0], "created");
        assert_eq!(spec.declared_fields()[11], "tags");
    }

    #[test]
    fn test_extract_with_description_field() {
        let template = "---\ntitle: \"{{title}}\"\nyear: \ndescription: \nstyle:\n---\n# Content\n";
        let fields = extract_fields(template).unwrap();
        assert_eq!(fields.as_slice(), ["year", "description", "style"]);
    }

    #[test]
    fn test_extract_custom_fields() {
        let template =
            "---\ntitle: \"{{title}}\"\ncustom_field: \nanother_field: \nrating: \n---\n# Content\n";
        let fields = extract_fields(template).unwrap();
        assert_eq!(fields.as_slice(), ["custom_field", "another_field"]);
    }

    #[test]
    fn test_unicode_keys_are_fields() {
        assert_eq!(declared_key("année:"), Some("année"));
        assert_eq!(declared_key("技法: oil"), Some("技法"));
        assert_eq!(anchor_key("musée_2:  "), Some("musée_2"));
        assert_eq!(declared_key("my-key:"), None);

        let fields = extract_fields("---\ntitle:\nannée:\nmusée:\n---\n").unwrap();
        assert_eq!(fields.as_slice(), ["année", "musée"]);
    }

    #[test]
    fn test_list_items_and_indented_lines_are_ignored() {
        let template = "---\nstyle:\n  - \"[[Realism]]\"\n  nested: x\n- item\nyear: 1900\n---\n";
        let fields = extract_fields(template).unwrap();
        assert_eq!(fields.as_slice(), ["style", "year"]);
    }

    #[test]
    fn test_body_keys_are_not_fields() {
        let template = "---\nyear:\n---\nnotes: not a field\n";
        let spec = TemplateSpec::parse(template).unwrap();
        assert_eq!(spec.declared_fields(), ["year"]);
    }

    #[test]
    fn test_missing_frontmatter_raises_error() {
        let err = extract_fields("# No frontmatter here").unwrap_err();
        assert!(matches!(err, GessoError::NoFrontmatter));
    }

    #[test]
    fn test_unclosed_frontmatter_raises_error() {
        let err = extract_fields("---\nyear:\nstyle:\n").unwrap_err();
        assert!(matches!(err, GessoError::NoFrontmatter));
    }

    #[test]
    fn test_frontmatter_must_open_the_document() {
        let err = extract_fields("# Heading\n---\nyear:\n---\n").unwrap_err();
        assert!(matches!(err, GessoError::NoFrontmatter));
    }

    #[test]
    fn test_all_fields_reserved_raises_error() {
        let template = "---\ntitle: \"{{title}}\"\nartist: \nrating: \ntags:\n  - paintings\n---\n";
        let err = extract_fields(template).unwrap_err();
        assert!(err.to_string().to_lowercase().contains("no fields to collect"));
    }

    #[test]
    fn test_empty_frontmatter_raises_no_fields_error() {
        let err = extract_fields("---\n---\n# Content\n").unwrap_err();
        assert!(matches!(err, GessoError::NoFieldsToCollect));
    }

    #[test]
    fn test_frontmatter_without_colon_lines_raises_no_fields_error() {
        let err = extract_fields("---\njust some words\n  - dangling\n---\n").unwrap_err();
        assert!(matches!(err, GessoError::NoFieldsToCollect));
    }

    #[test]
    fn test_crlf_template_is_scanned() {
        let fields = extract_fields("---\r\nyear: \r\nstyle:\r\n---\r\n").unwrap();
        assert_eq!(fields.as_slice(), ["year", "style"]);
    }

    #[test]
    fn test_anchor_key_requires_bare_line() {
        assert_eq!(anchor_key("style:"), Some("style"));
        assert_eq!(anchor_key("year:   "), Some("year"));
        assert_eq!(anchor_key("year: 1900"), None);
        assert_eq!(anchor_key("  style:"), None);
        assert_eq!(anchor_key("my style:"), None);
    }

    #[test]
    fn test_load_missing_template() {
        let err = TemplateSpec::load(Path::new("/nonexistent/path/to/file.md")).unwrap_err();
        assert!(matches!(err, GessoError::TemplateNotFound { .. }));
    }
}
