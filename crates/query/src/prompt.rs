//! Prompt construction and completion parsing.
//!
//! Template field names and the names the service is asked for differ in one place
//! (`image` is requested as `image_url`); both directions go through the same table.
//! A response key is only renamed back when the template asked for the renamed field and
//! does not declare the API name itself.

use crate::QueryError;
use gesso_core::FieldSet;
use gesso_types::{MetadataValue, RawMetadata};

/// Template field name → name used in the prompt and the response.
pub const TEMPLATE_TO_API_FIELD_MAP: &[(&str, &str)] = &[("image", "image_url")];

/// Type hints shown next to each requested field, keyed by API name.
const FIELD_HINTS: &[(&str, &str)] = &[
    ("year", "(integer or empty string)"),
    (
        "style",
        "(single string, e.g., \"Realism\" or comma-separated if multiple)",
    ),
    ("medium", "(single string, e.g., \"Oil on Canvas\")"),
    ("museum", "(single string, e.g., \"Art Institute of Chicago\")"),
    (
        "image_url",
        "(Wikimedia Commons URL preferred, or empty string)",
    ),
    ("description", "(brief, 1-2 sentences, or empty string)"),
];

const GENERIC_HINT: &str = "(single string, or empty string)";

pub fn api_field_name(field: &str) -> &str {
    TEMPLATE_TO_API_FIELD_MAP
        .iter()
        .find(|(template, _)| *template == field)
        .map_or(field, |(_, api)| *api)
}

/// Template field that a response key fills for this run.
pub fn template_field_name<'a>(api_field: &'a str, fields: &FieldSet) -> &'a str {
    if fields.contains(api_field) {
        return api_field;
    }
    TEMPLATE_TO_API_FIELD_MAP
        .iter()
        .find(|(template, api)| *api == api_field && fields.contains(template))
        .map_or(api_field, |(template, _)| *template)
}

fn field_hint(api_field: &str) -> &'static str {
    FIELD_HINTS
        .iter()
        .find(|(name, _)| *name == api_field)
        .map_or(GENERIC_HINT, |(_, hint)| *hint)
}

/// Builds the chat prompt for one painting.
pub fn build_prompt(title: &str, artist: &str, fields: &FieldSet) -> String {
    let mut prompt = String::from(
        "Return a JSON object with the following fields for this painting:\n",
    );
    prompt.push_str(&format!("- title: \"{title}\"\n"));
    prompt.push_str(&format!("- artist: \"{artist}\"\n"));
    let mut listed: Vec<&str> = Vec::new();
    for field in fields.iter() {
        let api_field = api_field_name(field);
        if listed.contains(&api_field) {
            continue;
        }
        listed.push(api_field);
        prompt.push_str(&format!("- {api_field}: {}\n", field_hint(api_field)));
    }
    prompt.push_str("\nReturn ONLY valid JSON, no other text.");
    prompt
}

/// Removes a Markdown code fence (```` ``` ```` or ```` ```json ````) around the content.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line.
    let inner = inner.split_once('\n').map_or("", |(_, rest)| rest);
    inner.trim_end().trim_end_matches("```").trim()
}

/// Parses the message content of a completion into raw metadata keyed by the template
/// field names in `fields`.
///
/// # Errors
///
/// Returns `QueryError::InvalidJson` if the content is not JSON and
/// `QueryError::NotAnObject` if it is JSON but not an object.
pub fn parse_completion(content: &str, fields: &FieldSet) -> Result<RawMetadata, QueryError> {
    let value: serde_json::Value =
        serde_json::from_str(strip_code_fence(content)).map_err(QueryError::InvalidJson)?;

    let serde_json::Value::Object(map) = value else {
        return Err(QueryError::NotAnObject);
    };

    Ok(map
        .into_iter()
        .map(|(key, value)| {
            let field = template_field_name(&key, fields).to_owned();
            (field, MetadataValue::from(value))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gesso_core::{extract_fields, normalise, render};

    fn fields(names: &[&str]) -> FieldSet {
        FieldSet::new(names.iter().copied()).unwrap()
    }

    #[test]
    fn test_field_name_mapping() {
        let standard = fields(&["year", "image"]);
        assert_eq!(api_field_name("image"), "image_url");
        assert_eq!(api_field_name("style"), "style");
        assert_eq!(template_field_name("image_url", &standard), "image");
        assert_eq!(template_field_name("year", &standard), "year");
    }

    #[test]
    fn test_declared_api_name_is_not_renamed() {
        assert_eq!(
            template_field_name("image_url", &fields(&["image_url", "year"])),
            "image_url"
        );
        assert_eq!(
            template_field_name("image_url", &fields(&["image", "image_url"])),
            "image_url"
        );
        assert_eq!(template_field_name("image_url", &fields(&["year"])), "image_url");
    }

    #[test]
    fn test_prompt_lists_requested_fields() {
        let prompt = build_prompt(
            "Wounded Eurydice",
            "Corot",
            &fields(&["year", "style", "image", "mood"]),
        );

        assert!(prompt.starts_with("Return a JSON object"));
        assert!(prompt.contains("- title: \"Wounded Eurydice\"\n"));
        assert!(prompt.contains("- artist: \"Corot\"\n"));
        assert!(prompt.contains("- year: (integer or empty string)\n"));
        assert!(prompt.contains("- image_url: (Wikimedia Commons URL preferred"));
        assert!(prompt.contains("- mood: (single string, or empty string)\n"));
        assert!(!prompt.contains("- image:"));
        assert!(prompt.ends_with("Return ONLY valid JSON, no other text."));
    }

    #[test]
    fn test_prompt_lists_shared_api_name_once() {
        let prompt = build_prompt("Olympia", "Manet", &fields(&["image", "image_url", "year"]));
        assert_eq!(prompt.matches("- image_url:").count(), 1);
        assert!(prompt.contains("- year: (integer or empty string)\n"));
    }

    #[test]
    fn test_prompt_keeps_field_order() {
        let prompt = build_prompt("T", "A", &fields(&["museum", "year"]));
        let museum = prompt.find("- museum:").unwrap();
        let year = prompt.find("- year:").unwrap();
        assert!(museum < year);
    }

    #[test]
    fn test_parse_plain_json() {
        let raw = parse_completion(
            r#"{"title": "Olympia", "artist": "Manet", "year": 1863, "image_url": "https://x/y.jpg"}"#,
            &fields(&["year", "image"]),
        )
        .unwrap();

        assert_eq!(raw.get("year"), Some(&MetadataValue::Integer(1863)));
        assert_eq!(raw.get("image"), Some(&MetadataValue::from("https://x/y.jpg")));
        assert_eq!(raw.get("image_url"), None);
    }

    #[test]
    fn test_parse_keeps_declared_image_url() {
        let content = r#"{"title": "Olympia", "image_url": "https://x/y.jpg"}"#;

        let raw = parse_completion(content, &fields(&["image_url"])).unwrap();
        assert_eq!(raw.get("image_url"), Some(&MetadataValue::from("https://x/y.jpg")));
        assert_eq!(raw.get("image"), None);

        let raw = parse_completion(content, &fields(&["image", "image_url"])).unwrap();
        assert_eq!(raw.get("image_url"), Some(&MetadataValue::from("https://x/y.jpg")));
    }

    #[test]
    fn test_image_url_template_renders_returned_url() {
        let template = "---\ntitle: \"{{title}}\"\nimage_url:\nyear:\n---\n";
        let declared = extract_fields(template).unwrap();
        let raw = parse_completion(
            r#"{"title": "Olympia", "artist": "Manet", "image_url": "https://x/y.jpg", "year": 1863}"#,
            &declared,
        )
        .unwrap();

        let normalized = normalise(&raw, &declared);
        let note = render(template, &normalized, "2024-01-01", &declared);

        assert!(note.as_str().contains("\nimage_url: https://x/y.jpg\n"));
        assert!(note.as_str().contains("\nyear: 1863\n"));
    }

    #[test]
    fn test_image_and_image_url_both_filled() {
        let template = "---\nimage:\nimage_url:\n---\n";
        let declared = extract_fields(template).unwrap();
        let raw = parse_completion(r#"{"image_url": "https://x/y.jpg"}"#, &declared).unwrap();

        let normalized = normalise(&raw, &declared);
        let note = render(template, &normalized, "2024-01-01", &declared);

        assert_eq!(note.as_str(), "---\nimage: https://x/y.jpg\nimage_url: https://x/y.jpg\n---\n");
    }

    #[test]
    fn test_parse_fenced_json() {
        let content = "```json\n{\"title\": \"Olympia\", \"style\": \"Realism\"}\n```\n";
        let raw = parse_completion(content, &fields(&["style"])).unwrap();
        assert_eq!(raw.get("style"), Some(&MetadataValue::from("Realism")));

        let bare_fence = "```\n{\"year\": \"\"}\n```";
        let raw = parse_completion(bare_fence, &fields(&["year"])).unwrap();
        assert_eq!(raw.get("year"), Some(&MetadataValue::from("")));
    }

    #[test]
    fn test_parse_rejects_prose() {
        let err = parse_completion("I could not find that painting.", &fields(&["year"])).unwrap_err();
        assert!(matches!(err, QueryError::InvalidJson(_)));
    }

    #[test]
    fn test_parse_rejects_non_object() {
        let err = parse_completion("[1, 2, 3]", &fields(&["year"])).unwrap_err();
        assert!(matches!(err, QueryError::NotAnObject));
    }
}
