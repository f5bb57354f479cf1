//! Constants used throughout the Gesso core crate.
//!
//! Placeholder tokens, sentinel values and default paths live here so that the template
//! format is described in one place.

/// Line that opens and closes a template's frontmatter block.
pub const FRONTMATTER_DELIMITER: &str = "---";

/// Value the query service uses for "no data available". Compared case-insensitively.
pub const UNKNOWN_SENTINEL: &str = "unknown";

/// The only tag written to generated notes.
pub const PAINTINGS_TAG: &str = "paintings";

/// Source key that held the image URL before templates named it `image`.
pub const LEGACY_IMAGE_KEY: &str = "image_url";

/// Placeholder replaced with the run date.
pub const DATE_PLACEHOLDER: &str = "{{date}}";

/// Placeholder replaced with the painting title.
pub const TITLE_PLACEHOLDER: &str = "{{title}}";

/// Placeholder replaced with the image URL.
pub const IMAGE_PLACEHOLDER: &str = "{{image}}";

/// Date format of the `{{date}}` placeholder.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Extension of generated notes.
pub const NOTE_EXTENSION: &str = "md";

/// Default painting list.
pub const DEFAULT_INPUT_PATH: &str = "data/input.txt";

/// Default directory for generated notes.
pub const DEFAULT_OUTPUT_DIR: &str = "outputs/";

/// Default directory for cached query results.
pub const DEFAULT_CACHE_DIR: &str = ".cache";

/// Default note template.
pub const DEFAULT_TEMPLATE_PATH: &str = "data/example-template.md";
