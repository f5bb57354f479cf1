//! Run orchestration.
//!
//! A [`Generator`] owns everything shared by a run (configuration, field set, cache and
//! metadata source) and processes the painting list one entry at a time:
//!
//! ```text
//! cache lookup ──hit──────────────────────┐
//!      │ miss                             ▼
//!      └─> query ─> cache write ─> normalise ─> render ─> write note
//! ```
//!
//! Per-painting failures are logged and counted as skipped. Only configuration errors
//! (detected in [`Generator::new`]) abort a run.

use crate::config::CoreConfig;
use crate::constants::DATE_FORMAT;
use crate::fields::FieldSet;
use crate::frontmatter::TemplateSpec;
use crate::input::{parse_input_file, Painting};
use crate::markdown::render_file;
use crate::normalise::normalise;
use crate::output::{note_filename, write_output};
use crate::GessoResult;
use gesso_cache::{CacheKey, CacheService};
use gesso_types::RawMetadata;

/// Error type returned by metadata sources.
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// A service that resolves painting metadata.
pub trait MetadataSource {
    /// Requests `fields` for one painting.
    ///
    /// The returned mapping should also carry `title` and `artist`. An empty mapping is
    /// treated like a failure.
    fn query(&self, painting: &Painting, fields: &FieldSet) -> Result<RawMetadata, SourceError>;
}

/// Counters for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub cache_hits: usize,
    pub queries: usize,
    pub written: usize,
    pub skipped: usize,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} paintings: {} from cache, {} queried, {} written, {} skipped",
            self.total, self.cache_hits, self.queries, self.written, self.skipped
        )
    }
}

/// The current local date, formatted for the `{{date}}` placeholder.
pub fn today() -> String {
    chrono::Local::now().format(DATE_FORMAT).to_string()
}

/// Generates one note per painting.
pub struct Generator<S> {
    config: CoreConfig,
    fields: FieldSet,
    cache: CacheService,
    source: S,
}

impl<S: MetadataSource> Generator<S> {
    /// Prepares a run: loads the template and extracts its field set.
    ///
    /// # Errors
    ///
    /// Returns the configuration errors of [`TemplateSpec::load`] and
    /// [`TemplateSpec::field_set`].
    pub fn new(config: CoreConfig, source: S) -> GessoResult<Self> {
        let template = TemplateSpec::load(config.template_path())?;
        let fields = template.field_set()?;
        let cache = CacheService::new(config.cache_dir());

        tracing::info!(
            "template {} requests fields: {}",
            config.template_path().display(),
            fields
        );

        Ok(Self {
            config,
            fields,
            cache,
            source,
        })
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Processes every painting in the input list.
    ///
    /// A missing or unreadable input file is logged and results in an empty run.
    pub fn run(&self, today: &str) -> RunSummary {
        let paintings = match parse_input_file(self.config.input_path()) {
            Ok(paintings) => paintings,
            Err(e) => {
                tracing::error!("{} ({})", e, self.config.input_path().display());
                Vec::new()
            }
        };

        let mut summary = RunSummary {
            total: paintings.len(),
            ..RunSummary::default()
        };
        tracing::info!("found {} paintings", summary.total);

        for painting in &paintings {
            if self.process(painting, today, &mut summary) {
                summary.written += 1;
            } else {
                summary.skipped += 1;
            }
        }

        tracing::info!("{}", summary);
        summary
    }

    /// Cached metadata for `painting`, or a fresh query result.
    fn resolve(&self, painting: &Painting, summary: &mut RunSummary) -> Option<RawMetadata> {
        let key = CacheKey::for_painting(painting.title.as_str(), painting.artist.as_str());

        if let Some(raw) = self.cache.get(&key).filter(|raw| !raw.is_empty()) {
            tracing::info!("[{}] cache hit: {}", painting.number, painting.title);
            summary.cache_hits += 1;
            return Some(raw);
        }

        tracing::info!(
            "[{}] querying: {} by {}",
            painting.number,
            painting.title,
            painting.artist
        );
        summary.queries += 1;

        let raw = match self.source.query(painting, &self.fields) {
            Ok(raw) if !raw.is_empty() => raw,
            Ok(_) => {
                tracing::warn!("[{}] skipped: empty query result", painting.number);
                return None;
            }
            Err(e) => {
                tracing::warn!("[{}] skipped: query failed: {}", painting.number, e);
                return None;
            }
        };

        if let Err(e) = self.cache.put(&key, &raw) {
            tracing::warn!("[{}] result not cached: {}", painting.number, e);
        }
        Some(raw)
    }

    /// Returns `true` when a note was written.
    fn process(&self, painting: &Painting, today: &str, summary: &mut RunSummary) -> bool {
        let Some(raw) = self.resolve(painting, summary) else {
            return false;
        };

        let normalized = normalise(&raw, &self.fields);
        let document = render_file(self.config.template_path(), &normalized, today, &self.fields);
        if document.is_empty() {
            tracing::warn!("[{}] skipped: template could not be rendered", painting.number);
            return false;
        }

        let filename = note_filename(painting.title.as_str());
        match write_output(self.config.output_dir(), &filename, document.as_str()) {
            Ok(path) => {
                tracing::info!("[{}] wrote {}", painting.number, path.display());
                true
            }
            Err(e) => {
                tracing::warn!("[{}] skipped: {}", painting.number, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GessoError;
    use gesso_types::MetadataValue;
    use std::cell::Cell;
    use std::path::Path;
    use tempfile::TempDir;

    const TEMPLATE: &str = "---
created: {{date}}
title: \"{{title}}\"
artist:
year:
style:
image:
tags:
  - paintings
---

# {{title}}
";

    /// Answers every query from the painting's own title and artist.
    struct FakeSource {
        calls: Cell<usize>,
        fail_on: Option<&'static str>,
    }

    impl FakeSource {
        fn new() -> Self {
            Self {
                calls: Cell::new(0),
                fail_on: None,
            }
        }

        fn failing_on(title: &'static str) -> Self {
            Self {
                calls: Cell::new(0),
                fail_on: Some(title),
            }
        }
    }

    impl MetadataSource for FakeSource {
        fn query(
            &self,
            painting: &Painting,
            _fields: &FieldSet,
        ) -> Result<RawMetadata, SourceError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail_on == Some(painting.title.as_str()) {
                return Err("service unavailable".into());
            }
            Ok([
                ("title", MetadataValue::from(painting.title.as_str())),
                ("artist", MetadataValue::from(painting.artist.as_str())),
                ("year", MetadataValue::Integer(1900)),
                ("style", MetadataValue::from("Realism")),
            ]
            .into_iter()
            .collect())
        }
    }

    struct EmptySource;

    impl MetadataSource for EmptySource {
        fn query(&self, _: &Painting, _: &FieldSet) -> Result<RawMetadata, SourceError> {
            Ok(RawMetadata::new())
        }
    }

    fn setup(input: &str, template: &str) -> (TempDir, CoreConfig) {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        std::fs::write(root.join("input.txt"), input).unwrap();
        std::fs::write(root.join("template.md"), template).unwrap();

        let config = CoreConfig::new(
            root.join("input.txt"),
            root.join("outputs"),
            root.join(".cache"),
            root.join("template.md"),
        );
        (temp, config)
    }

    fn read_note(root: &Path, title: &str) -> String {
        std::fs::read_to_string(root.join("outputs").join(format!("{title}.md"))).unwrap()
    }

    #[test]
    fn test_run_writes_one_note_per_painting() {
        let (temp, config) = setup("1: Olympia, Manet\n2: Nighthawks, Hopper\n", TEMPLATE);
        let generator = Generator::new(config, FakeSource::new()).unwrap();

        let summary = generator.run("2025-12-24");

        assert_eq!(
            summary,
            RunSummary {
                total: 2,
                cache_hits: 0,
                queries: 2,
                written: 2,
                skipped: 0
            }
        );
        let note = read_note(temp.path(), "Olympia");
        assert!(note.contains("created: 2025-12-24"));
        assert!(note.contains("artist: \"[[Manet]]\""));
        assert!(note.contains("year: 1900"));
        assert!(note.contains("style:\n  - \"[[Realism]]\""));
        assert!(note.contains("# Olympia"));
    }

    #[test]
    fn test_second_run_uses_cache() {
        let (_temp, config) = setup("1: Olympia, Manet\n", TEMPLATE);
        let generator = Generator::new(config, FakeSource::new()).unwrap();

        generator.run("2025-12-24");
        let summary = generator.run("2025-12-25");

        assert_eq!(summary.cache_hits, 1);
        assert_eq!(summary.queries, 0);
        assert_eq!(summary.written, 1);
        assert_eq!(generator.source().calls.get(), 1);
    }

    #[test]
    fn test_empty_cache_entry_is_a_miss() {
        let (temp, config) = setup("1: Olympia, Manet\n", TEMPLATE);
        let cache_dir = temp.path().join(".cache");
        std::fs::create_dir_all(&cache_dir).unwrap();
        std::fs::write(cache_dir.join("olympia_manet.json"), "{}").unwrap();
        let generator = Generator::new(config, FakeSource::new()).unwrap();

        let summary = generator.run("2025-12-24");

        assert_eq!(summary.cache_hits, 0);
        assert_eq!(summary.queries, 1);
        assert_eq!(summary.written, 1);
    }

    #[test]
    fn test_query_result_is_cached() {
        let (temp, config) = setup("1: Olympia, Manet\n", TEMPLATE);
        let generator = Generator::new(config, FakeSource::new()).unwrap();

        generator.run("2025-12-24");

        let cached = std::fs::read_to_string(temp.path().join(".cache/olympia_manet.json"))
            .unwrap();
        let raw = RawMetadata::from_json_str(&cached).unwrap();
        assert_eq!(raw.get("year"), Some(&MetadataValue::Integer(1900)));
    }

    #[test]
    fn test_failed_query_skips_painting() {
        let (temp, config) = setup("1: Olympia, Manet\n2: Nighthawks, Hopper\n", TEMPLATE);
        let generator = Generator::new(config, FakeSource::failing_on("Olympia")).unwrap();

        let summary = generator.run("2025-12-24");

        assert_eq!(summary.written, 1);
        assert_eq!(summary.skipped, 1);
        assert!(!temp.path().join("outputs/Olympia.md").exists());
        assert!(!temp.path().join(".cache/olympia_manet.json").exists());
    }

    #[test]
    fn test_empty_query_skips_painting() {
        let (temp, config) = setup("1: Olympia, Manet\n", TEMPLATE);
        let generator = Generator::new(config, EmptySource).unwrap();

        let summary = generator.run("2025-12-24");

        assert_eq!(summary.queries, 1);
        assert_eq!(summary.skipped, 1);
        assert!(!temp.path().join(".cache").exists());
    }

    #[test]
    fn test_template_removed_mid_run_skips() {
        let (temp, config) = setup("1: Olympia, Manet\n", TEMPLATE);
        let generator = Generator::new(config, FakeSource::new()).unwrap();
        std::fs::remove_file(temp.path().join("template.md")).unwrap();

        let summary = generator.run("2025-12-24");

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.written, 0);
    }

    #[test]
    fn test_missing_input_is_an_empty_run() {
        let (temp, config) = setup("", TEMPLATE);
        std::fs::remove_file(temp.path().join("input.txt")).unwrap();
        let generator = Generator::new(config, FakeSource::new()).unwrap();

        assert_eq!(generator.run("2025-12-24"), RunSummary::default());
    }

    #[test]
    fn test_title_with_separator_stays_in_output_dir() {
        let (temp, config) = setup("1: AC/DC, Someone\n", TEMPLATE);
        let generator = Generator::new(config, FakeSource::new()).unwrap();

        generator.run("2025-12-24");

        assert!(temp.path().join("outputs/AC-DC.md").is_file());
    }

    #[test]
    fn test_new_rejects_template_without_fields() {
        let (_temp, config) = setup("", "---\ntitle: \"{{title}}\"\nartist:\n---\n");
        let err = Generator::new(config, FakeSource::new()).err().unwrap();
        assert!(matches!(err, GessoError::NoFieldsToCollect));
    }

    #[test]
    fn test_new_rejects_missing_template() {
        let (temp, config) = setup("", TEMPLATE);
        std::fs::remove_file(temp.path().join("template.md")).unwrap();

        let err = Generator::new(config, FakeSource::new()).err().unwrap();

        assert!(matches!(err, GessoError::TemplateNotFound { .. }));
    }

    #[test]
    fn test_today_format() {
        let today = today();
        assert_eq!(today.len(), 10);
        assert!(chrono::NaiveDate::parse_from_str(&today, DATE_FORMAT).is_ok());
    }
}
