//! # Gesso Core
//!
//! The template-driven field pipeline behind Gesso's painting notes.
//!
//! A run works in three steps:
//! - **Extract**: a template's frontmatter declares which fields a note has; the
//!   non-reserved ones form the run's [`FieldSet`]
//! - **Normalise**: raw query results are turned into render-ready values, one policy per
//!   field (wikilinks, link lists, sentinel filtering)
//! - **Render**: the values are substituted into the template's placeholders and bare
//!   frontmatter anchors
//!
//! [`Generator`] wires these steps to the input list, the cache and a [`MetadataSource`].
//!
//! **No transport concerns**: the HTTP query client lives in `gesso-query`, and argument
//! parsing and logging setup belong to the binaries.

pub mod config;
pub mod constants;
pub mod fields;
pub mod frontmatter;
pub mod input;
pub mod markdown;
pub mod normalise;
pub mod output;
pub mod pipeline;

mod error;

pub use config::{resolve_template_path, CoreConfig};
pub use error::{GessoError, GessoResult};
pub use fields::{FieldPolicy, FieldSet, RESERVED_FIELDS};
pub use frontmatter::{extract_fields, TemplateSpec};
pub use input::{parse_input, parse_input_file, Painting};
pub use markdown::{render, render_file, RenderedDocument};
pub use normalise::{normalise, FieldValue, NormalizedMetadata};
pub use output::{note_filename, write_output};
pub use pipeline::{today, Generator, MetadataSource, RunSummary, SourceError};

pub use gesso_types::{MetadataValue, NonEmptyText, RawMetadata};
