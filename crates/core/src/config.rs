//! Core runtime configuration.
//!
//! Paths are resolved once at process startup and passed into the generator. Services never
//! read environment variables themselves.

use crate::constants::{
    DEFAULT_CACHE_DIR, DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_DIR, DEFAULT_TEMPLATE_PATH,
};
use crate::{GessoError, GessoResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    input_path: PathBuf,
    output_dir: PathBuf,
    cache_dir: PathBuf,
    template_path: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// `template_path` should already be resolved with [`resolve_template_path`].
    pub fn new(
        input_path: PathBuf,
        output_dir: PathBuf,
        cache_dir: PathBuf,
        template_path: PathBuf,
    ) -> Self {
        Self {
            input_path,
            output_dir,
            cache_dir,
            template_path,
        }
    }

    /// Builds a configuration from optional overrides, falling back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns `GessoError::TemplateNotFound` if the template cannot be located.
    pub fn from_overrides(
        input_path: Option<PathBuf>,
        output_dir: Option<PathBuf>,
        cache_dir: Option<PathBuf>,
        template_path: Option<PathBuf>,
    ) -> GessoResult<Self> {
        let template_path =
            template_path.unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE_PATH));

        Ok(Self::new(
            input_path.unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_PATH)),
            output_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            cache_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR)),
            resolve_template_path(&template_path)?,
        ))
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn template_path(&self) -> &Path {
        &self.template_path
    }
}

/// Resolve a template path without reading environment variables.
///
/// An absolute path is used as given. A relative path is looked up against the current
/// working directory and then against each ancestor of `CARGO_MANIFEST_DIR`, so the bundled
/// template is found when running from anywhere inside the workspace.
pub fn resolve_template_path(path: &Path) -> GessoResult<PathBuf> {
    let not_found = || GessoError::TemplateNotFound {
        path: path.to_path_buf(),
    };

    if path.is_absolute() {
        return if path.is_file() {
            Ok(path.to_path_buf())
        } else {
            Err(not_found())
        };
    }

    if path.is_file() {
        return Ok(path.to_path_buf());
    }

    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    for ancestor in manifest_dir.ancestors() {
        let candidate = ancestor.join(path);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    Err(not_found())
}
