//! Directory-backed cache service.

use crate::{CacheError, CacheKey};
use gesso_types::RawMetadata;
use std::fs;
use std::path::PathBuf;

/// Reads and writes cached metadata under a single directory.
///
/// The directory does not need to exist until the first [`CacheService::put`].
#[derive(Debug, Clone)]
pub struct CacheService {
    cache_dir: PathBuf,
}

impl CacheService {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// Path of the file backing `key`.
    pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.cache_dir.join(key.as_str())
    }

    /// Loads a cached entry.
    ///
    /// Returns `None` if there is no entry. An entry that cannot be read or parsed is
    /// logged and also reported as `None`, so a corrupt file behaves like a miss and is
    /// overwritten by the next successful query.
    pub fn get(&self, key: &CacheKey) -> Option<RawMetadata> {
        let path = self.entry_path(key);
        if !path.is_file() {
            return None;
        }

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!("failed to load cache {}: {}", key, e);
                return None;
            }
        };

        match RawMetadata::from_json_str(&contents) {
            Ok(raw) => Some(raw),
            Err(e) => {
                tracing::warn!("failed to load cache {}: {}", key, e);
                None
            }
        }
    }

    /// Stores an entry, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `CacheError` if the directory cannot be created or the file cannot be written.
    pub fn put(&self, key: &CacheKey, raw: &RawMetadata) -> Result<(), CacheError> {
        fs::create_dir_all(&self.cache_dir).map_err(CacheError::DirCreation)?;

        let json = serde_json::to_string_pretty(raw).map_err(CacheError::Serialization)?;
        fs::write(self.entry_path(key), json).map_err(CacheError::FileWrite)?;

        tracing::debug!("cached {}", key);
        Ok(())
    }
}
