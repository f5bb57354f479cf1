//! Gesso metadata cache
//!
//! Query results are stored as one pretty-printed JSON file per painting so that repeated
//! runs over the same list do not hit the query service again.
//!
//! ```text
//! .cache/
//! ├── wounded_eurydice_jean_baptiste_camille_corot.json
//! └── olympia_douard_manet.json
//! ```
//!
//! The store is a plain key/value map: no eviction, no locking, and no merging of entries.
//!
//! ## Example Usage
//!
//! ```no_run
//! use gesso_cache::{CacheKey, CacheService};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cache = CacheService::new(".cache");
//! let key = CacheKey::for_painting("Wounded Eurydice", "Corot");
//! if let Some(raw) = cache.get(&key) {
//!     println!("{} cached fields", raw.len());
//! }
//! # Ok(())
//! # }
//! ```

mod key;
mod store;

pub use key::CacheKey;
pub use store::CacheService;

/// Errors that can occur while writing cache entries
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The cache directory could not be created
    #[error("failed to create cache directory: {0}")]
    DirCreation(std::io::Error),

    /// The cache entry could not be serialised
    #[error("failed to serialise cache entry: {0}")]
    Serialization(serde_json::Error),

    /// The cache entry could not be written
    #[error("failed to write cache entry: {0}")]
    FileWrite(std::io::Error),
}
