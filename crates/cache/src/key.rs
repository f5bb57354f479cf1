//! Cache key derivation.

/// File name of a cache entry, derived from a painting's title and artist.
///
/// The key is `"{title}_{artist}"` lowercased, with spaces turned into underscores and
/// every character outside `[a-z0-9_]` dropped, followed by `.json`. It is always a
/// single path component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn for_painting(title: &str, artist: &str) -> Self {
        let key: String = format!("{title}_{artist}")
            .to_lowercase()
            .replace(' ', "_")
            .chars()
            .filter(|c| matches!(c, 'a'..='z' | '0'..='9' | '_'))
            .collect();

        Self(format!("{key}.json"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
