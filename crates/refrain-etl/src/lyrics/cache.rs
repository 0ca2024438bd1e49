//! Per-run lyrics cache.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

use refrain_core::model::LyricsResult;

/// Maps (artist, title) to the lookup result for the duration of one run.
///
/// Keys are the raw strings, compared exactly (case-sensitive). Both
/// `Found` and `NotFound` are stored, so a key is looked up at most once.
/// There is no eviction.
#[derive(Debug, Default)]
pub struct LyricsCache {
    entries: HashMap<(String, String), LyricsResult>,
    hits: usize,
    misses: usize,
}

/// Counters describing cache effectiveness over a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: usize,
    pub misses: usize,
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entries, {} hits, {} misses",
            self.entries, self.hits, self.misses
        )
    }
}

impl LyricsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached result for the key, calling `fetch` only on the
    /// first request for it.
    pub fn get_or_fetch(
        &mut self,
        artist: &str,
        title: &str,
        fetch: impl FnOnce() -> LyricsResult,
    ) -> &LyricsResult {
        match self.entries.entry((artist.to_string(), title.to_string())) {
            Entry::Occupied(entry) => {
                self.hits += 1;
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                self.misses += 1;
                entry.insert(fetch())
            }
        }
    }

    pub fn get(&self, artist: &str, title: &str) -> Option<&LyricsResult> {
        self.entries.get(&(artist.to_string(), title.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_second_lookup_is_a_hit() {
        let mut cache = LyricsCache::new();
        let calls = Cell::new(0);
        let fetch = || {
            calls.set(calls.get() + 1);
            LyricsResult::Found("la la".to_string())
        };

        let first = cache.get_or_fetch("Adele", "Hello", fetch).clone();
        let second = cache
            .get_or_fetch("Adele", "Hello", || {
                calls.set(calls.get() + 1);
                LyricsResult::NotFound
            })
            .clone();

        assert_eq!(calls.get(), 1);
        assert_eq!(first, second);
        assert_eq!(
            cache.stats(),
            CacheStats {
                entries: 1,
                hits: 1,
                misses: 1
            }
        );
    }

    #[test]
    fn test_not_found_is_cached() {
        let mut cache = LyricsCache::new();
        let calls = Cell::new(0);
        for _ in 0..3 {
            cache.get_or_fetch("Unknown", "Instrumental", || {
                calls.set(calls.get() + 1);
                LyricsResult::NotFound
            });
        }
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.get("Unknown", "Instrumental"), Some(&LyricsResult::NotFound));
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let mut cache = LyricsCache::new();
        cache.get_or_fetch("ABBA", "SOS", || LyricsResult::NotFound);
        cache.get_or_fetch("abba", "SOS", || LyricsResult::NotFound);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_artist_and_title_are_not_interchangeable() {
        let mut cache = LyricsCache::new();
        cache.get_or_fetch("Yes", "No", || LyricsResult::Found("a".into()));
        assert!(cache.get("No", "Yes").is_none());
    }

    #[test]
    fn test_stats_display() {
        let cache = LyricsCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().to_string(), "0 entries, 0 hits, 0 misses");
    }
}
