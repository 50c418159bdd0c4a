//! Content-keyed memoization of built outlines.
//!
//! Entries are keyed by a hash of `(base, raw)` and store the exact input,
//! so a hit requires byte equality. Changed text can never be served a
//! stale outline, and a hash collision costs a rebuild, not a wrong answer.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use dashmap::DashMap;

use crate::toc;
use crate::types::TableOfContents;

struct Entry {
    base: Box<str>,
    raw: Box<str>,
    toc: Arc<TableOfContents>,
}

/// Thread-safe outline cache shared across concurrent renders.
pub struct TocCache {
    entries: DashMap<u64, Entry>,
    /// Entry bound. When reached the cache is cleared before inserting.
    max_entries: Option<usize>,
}

impl Default for TocCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TocCache {
    /// Create an unbounded cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            max_entries: None,
        }
    }

    #[must_use]
    pub fn with_capacity_limit(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries: Some(max_entries.max(1)),
        }
    }

    /// Outline of `raw` under `base`, built at most once per distinct input.
    pub fn get_or_build(&self, raw: &str, base: &str) -> Arc<TableOfContents> {
        let key = content_key(raw, base);

        if let Some(entry) = self.entries.get(&key) {
            if &*entry.raw == raw && &*entry.base == base {
                tracing::debug!(key, "toc cache hit");
                return Arc::clone(&entry.toc);
            }
        }

        tracing::debug!(key, bytes = raw.len(), "toc cache miss");
        let toc = Arc::new(toc::build_with_base(raw, base));

        if self.max_entries.is_some_and(|max| self.entries.len() >= max) {
            self.entries.clear();
        }
        self.entries.insert(
            key,
            Entry {
                base: base.into(),
                raw: raw.into(),
                toc: Arc::clone(&toc),
            },
        );
        toc
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

fn content_key(raw: &str, base: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    base.hash(&mut hasher);
    raw.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "# T\n## Intro\n### Detail\n## Usage\n";

    #[test]
    fn cached_equals_uncached() {
        let cache = TocCache::new();
        assert_eq!(*cache.get_or_build(DOC, ""), toc::build(DOC));
        assert_eq!(*cache.get_or_build(DOC, ""), toc::build(DOC));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn repeated_input_shares_one_outline() {
        let cache = TocCache::new();
        let a = cache.get_or_build(DOC, "/docs/x");
        let b = cache.get_or_build(DOC, "/docs/x");
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn changed_text_is_rebuilt() {
        let cache = TocCache::new();
        let before = cache.get_or_build("## Old\n", "");
        let after = cache.get_or_build("## New\n", "");
        assert_eq!(before.items[0].title, "Old");
        assert_eq!(after.items[0].title, "New");
    }

    #[test]
    fn base_is_part_of_the_key() {
        let cache = TocCache::new();
        let a = cache.get_or_build(DOC, "/a");
        let b = cache.get_or_build(DOC, "/b");
        assert_eq!(a.items[0].url, "/a#intro");
        assert_eq!(b.items[0].url, "/b#intro");
    }

    #[test]
    fn capacity_limit_bounds_size() {
        let cache = TocCache::with_capacity_limit(2);
        for i in 0..5 {
            cache.get_or_build(&format!("## S{i}\n"), "");
        }
        assert!(cache.len() <= 2);
        // Evicted entries are rebuilt correctly.
        assert_eq!(cache.get_or_build("## S0\n", "").items[0].title, "S0");
    }

    #[test]
    fn concurrent_builds_agree() {
        let cache = TocCache::new();
        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..50 {
                        assert_eq!(*cache.get_or_build(DOC, ""), toc::build(DOC));
                    }
                });
            }
        });
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_empties() {
        let cache = TocCache::new();
        cache.get_or_build(DOC, "");
        cache.clear();
        assert!(cache.is_empty());
    }
}
