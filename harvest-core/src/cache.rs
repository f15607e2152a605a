//! Bounded cache of compiled patterns.
//!
//! Keyed by [`Pattern`] (expression + case flag). Compilation stays a pure
//! function; the cache only avoids repeating it. Capacity 0 disables
//! caching and every resolve compiles afresh.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;
use regex::Regex;

use crate::error::Result;
use crate::metrics::ScrapeCounters;
use crate::pattern::Pattern;

/// Thread-safe LRU cache of compiled regexes.
pub struct PatternCache {
    inner: Option<Mutex<LruCache<Pattern, Arc<Regex>>>>,
}

impl PatternCache {
    /// Create a cache holding at most `capacity` compiled patterns.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap))),
        }
    }

    /// A cache that never retains anything.
    #[must_use]
    pub fn disabled() -> Self {
        Self { inner: None }
    }

    /// Return the compiled form of `pattern`, compiling on a miss.
    ///
    /// The lock is not held while compiling; two threads missing on the
    /// same pattern may both compile it, and the later insert wins.
    ///
    /// # Errors
    /// Propagates [`Pattern::compile`] errors. Failed compilations are not cached.
    pub fn resolve(&self, pattern: &Pattern, counters: &ScrapeCounters) -> Result<Arc<Regex>> {
        let Some(inner) = &self.inner else {
            ScrapeCounters::incr(&counters.patterns_compiled);
            return pattern.compile();
        };

        if let Some(regex) = inner.lock().get(pattern) {
            ScrapeCounters::incr(&counters.cache_hits);
            return Ok(Arc::clone(regex));
        }

        let regex = pattern.compile()?;
        ScrapeCounters::incr(&counters.patterns_compiled);
        inner.lock().put(pattern.clone(), Arc::clone(&regex));
        Ok(regex)
    }

    /// Number of cached patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.as_ref().map_or(0, |inner| inner.lock().len())
    }

    /// Whether nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached pattern.
    pub fn clear(&self) {
        if let Some(inner) = &self.inner {
            inner.lock().clear();
        }
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new(crate::config::PatternConfig::default().cache_capacity)
    }
}

impl std::fmt::Debug for PatternCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternCache")
            .field("enabled", &self.inner.is_some())
            .field("len", &self.len())
            .finish()
    }
}
