//! Scraper facade — finder and extractor behind a shared pattern cache.

use std::sync::Arc;

use regex::Regex;

use crate::cache::PatternCache;
use crate::config::{HarvestConfig, PatternConfig};
use crate::error::Result;
use crate::finder::{self, Found};
use crate::fragment::{self, ExtractOptions, Fragments};
use crate::metrics::{CounterSnapshot, ScrapeCounters};
use crate::pattern::Pattern;

/// Runs pattern finds and fragment extractions over raw text.
///
/// `Scraper` is `Send + Sync`; share one behind an `Arc` so every caller
/// benefits from the same compiled-pattern cache.
#[derive(Debug, Default)]
pub struct Scraper {
    cache: PatternCache,
    counters: Arc<ScrapeCounters>,
}

impl Scraper {
    /// Create a scraper with the given cache settings.
    #[must_use]
    pub fn new(config: &PatternConfig) -> Self {
        Self {
            cache: PatternCache::new(config.cache_capacity),
            counters: Arc::new(ScrapeCounters::new()),
        }
    }

    /// Create a scraper from the full configuration.
    #[must_use]
    pub fn from_config(config: &HarvestConfig) -> Self {
        Self::new(&config.patterns)
    }

    /// Compile `pattern`, or fetch it from the cache.
    ///
    /// # Errors
    /// Returns [`HarvestError::InvalidPattern`](crate::HarvestError::InvalidPattern)
    /// if the pattern does not compile.
    pub fn resolve(&self, pattern: &Pattern) -> Result<Arc<Regex>> {
        self.cache.resolve(pattern, &self.counters)
    }

    /// Every match of `pattern` (`iteration == 0`) or only the N-th.
    ///
    /// # Errors
    /// Returns an error only if the pattern does not compile.
    pub fn find<'t>(&self, text: &'t str, pattern: &Pattern, iteration: usize) -> Result<Found<'t>> {
        let regex = self.resolve(pattern)?;
        ScrapeCounters::incr(&self.counters.finds);
        Ok(finder::find_compiled(regex, text, iteration))
    }

    /// Fragments bounded by `start` and `end` matches.
    ///
    /// # Errors
    /// Returns an error only if either pattern does not compile.
    pub fn extract<'t>(
        &self,
        text: &'t str,
        start: &Pattern,
        end: &Pattern,
        options: ExtractOptions,
    ) -> Result<Fragments<'t>> {
        let start = self.resolve(start)?;
        let end = self.resolve(end)?;
        ScrapeCounters::incr(&self.counters.extractions);
        Ok(fragment::extract_compiled(start, end, text, options)
            .with_counters(Arc::clone(&self.counters)))
    }

    /// The compiled-pattern cache.
    #[must_use]
    pub fn cache(&self) -> &PatternCache {
        &self.cache
    }

    /// Snapshot of this scraper's counters.
    #[must_use]
    pub fn counters(&self) -> CounterSnapshot {
        self.counters.snapshot()
    }
}
