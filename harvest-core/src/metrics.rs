//! Runtime counters for the scraping engine.
//!
//! Lock-free `AtomicU64` counters incremented on the hot path and read on
//! export. A [`Scraper`](crate::Scraper) owns one set; callers can snapshot
//! it at any time.

use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters for high-frequency scraping events.
#[derive(Debug)]
pub struct ScrapeCounters {
    /// Patterns compiled (cache misses, or every resolve with caching off).
    pub patterns_compiled: AtomicU64,
    /// Pattern resolutions served from the cache.
    pub cache_hits: AtomicU64,
    /// `find` calls.
    pub finds: AtomicU64,
    /// `extract` calls.
    pub extractions: AtomicU64,
    /// Fragments yielded by extraction iterators.
    pub fragments_emitted: AtomicU64,
}

impl ScrapeCounters {
    /// Create a new set of zeroed counters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            patterns_compiled: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            finds: AtomicU64::new(0),
            extractions: AtomicU64::new(0),
            fragments_emitted: AtomicU64::new(0),
        }
    }

    pub(crate) fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot all counters for export.
    #[must_use]
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            patterns_compiled: self.patterns_compiled.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            finds: self.finds.load(Ordering::Relaxed),
            extractions: self.extractions.load(Ordering::Relaxed),
            fragments_emitted: self.fragments_emitted.load(Ordering::Relaxed),
        }
    }
}

impl Default for ScrapeCounters {
    fn default() -> Self {
        Self::new()
    }
}

/// A snapshot of counter values at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterSnapshot {
    /// Patterns compiled.
    pub patterns_compiled: u64,
    /// Cache hits.
    pub cache_hits: u64,
    /// `find` calls.
    pub finds: u64,
    /// `extract` calls.
    pub extractions: u64,
    /// Fragments yielded.
    pub fragments_emitted: u64,
}

impl CounterSnapshot {
    /// Format as Prometheus-compatible text.
    #[must_use]
    pub fn to_prometheus(&self) -> String {
        format!(
            "# HELP harvest_patterns_compiled_total Patterns compiled\n\
             # TYPE harvest_patterns_compiled_total counter\n\
             harvest_patterns_compiled_total {}\n\
             # HELP harvest_pattern_cache_hits_total Pattern cache hits\n\
             # TYPE harvest_pattern_cache_hits_total counter\n\
             harvest_pattern_cache_hits_total {}\n\
             # HELP harvest_finds_total Find calls\n\
             # TYPE harvest_finds_total counter\n\
             harvest_finds_total {}\n\
             # HELP harvest_extractions_total Extract calls\n\
             # TYPE harvest_extractions_total counter\n\
             harvest_extractions_total {}\n\
             # HELP harvest_fragments_emitted_total Fragments yielded\n\
             # TYPE harvest_fragments_emitted_total counter\n\
             harvest_fragments_emitted_total {}\n",
            self.patterns_compiled,
            self.cache_hits,
            self.finds,
            self.extractions,
            self.fragments_emitted,
        )
    }

    /// Fraction of pattern resolutions served from cache (0.0 when none).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn cache_hit_ratio(&self) -> f64 {
        let total = self.patterns_compiled + self.cache_hits;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}
