//! Deduplicating retrieval list.
//!
//! A [`RetrievalList`] remembers every value it has ever accepted. Taking a
//! value marks it consumed instead of removing it, so with uniqueness on a
//! value that has already been handed out is still refused on re-insert.
//! This is what lets a crawl loop feed newly scraped links back in without
//! revisiting pages.
//!
//! All state sits behind one `parking_lot::Mutex`. `insert` (duplicate scan
//! then append) and `take` (selection then stamp) each run under that lock,
//! so concurrent callers can neither double-insert nor double-take.

pub mod comparer;
pub mod item;
pub mod order;

pub use comparer::{FnComparer, ListValue, TextComparer, ValueComparer, ValueEq};
pub use item::MemoryItem;
pub use order::RetrievalOrder;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::config::ListConfig;
use crate::error::{HarvestError, Result};

/// A thread-safe store of values with per-item consumption tracking.
pub struct RetrievalList<T> {
    inner: Mutex<ListState<T>>,
    comparer: Box<dyn ValueComparer<T>>,
}

struct ListState<T> {
    items: Vec<MemoryItem<T>>,
    name: String,
    unique_values: bool,
    order: RetrievalOrder,
    last_recorded: Option<DateTime<Utc>>,
    total_inserted: u64,
    total_duplicates: u64,
    total_taken: u64,
}

/// Statistics about a retrieval list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListStats {
    /// Name of the list.
    pub name: String,
    /// Items held, consumed or not.
    pub total: usize,
    /// Items already taken.
    pub consumed: usize,
    /// Items still available.
    pub unconsumed: usize,
    /// Values appended since creation.
    pub total_inserted: u64,
    /// Inserts refused as duplicates.
    pub total_duplicates: u64,
    /// Successful `take` calls.
    pub total_taken: u64,
}

impl<T> RetrievalList<T> {
    /// Create a list that detects duplicates with `comparer`.
    ///
    /// `config.ignore_case` is not consulted here; case handling belongs to
    /// the comparer.
    #[must_use]
    pub fn with_comparer(config: &ListConfig, comparer: impl ValueComparer<T> + 'static) -> Self {
        Self::from_boxed(config, Box::new(comparer))
    }

    fn from_boxed(config: &ListConfig, comparer: Box<dyn ValueComparer<T>>) -> Self {
        Self {
            inner: Mutex::new(ListState {
                items: Vec::new(),
                name: config.name.clone(),
                unique_values: config.unique_values,
                order: config.retrieval_order,
                last_recorded: None,
                total_inserted: 0,
                total_duplicates: 0,
                total_taken: 0,
            }),
            comparer,
        }
    }

    /// Add `value` to the list.
    ///
    /// With uniqueness on, a value equal to any stored item (consumed items
    /// included) is silently dropped and `false` is returned. This is not an
    /// error and is deliberately not logged. Never fails.
    pub fn insert(&self, value: T) -> bool {
        let mut state = self.inner.lock();

        if state.unique_values && state.items.iter().any(|item| self.comparer.same(item.value(), &value)) {
            state.total_duplicates += 1;
            return false;
        }

        let recorded = state.next_stamp(Utc::now());
        state.items.push(MemoryItem::new(value, recorded));
        state.total_inserted += 1;
        true
    }

    /// Insert every value from `values`, returning how many were appended.
    pub fn extend<I: IntoIterator<Item = T>>(&self, values: I) -> usize {
        let mut added = 0;
        for value in values {
            if self.insert(value) {
                added += 1;
            }
        }
        added
    }

    /// Whether at least one item is unconsumed.
    #[must_use]
    pub fn has_unconsumed(&self) -> bool {
        self.inner.lock().items.iter().any(|item| !item.is_consumed())
    }

    /// Number of items already taken.
    #[must_use]
    pub fn count_consumed(&self) -> usize {
        self.inner.lock().items.iter().filter(|item| item.is_consumed()).count()
    }

    /// Number of items not yet taken.
    #[must_use]
    pub fn count_unconsumed(&self) -> usize {
        self.inner.lock().items.iter().filter(|item| !item.is_consumed()).count()
    }

    /// Number of items held, consumed or not.
    #[must_use]
    pub fn count_all(&self) -> usize {
        self.inner.lock().items.len()
    }

    /// Name of the list.
    #[must_use]
    pub fn name(&self) -> String {
        self.inner.lock().name.clone()
    }

    /// Rename the list.
    pub fn set_name(&self, name: impl Into<String>) {
        self.inner.lock().name = name.into();
    }

    /// Current retrieval order.
    #[must_use]
    pub fn order(&self) -> RetrievalOrder {
        self.inner.lock().order
    }

    /// Change the retrieval order. Applies to subsequent `take` calls.
    pub fn set_order(&self, order: RetrievalOrder) {
        self.inner.lock().order = order;
    }

    /// Whether duplicate values are refused.
    #[must_use]
    pub fn unique_values(&self) -> bool {
        self.inner.lock().unique_values
    }

    /// Turn uniqueness on or off for subsequent inserts. Items already
    /// stored are left as they are.
    pub fn set_unique_values(&self, unique_values: bool) {
        self.inner.lock().unique_values = unique_values;
    }

    /// Current statistics.
    #[must_use]
    pub fn stats(&self) -> ListStats {
        let state = self.inner.lock();
        let consumed = state.items.iter().filter(|item| item.is_consumed()).count();
        ListStats {
            name: state.name.clone(),
            total: state.items.len(),
            consumed,
            unconsumed: state.items.len() - consumed,
            total_inserted: state.total_inserted,
            total_duplicates: state.total_duplicates,
            total_taken: state.total_taken,
        }
    }
}

impl<T: Clone> RetrievalList<T> {
    /// Consume one item according to the retrieval order and return its value.
    ///
    /// # Errors
    /// Returns [`HarvestError::EmptyOrExhausted`] when no unconsumed item exists.
    pub fn take(&self) -> Result<T> {
        let mut state = self.inner.lock();

        let Some(index) = state.order.select(&state.items) else {
            debug!(list = %state.name, "Take on empty or exhausted list");
            return Err(HarvestError::EmptyOrExhausted {
                list: state.name.clone(),
            });
        };

        let now = Utc::now();
        let item = &mut state.items[index];
        item.mark_consumed(now);
        let value = item.value().clone();
        state.total_taken += 1;

        trace!(list = %state.name, index, order = %state.order, "Item consumed");
        Ok(value)
    }

    /// Snapshot of every item in storage order, consumed ones included.
    #[must_use]
    pub fn items(&self) -> Vec<MemoryItem<T>> {
        self.inner.lock().items.clone()
    }

    /// Values not yet consumed, in storage order. Does not consume them.
    #[must_use]
    pub fn unconsumed_values(&self) -> Vec<T> {
        self.inner
            .lock()
            .items
            .iter()
            .filter(|item| !item.is_consumed())
            .map(|item| item.value().clone())
            .collect()
    }
}

impl<T: ListValue> RetrievalList<T> {
    /// A list built from `config` alone.
    ///
    /// Text values honour `config.ignore_case`. For other values the flag
    /// has no meaning; setting it logs a warning and values compare with
    /// `PartialEq`.
    #[must_use]
    pub fn new(config: &ListConfig) -> Self {
        if config.ignore_case && !T::TEXTUAL {
            warn!(list = %config.name, "ignore_case has no effect on non-text values");
        }
        Self::from_boxed(config, T::comparer(config.ignore_case))
    }
}

impl<T: AsRef<str> + 'static> RetrievalList<T> {
    /// A list of any text-like values honouring `config.ignore_case`.
    #[must_use]
    pub fn text(config: &ListConfig) -> Self {
        Self::with_comparer(config, TextComparer::new(config.ignore_case))
    }
}

impl<T: ListValue> Default for RetrievalList<T> {
    fn default() -> Self {
        Self::new(&ListConfig::default())
    }
}

impl<T> std::fmt::Debug for RetrievalList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("RetrievalList")
            .field("name", &state.name)
            .field("unique_values", &state.unique_values)
            .field("order", &state.order)
            .field("items", &state.items.len())
            .finish_non_exhaustive()
    }
}

impl<T> ListState<T> {
    /// Recorded stamps strictly increase within a list, so FIFO/LIFO follow
    /// insertion order even when the clock is coarse or steps backwards.
    fn next_stamp(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        let stamp = match self.last_recorded {
            Some(last) if now <= last => last + TimeDelta::nanoseconds(1),
            _ => now,
        };
        self.last_recorded = Some(stamp);
        stamp
    }
}
