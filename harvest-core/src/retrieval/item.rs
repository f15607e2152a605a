//! A stored value with its insertion and consumption stamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An item retained in a [`RetrievalList`](super::RetrievalList).
///
/// Items are never removed from their list; consuming one only sets its
/// `consumed` stamp, so uniqueness checks still see it afterwards.
///
/// ```text
/// Unconsumed ──take()──▶ Consumed(at)   (terminal)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryItem<T> {
    value: T,
    recorded: DateTime<Utc>,
    consumed: Option<DateTime<Utc>>,
}

impl<T> MemoryItem<T> {
    pub(crate) fn new(value: T, recorded: DateTime<Utc>) -> Self {
        Self {
            value,
            recorded,
            consumed: None,
        }
    }

    /// The stored value.
    #[must_use]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Unwrap the stored value.
    #[must_use]
    pub fn into_value(self) -> T {
        self.value
    }

    /// When the item was inserted.
    #[must_use]
    pub fn recorded(&self) -> DateTime<Utc> {
        self.recorded
    }

    /// When the item was taken, if it has been.
    #[must_use]
    pub fn consumed(&self) -> Option<DateTime<Utc>> {
        self.consumed
    }

    /// Whether the item has been taken.
    #[must_use]
    pub fn is_consumed(&self) -> bool {
        self.consumed.is_some()
    }

    /// Stamp the item as consumed. A second call leaves the first stamp in
    /// place and returns `false`.
    pub(crate) fn mark_consumed(&mut self, at: DateTime<Utc>) -> bool {
        if self.consumed.is_some() {
            return false;
        }
        self.consumed = Some(at);
        true
    }
}
