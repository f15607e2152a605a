//! Retrieval orders and the selection scan behind `take`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::item::MemoryItem;
use crate::error::HarvestError;

/// Which unconsumed item [`RetrievalList::take`](super::RetrievalList::take)
/// returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalOrder {
    /// The first unconsumed item in storage order.
    ///
    /// No shuffling takes place.
    #[default]
    Random,
    /// Earliest recorded item first (a queue).
    #[serde(alias = "queue")]
    Fifo,
    /// Latest recorded item first (a stack).
    #[serde(alias = "stack")]
    Lifo,
}

impl RetrievalOrder {
    /// Synonym for [`RetrievalOrder::Fifo`].
    pub const QUEUE: Self = Self::Fifo;
    /// Synonym for [`RetrievalOrder::Lifo`].
    pub const STACK: Self = Self::Lifo;

    /// Index of the item `take` should consume, or `None` when every item
    /// is consumed.
    ///
    /// One pass in storage order. Ties on the recorded stamp keep the
    /// earlier item.
    #[must_use]
    pub fn select<T>(self, items: &[MemoryItem<T>]) -> Option<usize> {
        let mut unconsumed = items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.is_consumed());

        match self {
            Self::Random => unconsumed.next().map(|(i, _)| i),
            Self::Fifo => unconsumed
                .reduce(|best, cur| if cur.1.recorded() < best.1.recorded() { cur } else { best })
                .map(|(i, _)| i),
            Self::Lifo => unconsumed
                .reduce(|best, cur| if cur.1.recorded() > best.1.recorded() { cur } else { best })
                .map(|(i, _)| i),
        }
    }
}

impl fmt::Display for RetrievalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random => write!(f, "random"),
            Self::Fifo => write!(f, "fifo"),
            Self::Lifo => write!(f, "lifo"),
        }
    }
}

impl FromStr for RetrievalOrder {
    type Err = HarvestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "fifo" | "queue" => Ok(Self::Fifo),
            "lifo" | "stack" => Ok(Self::Lifo),
            other => Err(HarvestError::Config(format!("unknown retrieval order: {other}"))),
        }
    }
}
