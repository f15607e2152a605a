//! # Harvest Core Library
//!
//! Regex-driven scraping helpers over raw text, plus a deduplicating work
//! list for the values they produce.
//!
//! - [`finder`] — every match of one pattern, or only the N-th one
//! - [`fragment`] — text carved between a start match and an end match,
//!   with an optional scan window and fragment cap
//! - [`Scraper`] — the two above behind a bounded compiled-pattern cache
//! - [`RetrievalList`] — stores values once, serves unconsumed values back
//!   in random (first-found), FIFO or LIFO order
//!
//! None of this builds a DOM. Fragments are plain substrings bounded by
//! regex matches and carry no guarantee of well-formed markup.
//!
//! ```text
//! raw text ──▶ Scraper::find / Scraper::extract ──▶ RetrievalList::insert
//!                                                        │
//!                         driving loop ◀── take() ◀──────┘
//! ```

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod config;
pub mod error;
pub mod finder;
pub mod fragment;
pub mod html;
pub mod metrics;
pub mod pattern;
pub mod retrieval;
pub mod scraper;
pub mod telemetry;
pub mod types;

pub use config::HarvestConfig;
pub use error::HarvestError;
pub use finder::Found;
pub use fragment::{ExtractOptions, Fragment, Fragments};
pub use pattern::Pattern;
pub use retrieval::{MemoryItem, RetrievalList, RetrievalOrder};
pub use scraper::Scraper;
pub use types::MatchSpan;
