//! # harvest-fetch — Text Fetch Collaborator for Harvest
//!
//! The core library never touches the network. This crate supplies raw
//! text to it:
//!   - [`TextSource`] — the seam: anything that turns a request into text
//!   - [`HttpFetcher`] — a `reqwest`-backed source (GET, or form POST)
//!   - [`harvest_into`] — fetch one page, extract fragments, queue them
//!   - [`crawl`] — drain a frontier list, following links until exhausted
//!
//! There is no retry, throttling or cookie/session handling. A failed
//! fetch is reported once and the caller decides what to do next.
//!
//! ```text
//! frontier.take() ──▶ TextSource::fetch ──▶ link regex ──────────▶ frontier.insert
//!                                       └─▶ Scraper::extract ────────▶ sink.insert
//! ```

pub mod client;
pub mod error;
pub mod harvest;
pub mod types;

pub use client::{HttpFetcher, TextSource};
pub use error::FetchError;
pub use harvest::{CrawlPlan, CrawlReport, HarvestSpec, crawl, harvest_into};
pub use types::{FetchRequest, FetchResponse};
