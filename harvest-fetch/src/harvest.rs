//! Fetch → extract → deduplicate loops.
//!
//! [`harvest_into`] handles one page. [`crawl`] is the driving loop: it takes
//! URLs from a frontier [`RetrievalList`] until the list is exhausted,
//! queues newly found links back into the same list, and collects extracted
//! fragments into a sink list. Because consumed items stay in the frontier,
//! a page is never fetched twice even when every page links to every other.

use harvest_core::{ExtractOptions, HarvestError, Pattern, RetrievalList, Scraper};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::client::TextSource;
use crate::error::FetchError;
use crate::types::{DEFAULT_TIMEOUT_MS, FetchRequest};

/// Which fragments to carve out of a fetched page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestSpec {
    /// Start boundary.
    pub start: Pattern,
    /// End boundary.
    pub end: Pattern,
    /// Ordinals, cap and window.
    #[serde(default)]
    pub options: ExtractOptions,
}

impl HarvestSpec {
    /// Fragments from each `start` to its nearest `end`.
    #[must_use]
    pub fn nearest(start: Pattern, end: Pattern) -> Self {
        Self {
            start,
            end,
            options: ExtractOptions::nearest(),
        }
    }
}

/// Fetch `request`, extract fragments per `spec`, and insert their text into
/// `list`. Returns how many fragments were new to the list.
///
/// # Errors
/// - transport errors from `source`
/// - [`FetchError::Status`] for a non-2xx response
/// - [`FetchError::Extraction`] if a pattern does not compile
pub async fn harvest_into<S: TextSource + ?Sized>(
    source: &S,
    request: &FetchRequest,
    scraper: &Scraper,
    spec: &HarvestSpec,
    list: &RetrievalList<String>,
) -> Result<usize, FetchError> {
    let response = source.fetch(request).await?;
    if !response.is_success() {
        return Err(FetchError::Status {
            code: response.status_code,
            text: response.status_text,
        });
    }

    let added = insert_fragments(&response.content, scraper, spec, list)?;
    info!(url = %request.url, added, list = %list.name(), "Harvested page");
    Ok(added)
}

fn insert_fragments(
    text: &str,
    scraper: &Scraper,
    spec: &HarvestSpec,
    list: &RetrievalList<String>,
) -> Result<usize, HarvestError> {
    let fragments = scraper.extract(text, &spec.start, &spec.end, spec.options)?;
    Ok(list.extend(fragments.map(String::from)))
}

/// What a [`crawl`] follows and collects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlPlan {
    /// Link pattern. Capture group 1 is the link when present, otherwise the
    /// whole match.
    pub link: Pattern,
    /// Fragments to collect from every fetched page.
    #[serde(default)]
    pub fragments: Option<HarvestSpec>,
    /// Stop after this many fetch attempts; 0 is unbounded.
    #[serde(default)]
    pub max_pages: usize,
    /// Headers sent with every request.
    #[serde(default)]
    pub headers: Vec<(String, String)>,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl CrawlPlan {
    /// Follow links matching `link`, collecting nothing else.
    #[must_use]
    pub fn follow(link: Pattern) -> Self {
        Self {
            link,
            fragments: None,
            max_pages: 0,
            headers: Vec::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Also collect fragments.
    #[must_use]
    pub fn collecting(mut self, spec: HarvestSpec) -> Self {
        self.fragments = Some(spec);
        self
    }

    /// Cap the number of fetch attempts.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    fn request_for(&self, url: &str) -> FetchRequest {
        FetchRequest {
            url: url.to_string(),
            headers: self.headers.clone(),
            form_body: None,
            timeout_ms: self.timeout_ms,
        }
    }
}

/// Outcome of a [`crawl`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Pages fetched with a 2xx status.
    pub pages_fetched: usize,
    /// Fetches that failed or returned a non-2xx status.
    pub failures: usize,
    /// Links newly added to the frontier.
    pub links_queued: usize,
    /// Fragments newly added to the sink.
    pub fragments_added: usize,
}

/// Drain `frontier`, following links and collecting fragments into `sink`.
///
/// Failed pages are logged and counted, never retried.
///
/// # Errors
/// Returns [`FetchError::Extraction`] if a plan pattern does not compile;
/// this is checked before anything is fetched.
pub async fn crawl<S: TextSource + ?Sized>(
    source: &S,
    scraper: &Scraper,
    plan: &CrawlPlan,
    frontier: &RetrievalList<String>,
    sink: &RetrievalList<String>,
) -> Result<CrawlReport, FetchError> {
    let link_regex = scraper.resolve(&plan.link)?;
    if let Some(spec) = &plan.fragments {
        scraper.resolve(&spec.start)?;
        scraper.resolve(&spec.end)?;
    }

    let mut report = CrawlReport::default();
    while plan.max_pages == 0 || report.pages_fetched + report.failures < plan.max_pages {
        let Ok(url) = frontier.take() else {
            break;
        };

        let response = match source.fetch(&plan.request_for(&url)).await {
            Ok(resp) if resp.is_success() => resp,
            Ok(resp) => {
                warn!(url = %url, status = resp.status_code, "Skipping page");
                report.failures += 1;
                continue;
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Skipping page");
                report.failures += 1;
                continue;
            }
        };
        report.pages_fetched += 1;

        let base = if response.response_url.is_empty() {
            url.as_str()
        } else {
            response.response_url.as_str()
        };
        for caps in link_regex.captures_iter(&response.content) {
            let Some(raw) = caps.get(1).or_else(|| caps.get(0)) else {
                continue;
            };
            match resolve_link(base, raw.as_str()) {
                Some(link) => {
                    if frontier.insert(link) {
                        report.links_queued += 1;
                    }
                }
                None => debug!(link = raw.as_str(), "Unresolvable link"),
            }
        }

        if let Some(spec) = &plan.fragments {
            report.fragments_added += insert_fragments(&response.content, scraper, spec, sink)?;
        }
    }

    info!(
        pages = report.pages_fetched,
        failures = report.failures,
        links = report.links_queued,
        fragments = report.fragments_added,
        "Crawl finished"
    );
    Ok(report)
}

/// Resolve `link` against `base`, dropping any `#fragment` so that anchors
/// on the same page deduplicate.
#[must_use]
pub fn resolve_link(base: &str, link: &str) -> Option<String> {
    let mut url = match Url::parse(base) {
        Ok(base) => base.join(link).ok()?,
        Err(_) => Url::parse(link).ok()?,
    };
    url.set_fragment(None);
    Some(url.into())
}
