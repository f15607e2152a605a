//! Fetch → extract → dedup loops against an in-memory site.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use harvest_core::config::ListConfig;
use harvest_core::{ExtractOptions, Pattern, RetrievalList, RetrievalOrder, Scraper};
use harvest_fetch::{
    CrawlPlan, FetchError, FetchRequest, FetchResponse, HarvestSpec, TextSource, crawl, harvest_into,
};

/// Serves fixed pages; anything else is a 404. Counts every fetch.
struct FakeSite {
    pages: HashMap<String, String>,
    fetches: AtomicUsize,
}

impl FakeSite {
    fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, body)| ((*url).to_string(), (*body).to_string()))
                .collect(),
            fetches: AtomicUsize::new(0),
        }
    }

    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl TextSource for FakeSite {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        if request.url.contains("unreachable") {
            return Err(FetchError::Unavailable(request.url.clone()));
        }
        Ok(match self.pages.get(&request.url) {
            Some(body) => FetchResponse::ok(request.url.clone(), body.clone()),
            None => FetchResponse {
                status_code: 404,
                status_text: "Not Found".to_string(),
                response_url: request.url.clone(),
                ..FetchResponse::default()
            },
        })
    }
}

fn queue(name: &str) -> RetrievalList<String> {
    RetrievalList::new(&ListConfig::named(name).with_order(RetrievalOrder::Fifo))
}

fn href() -> Pattern {
    Pattern::new(r#"href="([^"]+)""#)
}

fn item_spec() -> HarvestSpec {
    HarvestSpec::nearest(Pattern::new("<li>"), Pattern::new("</li>"))
}

#[tokio::test]
async fn harvest_into_inserts_new_fragments_only() {
    let site = FakeSite::new(&[
        ("http://site.test/a", "<li>x</li><li>y</li><li>x</li>"),
        ("http://site.test/b", "<li>y</li><li>z</li>"),
    ]);
    let scraper = Scraper::default();
    let list = queue("items");

    let added = harvest_into(&site, &FetchRequest::get("http://site.test/a"), &scraper, &item_spec(), &list)
        .await
        .expect("page exists");
    assert_eq!(added, 2);

    let added = harvest_into(&site, &FetchRequest::get("http://site.test/b"), &scraper, &item_spec(), &list)
        .await
        .expect("page exists");
    assert_eq!(added, 1);

    assert_eq!(
        list.unconsumed_values(),
        vec!["<li>x</li>", "<li>y</li>", "<li>z</li>"]
    );
}

#[tokio::test]
async fn harvest_into_reports_http_status() {
    let site = FakeSite::new(&[]);
    let list = queue("items");

    let err = harvest_into(&site, &FetchRequest::get("http://site.test/missing"), &Scraper::default(), &item_spec(), &list)
        .await
        .expect_err("404");
    assert!(matches!(err, FetchError::Status { code: 404, .. }));
    assert_eq!(list.count_all(), 0);
}

#[tokio::test]
async fn harvest_into_surfaces_bad_patterns() {
    let site = FakeSite::new(&[("http://site.test/a", "<li>x</li>")]);
    let spec = HarvestSpec {
        start: Pattern::new("(unclosed"),
        end: Pattern::new("</li>"),
        options: ExtractOptions::default(),
    };

    let err = harvest_into(&site, &FetchRequest::get("http://site.test/a"), &Scraper::default(), &spec, &queue("items"))
        .await
        .expect_err("bad pattern");
    assert!(matches!(err, FetchError::Extraction(_)));
}

#[tokio::test]
async fn crawl_visits_each_page_once() {
    // Every page links to every other page, and to itself.
    let links = r#"<a href="/">home</a> <a href="/one">1</a> <a href="two#top">2</a>"#;
    let site = FakeSite::new(&[
        ("http://site.test/", links),
        ("http://site.test/one", links),
        ("http://site.test/two", links),
    ]);
    let scraper = Scraper::default();
    let frontier = queue("frontier");
    let sink = queue("sink");
    frontier.insert("http://site.test/".to_string());

    let report = crawl(&site, &scraper, &CrawlPlan::follow(href()), &frontier, &sink)
        .await
        .expect("valid plan");

    assert_eq!(report.pages_fetched, 3);
    assert_eq!(report.failures, 0);
    assert_eq!(report.links_queued, 2);
    assert_eq!(site.fetches(), 3);
    assert!(!frontier.has_unconsumed());
    assert_eq!(frontier.count_consumed(), 3);
    assert_eq!(sink.count_all(), 0);
}

#[tokio::test]
async fn crawl_collects_fragments_and_skips_failures() {
    let site = FakeSite::new(&[
        (
            "http://site.test/",
            r#"<ul><li>alpha</li><li>beta</li></ul> <a href="/gone">x</a> <a href="http://unreachable.test/">y</a> <a href="/next">z</a>"#,
        ),
        ("http://site.test/next", "<ul><li>beta</li><li>gamma</li></ul>"),
    ]);
    let scraper = Scraper::default();
    let frontier = queue("frontier");
    let sink = queue("sink");
    frontier.insert("http://site.test/".to_string());

    let plan = CrawlPlan::follow(href()).collecting(item_spec());
    let report = crawl(&site, &scraper, &plan, &frontier, &sink)
        .await
        .expect("valid plan");

    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.failures, 2);
    assert_eq!(report.fragments_added, 3);
    assert_eq!(
        sink.unconsumed_values(),
        vec!["<li>alpha</li>", "<li>beta</li>", "<li>gamma</li>"]
    );
}

#[tokio::test]
async fn crawl_respects_page_cap() {
    let site = FakeSite::new(&[
        ("http://site.test/1", r#"<a href="/2">"#),
        ("http://site.test/2", r#"<a href="/3">"#),
        ("http://site.test/3", r#"<a href="/4">"#),
    ]);
    let frontier = queue("frontier");
    frontier.insert("http://site.test/1".to_string());

    let report = crawl(
        &site,
        &Scraper::default(),
        &CrawlPlan::follow(href()).with_max_pages(2),
        &frontier,
        &queue("sink"),
    )
    .await
    .expect("valid plan");

    assert_eq!(report.pages_fetched, 2);
    assert_eq!(site.fetches(), 2);
    assert_eq!(frontier.unconsumed_values(), vec!["http://site.test/3"]);
}

#[tokio::test]
async fn crawl_rejects_bad_link_pattern_before_fetching() {
    let site = FakeSite::new(&[("http://site.test/", "")]);
    let frontier = queue("frontier");
    frontier.insert("http://site.test/".to_string());

    let result = crawl(
        &site,
        &Scraper::default(),
        &CrawlPlan::follow(Pattern::new("[unclosed")),
        &frontier,
        &queue("sink"),
    )
    .await;

    assert!(matches!(result, Err(FetchError::Extraction(_))));
    assert_eq!(site.fetches(), 0);
    assert!(frontier.has_unconsumed());
}
