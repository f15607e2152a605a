//! Request and response types for text fetches.

use serde::{Deserialize, Serialize};

/// Default per-request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// A request for raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    /// Target URL.
    pub url: String,
    /// Headers to send. When empty, the fetcher adds its default `User-Agent`.
    pub headers: Vec<(String, String)>,
    /// `application/x-www-form-urlencoded` body; its presence makes the request a POST.
    pub form_body: Option<String>,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl FetchRequest {
    /// A plain GET.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            form_body: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Add one header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add headers written as `"Name: value|Other: value"`.
    #[must_use]
    pub fn with_header_line(mut self, line: &str) -> Self {
        self.headers.extend(parse_header_line(line));
        self
    }

    /// Send `body` as a url-encoded form POST.
    #[must_use]
    pub fn with_form(mut self, body: impl Into<String>) -> Self {
        self.form_body = Some(body.into());
        self
    }

    /// Set the timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// `"POST"` when a form body is present, otherwise `"GET"`.
    #[must_use]
    pub fn method(&self) -> &'static str {
        if self.form_body.is_some() { "POST" } else { "GET" }
    }
}

/// Split a pipe-delimited header string into `(name, value)` pairs.
///
/// Only the first `:` separates name from value, so values such as URLs
/// survive intact. Entries without a name or a value are skipped.
#[must_use]
pub fn parse_header_line(line: &str) -> Vec<(String, String)> {
    line.split('|')
        .filter_map(|entry| {
            let (name, value) = entry.split_once(':')?;
            let (name, value) = (name.trim(), value.trim());
            (!name.is_empty() && !value.is_empty()).then(|| (name.to_string(), value.to_string()))
        })
        .collect()
}

/// The text and metadata returned by a fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResponse {
    /// Numeric HTTP status.
    pub status_code: u16,
    /// Reason phrase for the status.
    pub status_text: String,
    /// Response body as text.
    pub content: String,
    /// MIME type of the body.
    pub content_type: Option<String>,
    /// `Content-Encoding` header.
    pub content_encoding: Option<String>,
    /// Reported body length.
    pub content_length: Option<u64>,
    /// Character set taken from the content type.
    pub charset: Option<String>,
    /// All response headers.
    pub headers: Vec<(String, String)>,
    /// Final URL after redirects.
    pub response_url: String,
}

impl FetchResponse {
    /// A 200 response carrying `content`, as a test double would return.
    #[must_use]
    pub fn ok(url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            status_text: "OK".to_string(),
            content: content.into(),
            response_url: url.into(),
            ..Self::default()
        }
    }

    /// Whether the status is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// First header value with the given name, compared case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// The `charset=` parameter of a content type, if any.
#[must_use]
pub fn charset_of(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"').to_string())
    })
}
