//! Text sources — the fetch seam and its HTTP implementation.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use harvest_core::config::FetchConfig;
use reqwest::header::{CONTENT_ENCODING, CONTENT_TYPE, HeaderName, HeaderValue, USER_AGENT};
use reqwest::{Client, Method};
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::types::{FetchRequest, FetchResponse, charset_of};

/// Anything that can turn a [`FetchRequest`] into raw text.
///
/// Implementations report transport failures as errors but return non-2xx
/// responses as ordinary [`FetchResponse`]s; callers inspect
/// [`FetchResponse::is_success`].
#[async_trait]
pub trait TextSource: Send + Sync {
    /// Fetch the text behind `request`.
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError>;
}

/// HTTP-backed [`TextSource`].
pub struct HttpFetcher {
    http: Client,
    user_agent: String,
}

impl HttpFetcher {
    /// Create a fetcher from configuration.
    ///
    /// # Errors
    /// Returns `FetchError::Config` if the HTTP client cannot be built.
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self {
            http,
            user_agent: config.user_agent.clone(),
        })
    }

    /// The user agent sent with header-less requests.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

#[async_trait]
impl TextSource for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
        let method = if request.form_body.is_some() { Method::POST } else { Method::GET };
        let mut builder = self
            .http
            .request(method, &request.url)
            .timeout(Duration::from_millis(request.timeout_ms));

        if request.headers.is_empty() {
            builder = builder.header(USER_AGENT, &self.user_agent);
        }
        for (name, value) in &request.headers {
            match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
                (Ok(name), Ok(value)) => builder = builder.header(name, value),
                _ => warn!(header = %name, "Skipping header that cannot be sent"),
            }
        }
        if let Some(body) = &request.form_body {
            builder = builder
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(body.clone());
        }

        let start = Instant::now();
        let resp = builder
            .send()
            .await
            .map_err(|e| request_error(request, e))?;

        let status = resp.status();
        let headers: Vec<(String, String)> = resp
            .headers()
            .iter()
            .filter_map(|(n, v)| v.to_str().ok().map(|v| (n.as_str().to_string(), v.to_string())))
            .collect();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let content_encoding = resp
            .headers()
            .get(CONTENT_ENCODING)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let content_length = resp.content_length();
        let response_url = resp.url().to_string();

        let content = resp.text().await.map_err(|e| request_error(request, e))?;

        debug!(
            url = %request.url,
            status = status.as_u16(),
            bytes = content.len(),
            latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Fetched"
        );

        Ok(FetchResponse {
            status_code: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            charset: content_type.as_deref().and_then(charset_of),
            content,
            content_type,
            content_encoding,
            content_length,
            headers,
            response_url,
        })
    }
}

/// Map a transport error, reporting timeouts with the request's own limit.
fn request_error(request: &FetchRequest, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        warn!(url = %request.url, "Fetch timed out after {}ms", request.timeout_ms);
        FetchError::Timeout(request.timeout_ms)
    } else {
        warn!(url = %request.url, "Fetch failed: {}", err);
        FetchError::from(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetcher_uses_configured_user_agent() {
        let config = FetchConfig {
            user_agent: "harvest-test/1.0".to_string(),
            timeout_ms: 1000,
        };
        let fetcher = HttpFetcher::new(&config).expect("client builds");
        assert_eq!(fetcher.user_agent(), "harvest-test/1.0");
    }

    #[tokio::test]
    async fn unreachable_host_is_an_error_not_a_panic() {
        let fetcher = HttpFetcher::new(&FetchConfig::default()).expect("client builds");
        // Port 9 (discard) on localhost is closed on any sane test machine.
        let result = fetcher
            .fetch(&FetchRequest::get("http://127.0.0.1:9/").with_timeout(500))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn malformed_url_is_an_error() {
        let fetcher = HttpFetcher::new(&FetchConfig::default()).expect("client builds");
        assert!(fetcher.fetch(&FetchRequest::get("not a url")).await.is_err());
    }

    #[tokio::test]
    async fn stalled_body_reports_the_request_timeout() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\npartial")
                .await
                .expect("write");
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let fetcher = HttpFetcher::new(&FetchConfig::default()).expect("client builds");
        let err = fetcher
            .fetch(&FetchRequest::get(format!("http://{addr}/")).with_timeout(300))
            .await
            .expect_err("body never completes");
        assert!(matches!(err, FetchError::Timeout(300)), "got {err:?}");
    }
}
