//! Fetch error types.

use harvest_core::HarvestError;
use thiserror::Error;

/// Errors that can occur while fetching or harvesting a page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("Fetch request failed: {0}")]
    RequestFailed(String),

    /// Request timed out.
    #[error("Fetch request timed out after {0}ms")]
    Timeout(u64),

    /// Remote host could not be reached.
    #[error("Source unavailable: {0}")]
    Unavailable(String),

    /// The server answered with a non-success status.
    #[error("HTTP {code}: {text}")]
    Status {
        /// Numeric status code.
        code: u16,
        /// Reason phrase, if any.
        text: String,
    },

    /// A header name or value could not be sent.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Client construction or URL error.
    #[error("Fetch configuration error: {0}")]
    Config(String),

    /// Pattern compilation failed while extracting from fetched text.
    #[error(transparent)]
    Extraction(#[from] HarvestError),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        // The limit is unknown here; `client` maps timeouts with the request's own.
        if err.is_timeout() {
            FetchError::Timeout(0)
        } else if err.is_connect() {
            FetchError::Unavailable(err.to_string())
        } else if err.is_builder() {
            FetchError::Config(err.to_string())
        } else {
            FetchError::RequestFailed(err.to_string())
        }
    }
}
