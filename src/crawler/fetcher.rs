//! HTTP fetcher implementation
//!
//! One `reqwest::Client` is built at startup with the identifying user agent
//! and the configured per-request timeout. `fetch_page` performs a single GET
//! with no retries: retry policy belongs to the scheduler, and this crawler
//! deliberately has none (a failed page is permanently dropped).

use crate::config::UserAgentConfig;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Classification of a fetch failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Timeouts and connection-level failures; a later attempt might succeed
    Transient,
    /// Non-success HTTP statuses and undecodable bodies
    Fatal,
}

/// A failed page fetch
///
/// The scheduler treats every variant the same way (skip the page, keep
/// crawling); the classification feeds logs and observer events only.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Request timeout")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Failed to read body: {0}")]
    Body(String),

    #[error("Request failed: {0}")]
    Other(String),
}

impl FetchError {
    /// Whether the failure is transient or fatal
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::Timeout | Self::Connect(_) => FetchErrorKind::Transient,
            Self::Status(_) | Self::Body(_) | Self::Other(_) => FetchErrorKind::Fatal,
        }
    }

    /// The HTTP status code, when the failure was a status response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status(code) => Some(*code),
            _ => None,
        }
    }
}

/// Builds the HTTP client used for all page and media requests
///
/// # Arguments
///
/// * `user_agent` - Identification sent as the User-Agent header
/// * `timeout` - Fixed per-request timeout
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page body as text
///
/// A single GET request; redirects are followed by the client. Any network
/// error, timeout, or non-2xx status is returned as a [`FetchError`].
pub async fn fetch_page(client: &Client, url: &Url) -> Result<String, FetchError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(classify_request_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    response
        .text()
        .await
        .map_err(|e| FetchError::Body(e.to_string()))
}

fn classify_request_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_connect() {
        FetchError::Connect(e.to_string())
    } else {
        FetchError::Other(e.to_string())
    }
}
