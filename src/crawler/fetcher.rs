//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the shared HTTP client with the browser User-Agent and timeout
//! - GET requests returning the raw body
//! - Error classification (timeout vs. other network failures)
//!
//! There is no retry. Any status code with a body counts as a fetch success.

use crate::SpiderError;
use reqwest::Client;
use std::time::Duration;

/// A successful HTTP response
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// URL after redirects
    pub final_url: String,

    /// HTTP status code
    pub status_code: u16,

    /// Raw response body
    pub body: Vec<u8>,
}

/// Builds the HTTP client shared by all workers
///
/// `timeout` bounds the whole request, from connecting to reading the last
/// byte of the body.
///
/// # Example
///
/// ```no_run
/// use keyspider::config::DEFAULT_USER_AGENT;
/// use keyspider::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(DEFAULT_USER_AGENT, Duration::from_secs(3)).unwrap();
/// ```
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches `url` with a single GET request
///
/// # Errors
///
/// * `SpiderError::Timeout` - the request did not finish within the client timeout
/// * `SpiderError::Http` - any other failure: bad URL, DNS, connection, body read
pub async fn fetch_url(client: &Client, url: &str) -> Result<FetchResponse, SpiderError> {
    let classify = |source: reqwest::Error| {
        if source.is_timeout() {
            SpiderError::Timeout {
                url: url.to_string(),
            }
        } else {
            SpiderError::Http {
                url: url.to_string(),
                source,
            }
        }
    };

    let response = client.get(url).send().await.map_err(classify)?;

    let final_url = response.url().to_string();
    let status_code = response.status().as_u16();
    if !response.status().is_success() {
        tracing::debug!("{} answered HTTP {}, keeping body", url, status_code);
    }

    let body = response.bytes().await.map_err(classify)?.to_vec();

    Ok(FetchResponse {
        final_url,
        status_code,
        body,
    })
}
