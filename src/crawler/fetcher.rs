//! HTTP fetcher implementation
//!
//! One GET per page, classified into a [`PageFetchOutcome`]. The fetcher
//! never retries and never builds page URLs; both belong to the pagination
//! controller.

use crate::config::{CrawlerConfig, UserAgentConfig};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Result of fetching one listing page
#[derive(Debug)]
pub enum PageFetchOutcome {
    /// HTTP 200 with a readable body
    Success {
        page_index: u32,
        body: String,
    },

    /// Any other HTTP status; the site has no such page
    NotFound {
        page_index: u32,
        status_code: u16,
    },

    /// DNS, connection, timeout or body read failure
    TransportError {
        page_index: u32,
        cause: String,
    },
}

impl PageFetchOutcome {
    pub fn page_index(&self) -> u32 {
        match self {
            Self::Success { page_index, .. }
            | Self::NotFound { page_index, .. }
            | Self::TransportError { page_index, .. } => *page_index,
        }
    }
}

/// Builds the HTTP client shared by every page of every job
///
/// # Arguments
///
/// * `user_agent` - Identity header configuration
/// * `crawler` - Timeouts
///
/// # Example
///
/// ```no_run
/// use listing_sweep::config::{CrawlerConfig, UserAgentConfig};
/// use listing_sweep::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.value.as_str())
        .timeout(Duration::from_secs(crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(crawler.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one page
///
/// # Classification
///
/// | Condition | Outcome |
/// |-----------|---------|
/// | HTTP 200 | Success |
/// | Any other status | NotFound |
/// | Timeout | TransportError ("Request timeout") |
/// | Connection failure | TransportError |
/// | Body read failure | TransportError |
pub async fn fetch_page(client: &Client, page_index: u32, url: &str) -> PageFetchOutcome {
    tracing::debug!("Fetching page {}: {}", page_index, url);

    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            return PageFetchOutcome::TransportError {
                page_index,
                cause: classify_transport_error(&e),
            }
        }
    };

    let status = response.status();
    if status != StatusCode::OK {
        return PageFetchOutcome::NotFound {
            page_index,
            status_code: status.as_u16(),
        };
    }

    match response.text().await {
        Ok(body) => PageFetchOutcome::Success { page_index, body },
        Err(e) => PageFetchOutcome::TransportError {
            page_index,
            cause: classify_transport_error(&e),
        },
    }
}

fn classify_transport_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else {
        error.to_string()
    }
}
