//! Crawler module for paginated listing sweeps
//!
//! This module contains the core crawling logic, including:
//! - Job validation and page-range clamping
//! - HTTP fetching and outcome classification
//! - Card parsing into listing records
//! - Concurrent pagination with a positional stop point

mod controller;
mod fetcher;
mod job;
mod parser;

pub use controller::PaginationController;
pub use fetcher::{build_http_client, fetch_page, PageFetchOutcome};
pub use job::CrawlJob;
pub use parser::parse_page;

use crate::config::Config;
use crate::listing::ListingRecord;
use crate::state::StopReason;
use crate::JobError;
use reqwest::Client;

/// Outcome of a successful crawl
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlResult {
    /// Listings of the pages before the stop point, page-ascending
    pub records: Vec<ListingRecord>,

    /// Pages whose fetch completed, including any past the stop point
    pub pages_fetched: u32,

    /// Pages that contributed records
    pub pages_with_listings: u32,

    /// Why the crawl ended where it did
    pub stop: StopReason,
}

/// Runs crawl jobs with one shared HTTP client
#[derive(Debug, Clone)]
pub struct Crawler {
    client: Client,
}

impl Crawler {
    /// Builds the HTTP client from the identity and timeout settings
    pub fn new(config: &Config) -> Result<Self, JobError> {
        let client = build_http_client(&config.user_agent, &config.crawler)?;
        Ok(Self { client })
    }

    /// Runs one job
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlResult)` - At least one listing was collected
    /// * `Err(JobError::NoListings)` - The run finished with zero records
    /// * `Err(JobError)` - A page task failed unexpectedly
    pub async fn crawl(&self, job: &CrawlJob) -> Result<CrawlResult, JobError> {
        let controller = PaginationController::new(self.client.clone(), job.clone());
        let result = controller.run().await?;

        if result.records.is_empty() {
            tracing::warn!("No listings collected from {}: {}", job.url(), result.stop);
            return Err(JobError::NoListings {
                url: job.url().to_string(),
                reason: result.stop.to_string(),
            });
        }

        Ok(result)
    }
}

/// Runs a complete crawl job
///
/// This is the main entry point for a single job. It will:
/// 1. Build the HTTP client
/// 2. Dispatch pages under the concurrency limit
/// 3. Stop at the first page, in page order, with no listings or a failed fetch
/// 4. Return the listings of the pages before it
///
/// # Arguments
///
/// * `job` - The validated job
/// * `config` - Identity header and timeouts
pub async fn crawl(job: &CrawlJob, config: &Config) -> Result<CrawlResult, JobError> {
    Crawler::new(config)?.crawl(job).await
}
