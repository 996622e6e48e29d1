//! Pagination controller
//!
//! Dispatches pages in ascending order under a concurrency cap, buffers
//! their outcomes by page index, and merges the pages before the first
//! positional gap once everything that can still contribute has resolved.

use crate::crawler::fetcher::{fetch_page, PageFetchOutcome};
use crate::crawler::job::CrawlJob;
use crate::crawler::parser::parse_page;
use crate::crawler::CrawlResult;
use crate::site::SiteProfile;
use crate::state::{CrawlPhase, PageBuffer, PageOutcome};
use crate::JobError;
use chrono::NaiveDate;
use reqwest::Client;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{AbortHandle, JoinError, JoinSet};
use url::Url;

/// Drives one crawl job from scheduling to its merged result
pub struct PaginationController {
    client: Client,
    job: CrawlJob,
    phase: CrawlPhase,
    buffer: PageBuffer,
    semaphore: Arc<Semaphore>,
    tasks: JoinSet<(u32, PageOutcome)>,
    in_flight: BTreeMap<u32, AbortHandle>,
    next_page: u32,
    pages_fetched: u32,
    retrieved_at: NaiveDate,
}

impl PaginationController {
    /// Creates a controller in the `Scheduling` phase
    pub fn new(client: Client, job: CrawlJob) -> Self {
        let semaphore = Arc::new(Semaphore::new(job.concurrency_limit()));
        let buffer = PageBuffer::new(job.max_pages());

        Self {
            client,
            job,
            phase: CrawlPhase::Scheduling,
            buffer,
            semaphore,
            tasks: JoinSet::new(),
            in_flight: BTreeMap::new(),
            next_page: 1,
            pages_fetched: 0,
            retrieved_at: chrono::Local::now().date_naive(),
        }
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Runs the job to completion
    ///
    /// # Phases
    ///
    /// 1. `Running`: dispatch pages while permits are free and the page can
    ///    still contribute; wait for a completion whenever the cap is reached
    /// 2. `Draining`: nothing new is dispatched; in-flight pages before the
    ///    stop point are awaited, those after it are aborted
    /// 3. `Done`: the buffer is merged in page order
    pub async fn run(mut self) -> Result<CrawlResult, JobError> {
        tracing::info!(
            "Crawling up to {} pages of {} (site '{}', concurrency {})",
            self.job.max_pages(),
            self.job.base_url(),
            self.job.site().name(),
            self.job.concurrency_limit()
        );

        self.transition(CrawlPhase::Running)?;

        while self.phase.accepts_dispatch() {
            self.dispatch_ready();

            if !self.has_pages_to_dispatch() {
                self.transition(CrawlPhase::Draining)?;
                break;
            }

            match self.tasks.join_next().await {
                Some(joined) => self.handle_completion(joined)?,
                None => {
                    self.transition(CrawlPhase::Draining)?;
                    break;
                }
            }
        }

        while let Some(joined) = self.tasks.join_next().await {
            self.handle_completion(joined)?;
        }

        debug_assert!(self.buffer.is_settled());
        self.transition(CrawlPhase::Done)?;
        debug_assert!(self.phase.is_terminal());

        let drained = self.buffer.drain();
        tracing::info!(
            "Collected {} listings from {} pages; stopped: {}",
            drained.records.len(),
            drained.pages_with_listings,
            drained.stop
        );

        Ok(CrawlResult {
            records: drained.records,
            pages_fetched: self.pages_fetched,
            pages_with_listings: drained.pages_with_listings,
            stop: drained.stop,
        })
    }

    fn transition(&mut self, next: CrawlPhase) -> Result<(), JobError> {
        if !self.phase.can_transition_to(next) {
            return Err(JobError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::debug!("Crawl phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }

    fn has_pages_to_dispatch(&self) -> bool {
        self.buffer.is_needed(self.next_page)
    }

    /// Spawns page tasks in ascending order until no permit is free
    fn dispatch_ready(&mut self) {
        while self.has_pages_to_dispatch() {
            let permit = match self.semaphore.clone().try_acquire_owned() {
                Ok(permit) => permit,
                Err(_) => break,
            };

            let page = self.next_page;
            let url = self.job.page_url(page);
            let client = self.client.clone();
            let profile = Arc::clone(self.job.site());
            let base_url = self.job.base_url().clone();
            let retrieved_at = self.retrieved_at;

            tracing::debug!("Dispatching page {}: {}", page, url);
            let handle = self.tasks.spawn(async move {
                let outcome =
                    fetch_and_parse(&client, page, &url, &base_url, &profile, retrieved_at).await;
                drop(permit);
                (page, outcome)
            });

            self.in_flight.insert(page, handle);
            self.next_page += 1;
        }
    }

    fn handle_completion(
        &mut self,
        joined: Result<(u32, PageOutcome), JoinError>,
    ) -> Result<(), JobError> {
        let (page, outcome) = match joined {
            Ok(result) => result,
            // Aborted because it lies past the stop point
            Err(e) if e.is_cancelled() => return Ok(()),
            Err(e) => return Err(JobError::Task(e)),
        };

        self.in_flight.remove(&page);
        self.pages_fetched += 1;
        log_outcome(page, &outcome);

        if !self.buffer.record(page, outcome) {
            tracing::warn!("Duplicate result for page {} ignored", page);
        }

        if let Some(stop) = self.buffer.stop_point() {
            self.abort_after(stop);
        }

        Ok(())
    }

    /// Aborts in-flight pages strictly after `stop`
    fn abort_after(&mut self, stop: u32) {
        let beyond = self.in_flight.split_off(&(stop + 1));
        for (page, handle) in beyond {
            tracing::debug!("Aborting page {} past stop point {}", page, stop);
            handle.abort();
        }
    }
}

async fn fetch_and_parse(
    client: &Client,
    page: u32,
    url: &str,
    base_url: &Url,
    profile: &SiteProfile,
    retrieved_at: NaiveDate,
) -> PageOutcome {
    match fetch_page(client, page, url).await {
        PageFetchOutcome::Success { body, .. } => {
            let page_url = Url::parse(url).unwrap_or_else(|_| base_url.clone());
            PageOutcome::from_records(parse_page(&body, profile, &page_url, retrieved_at))
        }
        PageFetchOutcome::NotFound { status_code, .. } => PageOutcome::NotFound { status_code },
        PageFetchOutcome::TransportError { cause, .. } => PageOutcome::TransportError { cause },
    }
}

fn log_outcome(page: u32, outcome: &PageOutcome) {
    match outcome {
        PageOutcome::Listings(records) => {
            tracing::info!("Scraped {} listings from page {}", records.len(), page)
        }
        PageOutcome::Empty => tracing::info!("No listings on page {}", page),
        PageOutcome::NotFound { status_code } => {
            tracing::warn!("Page {} returned HTTP {}", page, status_code)
        }
        PageOutcome::TransportError { cause } => {
            tracing::warn!("Page {} failed: {}", page, cause)
        }
    }
}
