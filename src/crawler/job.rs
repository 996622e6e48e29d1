use crate::config::Config;
use crate::site::{SiteProfile, SiteRegistry};
use crate::JobError;
use std::sync::Arc;
use url::Url;

/// An immutable description of one crawl
///
/// Everything a run needs is resolved up front: the base URL is parsed, the
/// page count is clamped to the configured ceiling, and the site profile is
/// picked. Bad input is rejected here, before any request is made.
#[derive(Debug, Clone)]
pub struct CrawlJob {
    url: String,
    base_url: Url,
    max_pages: u32,
    concurrency_limit: usize,
    site_identifier: String,
    site: Arc<SiteProfile>,
}

impl CrawlJob {
    /// Validates and builds a job
    ///
    /// # Arguments
    ///
    /// * `url` - First listing page; later pages are derived from it
    /// * `pages` - Requested number of pages, clamped to `max-pages-ceiling`
    /// * `site_identifier` - Site name, or any label when the host identifies the site
    /// * `config` - Crawler limits
    /// * `sites` - Known site profiles
    ///
    /// # Errors
    ///
    /// * `JobError::Input` - The URL is not absolute http(s) or `pages` is zero
    /// * `JobError::UnsupportedSite` - No profile matches the identifier or host
    pub fn new(
        url: &str,
        pages: u32,
        site_identifier: &str,
        config: &Config,
        sites: &SiteRegistry,
    ) -> Result<Self, JobError> {
        let base_url = parse_base_url(url)?;

        if pages == 0 {
            return Err(JobError::Input(
                "page count must be a positive integer".to_string(),
            ));
        }

        let ceiling = config.crawler.max_pages_ceiling.max(1);
        let max_pages = pages.min(ceiling);
        if max_pages < pages {
            tracing::info!(
                "Requested {} pages, clamped to the ceiling of {}",
                pages,
                ceiling
            );
        }

        let site = sites.resolve(site_identifier, &base_url)?;

        Ok(Self {
            url: url.trim().to_string(),
            base_url,
            max_pages,
            concurrency_limit: config.crawler.concurrency_limit.max(1) as usize,
            site_identifier: site_identifier.to_string(),
            site,
        })
    }

    /// The URL as the caller gave it, trimmed
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Number of pages after clamping
    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    pub fn concurrency_limit(&self) -> usize {
        self.concurrency_limit
    }

    /// The identifier the caller supplied
    pub fn site_identifier(&self) -> &str {
        &self.site_identifier
    }

    pub fn site(&self) -> &Arc<SiteProfile> {
        &self.site
    }

    /// URL of page `page` (1-based) of this job
    pub fn page_url(&self, page: u32) -> String {
        self.site.page_url(&self.url, page)
    }
}

fn parse_base_url(url: &str) -> Result<Url, JobError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(JobError::Input("URL is empty".to_string()));
    }

    let parsed = Url::parse(url).map_err(|e| JobError::Input(format!("'{}': {}", url, e)))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(JobError::Input(format!(
            "'{}': only http and https URLs can be crawled",
            url
        )));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(JobError::Input(format!("'{}': URL has no host", url)));
    }

    Ok(parsed)
}
