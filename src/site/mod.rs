//! Site profiles
//!
//! The crawl pipeline is generic; everything that differs between classifieds
//! sites (card selectors, field selectors, pagination URLs, link origin) lives
//! in a [`SiteProfile`]. The [`SiteRegistry`] picks the profile for a job.

mod matcher;
mod profile;

pub use matcher::matches_host;
pub use profile::SiteProfile;

use crate::config::Config;
use crate::{ConfigError, JobError};
use std::sync::Arc;
use url::Url;

/// All site profiles known to a crawler
#[derive(Debug, Clone)]
pub struct SiteRegistry {
    profiles: Vec<Arc<SiteProfile>>,
}

impl SiteRegistry {
    /// Compiles every profile declared in the configuration
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let profiles = config
            .sites
            .iter()
            .map(|site| SiteProfile::from_config(site).map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { profiles })
    }

    /// Looks a profile up by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<Arc<SiteProfile>> {
        self.profiles
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(name.trim()))
            .cloned()
    }

    /// Names of all registered profiles
    pub fn names(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.name()).collect()
    }

    /// Picks the profile for a job
    ///
    /// # Resolution Order
    ///
    /// 1. A profile whose name equals `site_identifier`
    /// 2. The first profile whose host patterns match the URL host
    ///
    /// # Returns
    ///
    /// * `Ok(Arc<SiteProfile>)` - The matching profile
    /// * `Err(JobError::UnsupportedSite)` - Neither rule matched
    pub fn resolve(&self, site_identifier: &str, url: &Url) -> Result<Arc<SiteProfile>, JobError> {
        if let Some(profile) = self.get(site_identifier) {
            return Ok(profile);
        }

        let host = url.host_str().unwrap_or_default();
        let by_host = self.profiles.iter().find(|p| p.serves_host(host)).cloned();

        match by_host {
            Some(profile) => {
                tracing::debug!(
                    "Site '{}' resolved to profile '{}' by host {}",
                    site_identifier,
                    profile.name(),
                    host
                );
                Ok(profile)
            }
            None => Err(JobError::UnsupportedSite(format!(
                "'{}' ({}); known sites: {}",
                site_identifier,
                url,
                self.names().join(", ")
            ))),
        }
    }
}
