//! Listing-Sweep: a paginated classifieds crawler
//!
//! This crate walks the listing pages of a real-estate classifieds site,
//! pulls loosely structured fields out of each listing card, normalizes
//! prices and surfaces, and returns canonical records in page order.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod listing;
pub mod normalize;
pub mod output;
pub mod site;
pub mod state;

use thiserror::Error;

/// Main error type for a crawl job
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid job input: {0}")]
    Input(String),

    #[error("Unsupported site: {0}")]
    UnsupportedSite(String),

    #[error("No listings found at {url}: {reason}")]
    NoListings { url: String, reason: String },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Page task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Invalid crawl phase transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },
}

/// Coarse failure categories a caller can report to its users
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The job ran but produced no records
    NoListings,
    /// The job descriptor was rejected before any network activity
    MalformedInput,
    /// Anything else
    Unexpected,
}

impl JobError {
    /// Classifies this error for the caller layer
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NoListings { .. } => FailureKind::NoListings,
            Self::Input(_) | Self::UnsupportedSite(_) => FailureKind::MalformedInput,
            _ => FailureKind::Unexpected,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid host pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid CSS selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, CrawlJob, CrawlResult, Crawler};
pub use listing::ListingRecord;
pub use site::{SiteProfile, SiteRegistry};
pub use state::{CrawlPhase, StopReason};
