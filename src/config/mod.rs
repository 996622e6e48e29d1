//! Configuration module for Listing-Sweep
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every limit the crawler uses lives here and is passed down explicitly.
//!
//! # Example
//!
//! ```no_run
//! use listing_sweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sweep.toml")).unwrap();
//! println!("Page ceiling: {}", config.crawler.max_pages_ceiling);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    builtin_sites, Config, CrawlerConfig, SiteConfig, UserAgentConfig, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
