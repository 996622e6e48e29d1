//! State module for tracking pagination progress
//!
//! # Components
//!
//! - `CrawlPhase`: The controller's phase (scheduling, running, draining, done)
//! - `PageBuffer`: Write-once per-page outcomes and the positional stop point
//! - `StopReason`: Why the crawl ended where it did

mod crawl_phase;
mod page_buffer;

// Re-export main types
pub use crawl_phase::CrawlPhase;
pub use page_buffer::{DrainedPages, PageBuffer, PageOutcome, StopReason};
