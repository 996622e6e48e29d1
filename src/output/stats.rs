//! Run summaries
//!
//! Counts derived from a [`CrawlResult`], printed to stderr after a run so
//! that JSON written to stdout stays clean.

use crate::crawler::CrawlResult;
use crate::listing::ListingRecord;
use crate::state::StopReason;
use std::io::Write;

/// Crawl run summary
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Total number of records returned
    pub records: usize,

    /// Pages whose fetch completed
    pub pages_fetched: u32,

    /// Pages that contributed records
    pub pages_with_listings: u32,

    /// Records with a parsed price
    pub priced: usize,

    /// Records with a parsed surface
    pub with_area: usize,

    /// Records with a price per square meter
    pub with_price_per_area: usize,

    pub stop: StopReason,
}

impl RunSummary {
    pub fn from_result(result: &CrawlResult) -> Self {
        let count = |pred: fn(&ListingRecord) -> bool| {
            result.records.iter().filter(|r| pred(r)).count()
        };

        Self {
            records: result.records.len(),
            pages_fetched: result.pages_fetched,
            pages_with_listings: result.pages_with_listings,
            priced: count(|r| r.price.is_some()),
            with_area: count(|r| r.area.is_some()),
            with_price_per_area: count(|r| r.price_per_area.is_some()),
            stop: result.stop.clone(),
        }
    }
}

/// Writes a human-readable summary
pub fn write_summary<W: Write>(summary: &RunSummary, mut writer: W) -> std::io::Result<()> {
    writeln!(writer, "=== Crawl Summary ===")?;
    writeln!(writer, "  Listings: {}", summary.records)?;
    writeln!(
        writer,
        "  Pages: {} with listings, {} fetched",
        summary.pages_with_listings, summary.pages_fetched
    )?;
    writeln!(
        writer,
        "  Priced: {} ({:.1}%)",
        summary.priced,
        percentage(summary.priced, summary.records)
    )?;
    writeln!(
        writer,
        "  With area: {} ({:.1}%)",
        summary.with_area,
        percentage(summary.with_area, summary.records)
    )?;
    writeln!(writer, "  With price per m²: {}", summary.with_price_per_area)?;
    writeln!(writer, "  Stopped: {}", summary.stop)
}

/// Prints the summary to stderr
pub fn print_summary(summary: &RunSummary) {
    if let Err(e) = write_summary(summary, std::io::stderr().lock()) {
        tracing::warn!("Failed to print run summary: {}", e);
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total > 0 {
        (part as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}
