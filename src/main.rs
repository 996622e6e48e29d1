//! Listing-Sweep main entry point
//!
//! This is the command-line interface for the Listing-Sweep crawler.

use anyhow::{bail, Context};
use clap::Parser;
use listing_sweep::config::{load_config_with_hash, Config};
use listing_sweep::output::{annotate, print_summary, write_json, Metadata, RunSummary};
use listing_sweep::{CrawlJob, Crawler, FailureKind, JobError, SiteRegistry};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit code when the crawl finished without a single listing
const EXIT_NO_LISTINGS: u8 = 2;

/// Exit code for rejected input (BSD `EX_USAGE`)
const EXIT_USAGE: u8 = 64;

/// Listing-Sweep: a paginated classifieds crawler
///
/// Walks the listing pages of a supported real-estate site, stops at the
/// first page without listings, and prints the normalized records as JSON.
#[derive(Parser, Debug)]
#[command(name = "listing-sweep")]
#[command(version)]
#[command(about = "A paginated classifieds crawler", long_about = None)]
struct Cli {
    /// First listing page to crawl
    #[arg(long, value_name = "URL")]
    url: String,

    /// Number of pages to crawl (defaults to the configured ceiling)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pages: Option<u32>,

    /// Site profile name; when omitted the URL host picks the profile
    #[arg(long, value_name = "ID")]
    site: Option<String>,

    /// Path to TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Metadata attached to every record (repeatable)
    #[arg(long = "meta", value_name = "KEY=VALUE")]
    meta: Vec<String>,

    /// Write JSON here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("listing_sweep=info,warn"),
            1 => EnvFilter::new("listing_sweep=debug,info"),
            2 => EnvFilter::new("listing_sweep=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Stdout carries the JSON output
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Maps a failure to the process exit code
fn exit_code(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<JobError>().map(JobError::kind) {
        Some(FailureKind::NoListings) => EXIT_NO_LISTINGS,
        Some(FailureKind::MalformedInput) => EXIT_USAGE,
        Some(FailureKind::Unexpected) | None => 1,
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Reject bad input before loading anything
    let metadata = parse_metadata(&cli.meta).map_err(|e| JobError::Input(format!("{:#}", e)))?;
    let config = load(cli.config.as_ref())?;

    let sites = SiteRegistry::from_config(&config).map_err(JobError::from)?;
    let pages = cli.pages.unwrap_or(config.crawler.max_pages_ceiling);
    let site = cli.site.unwrap_or_default();

    // Validate the job, then crawl
    let job = CrawlJob::new(&cli.url, pages, &site, &config, &sites)?;
    let result = Crawler::new(&config)?.crawl(&job).await?;

    if !cli.quiet {
        print_summary(&RunSummary::from_result(&result));
    }

    // Attach metadata and write JSON
    let listings = annotate(result.records, &metadata);
    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_json(&listings, BufWriter::new(file))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {} listings to {}", listings.len(), path.display());
        }
        None => write_json(&listings, std::io::stdout().lock()).context("Failed to write stdout")?,
    }

    Ok(())
}

/// Loads the configuration file, or the built-in defaults without one
fn load(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using built-in defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path).map_err(JobError::from)?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Parses repeated `key=value` arguments
fn parse_metadata(pairs: &[String]) -> anyhow::Result<Metadata> {
    let mut metadata = Metadata::new();

    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("metadata '{}' is not in key=value form", pair);
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("metadata '{}' has an empty key", pair);
        }
        metadata.insert(key.to_string(), value.trim().to_string());
    }

    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_metadata() {
        let pairs = vec![
            "city=Rabat".to_string(),
            "site_name = Mubawab".to_string(),
            "note=a=b".to_string(),
        ];
        let metadata = parse_metadata(&pairs).unwrap();
        assert_eq!(metadata["city"], "Rabat");
        assert_eq!(metadata["site_name"], "Mubawab");
        assert_eq!(metadata["note"], "a=b");
    }

    #[test]
    fn test_parse_metadata_rejects_malformed() {
        assert!(parse_metadata(&["city".to_string()]).is_err());
        assert!(parse_metadata(&["=Rabat".to_string()]).is_err());
    }

    #[test]
    fn test_exit_codes() {
        let no_listings = anyhow::Error::from(JobError::NoListings {
            url: "https://www.mubawab.ma".to_string(),
            reason: "no listings on page 1".to_string(),
        });
        assert_eq!(exit_code(&no_listings), EXIT_NO_LISTINGS);

        let input = anyhow::Error::from(JobError::Input("bad".to_string()));
        assert_eq!(exit_code(&input), EXIT_USAGE);

        assert_eq!(exit_code(&anyhow::anyhow!("disk full")), 1);
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "listing-sweep",
            "--url",
            "https://www.mubawab.ma/en/sc/offices-for-rent",
            "--pages",
            "3",
            "--meta",
            "city=Rabat",
            "--meta",
            "asset_type=office",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.pages, Some(3));
        assert_eq!(cli.meta.len(), 2);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_rejects_zero_pages() {
        let err = Cli::try_parse_from(["listing-sweep", "--url", "https://x.ma", "--pages", "0"]);
        assert!(err.is_err());
    }
}
