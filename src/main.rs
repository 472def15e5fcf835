//! Sitegrab main entry point
//!
//! Command-line interface for the sitegrab single-domain crawler.

use anyhow::Context;
use clap::Parser;
use sitegrab::config::{load_config, validate, Config};
use sitegrab::crawler::Crawler;
use sitegrab::output::{print_summary, LogReporter, ProgressRenderer};
use sitegrab::url::validate_seed;
use sitegrab::GrabError;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use tracing_subscriber::EnvFilter;

/// Sitegrab: a single-domain web crawler and media harvester
///
/// Starting from a seed URL, sitegrab crawls every page on the same host in
/// breadth-first order, saves the raw HTML, and downloads referenced images
/// and videos, up to a page budget.
#[derive(Parser, Debug)]
#[command(name = "sitegrab")]
#[command(version)]
#[command(about = "Single-domain web crawler and media harvester", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from (prompted interactively when omitted)
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of pages to crawl
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Delay between successfully crawled pages, in milliseconds
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Output directory for pages and media
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    // Seed URL: positional argument, or interactive prompt.
    let input = match &cli.url {
        Some(url) => url.clone(),
        None => prompt_for_url()?,
    };
    let seed = validate_seed(&input).map_err(|e| GrabError::InvalidSeed {
        input: input.trim().to_string(),
        reason: e.to_string(),
    })?;

    tracing::info!("Crawling site: {}", seed);

    let mut crawler = Crawler::new(seed, config.clone())?;
    crawler.add_observer(Box::new(LogReporter::new()));
    if !cli.quiet {
        crawler.add_observer(Box::new(ProgressRenderer::new(config.crawler.max_pages)));
    }

    // Ctrl-C stops new dequeues; the in-flight page drains normally.
    let cancelled = crawler.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing current page");
            cancelled.store(true, Ordering::Relaxed);
        }
    });

    crawler.run().await?;

    if !cli.quiet {
        print_summary(crawler.stats());
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitegrab=info,warn"),
            1 => EnvFilter::new("sitegrab=debug,info"),
            2 => EnvFilter::new("sitegrab=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Builds the effective configuration: defaults, then the optional TOML
/// file, then CLI flag overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(n) = cli.max_pages {
        config.crawler.max_pages = n;
    }
    if let Some(ms) = cli.delay_ms {
        config.crawler.crawl_delay_ms = ms;
    }
    if let Some(secs) = cli.timeout_secs {
        config.crawler.request_timeout_secs = secs;
    }
    if let Some(dir) = &cli.output {
        config.output.root_dir = dir.display().to_string();
    }

    // Flags can invalidate a valid file config; check the merged result.
    validate(&config).context("invalid configuration")?;

    Ok(config)
}

/// Reads the seed URL from stdin
fn prompt_for_url() -> anyhow::Result<String> {
    print!("Enter the URL to crawl: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("failed to read URL from stdin")?;

    Ok(line.trim().to_string())
}
