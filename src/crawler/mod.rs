//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with transient/fatal error classification
//! - HTML extraction of links and media references
//! - Breadth-first scheduling with budget and pacing

mod fetcher;
mod parser;
mod scheduler;

pub use fetcher::{build_http_client, fetch_page, FetchError, FetchErrorKind};
pub use parser::{extract_refs, PageRefs};
pub use scheduler::Crawler;

use crate::config::Config;
use crate::Result;
use url::Url;

/// Runs a complete crawl from a seed URL
///
/// The domain scope is the seed's host; the crawl runs until the page budget
/// is exhausted or the frontier drains.
///
/// # Arguments
///
/// * `seed` - A validated seed URL
/// * `config` - The crawl configuration
///
/// # Returns
///
/// * `Ok(u32)` - Total pages successfully crawled
/// * `Err(GrabError)` - Client construction or page persistence failed
pub async fn crawl(seed: Url, config: Config) -> Result<u32> {
    let mut crawler = Crawler::new(seed, config)?;
    crawler.run().await
}
