//! Breadth-first crawl scheduling
//!
//! The [`Crawler`] exclusively owns the crawl state: the FIFO frontier of
//! discovered URLs, the visited set, and the page counter. Everything else —
//! fetching, extraction, persistence, reporting — is a stateless collaborator
//! it invokes.
//!
//! Scheduling invariants:
//! - FIFO dequeue yields breadth-first traversal order.
//! - A URL is marked visited before its fetch, so a failing fetch is never
//!   retried.
//! - Duplicates may transiently coexist in the frontier; the visited check at
//!   dequeue collapses them.
//! - Only successfully fetched-and-saved pages count toward the budget, and
//!   only they are followed by the inter-page delay.

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::crawler::parser::extract_refs;
use crate::output::{CrawlObserver, CrawlStats, SkipReason};
use crate::storage::{DownloadStatus, FsStore, MediaKind};
use crate::url::{extract_domain, in_scope};
use crate::{GrabError, Result, UrlError};
use reqwest::Client;
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use url::Url;

/// Crawl scheduler and owner of all crawl state
pub struct Crawler {
    config: Config,

    /// Host the crawl is restricted to
    scope: String,

    client: Client,
    store: FsStore,

    /// FIFO queue of discovered, not-yet-processed URLs
    frontier: VecDeque<Url>,

    /// URLs already dequeued and processed, successfully or not
    visited: HashSet<String>,

    /// Pages successfully fetched and saved this run
    pages_crawled: u32,

    stats: CrawlStats,
    observers: Vec<Box<dyn CrawlObserver>>,

    /// External stop flag; checked before each dequeue
    cancelled: Arc<AtomicBool>,
}

impl Crawler {
    /// Creates a crawler whose domain scope is the seed URL's host
    ///
    /// # Arguments
    ///
    /// * `seed` - A validated seed URL (see [`crate::url::validate_seed`])
    /// * `config` - The crawl configuration
    pub fn new(seed: Url, config: Config) -> Result<Self> {
        let scope = extract_domain(&seed).ok_or(GrabError::UrlError(UrlError::MissingHost))?;
        Self::with_scope(seed, scope, config)
    }

    /// Creates a crawler with an explicitly pinned domain scope
    ///
    /// A seed whose host differs from `scope` is dequeued once, skipped as
    /// off-domain, and the crawl ends with zero pages.
    pub fn with_scope(seed: Url, scope: String, config: Config) -> Result<Self> {
        let client = build_http_client(&config.user_agent, config.crawler.request_timeout())?;
        let store = FsStore::new(&config.output.root_dir);

        let mut frontier = VecDeque::new();
        frontier.push_back(seed);

        Ok(Self {
            config,
            scope,
            client,
            store,
            frontier,
            visited: HashSet::new(),
            pages_crawled: 0,
            stats: CrawlStats::default(),
            observers: Vec::new(),
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Registers an observer for crawl events
    pub fn add_observer(&mut self, observer: Box<dyn CrawlObserver>) {
        self.observers.push(observer);
    }

    /// Handle that stops the crawl when set
    ///
    /// Setting the flag stops new dequeues; the in-flight page completes
    /// normally.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// The host this crawl is restricted to
    pub fn domain_scope(&self) -> &str {
        &self.scope
    }

    /// Pages successfully crawled so far
    pub fn pages_crawled(&self) -> u32 {
        self.pages_crawled
    }

    /// Counters accumulated so far
    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    /// Runs the crawl until the budget is exhausted, the frontier drains, or
    /// the cancel flag is set
    ///
    /// # Returns
    ///
    /// The total number of pages successfully crawled.
    pub async fn run(&mut self) -> Result<u32> {
        tracing::info!(
            "Crawling domain {} (budget: {} pages)",
            self.scope,
            self.config.crawler.max_pages
        );

        while self.pages_crawled < self.config.crawler.max_pages {
            if self.cancelled.load(Ordering::Relaxed) {
                tracing::info!("Crawl cancelled, stopping before next dequeue");
                break;
            }

            let Some(url) = self.frontier.pop_front() else {
                tracing::debug!("Frontier empty");
                break;
            };

            // Both skip paths are budget-neutral and delay-free.
            if self.visited.contains(url.as_str()) {
                self.notify_skip(&url, SkipReason::AlreadyVisited);
                continue;
            }
            if !in_scope(&url, &self.scope) {
                self.notify_skip(&url, SkipReason::OffDomain);
                continue;
            }

            // Visited before the fetch: a failing URL is never retried.
            self.visited.insert(url.to_string());

            self.process_page(url).await?;
        }

        for observer in &self.observers {
            observer.on_finish(&self.stats);
        }
        tracing::info!("Crawl complete: {} pages", self.pages_crawled);

        Ok(self.pages_crawled)
    }

    /// Fetches, persists, and harvests one in-scope page
    async fn process_page(&mut self, url: Url) -> Result<()> {
        tracing::debug!("Fetching {}", url);

        let body = match fetch_page(&self.client, &url).await {
            Ok(body) => body,
            Err(e) => {
                // Permanent skip: no retry, no budget charge.
                self.stats.fetch_errors += 1;
                for observer in &self.observers {
                    observer.on_fetch_error(&url, &e);
                }
                return Ok(());
            }
        };

        self.store.save_page(&url, &body).await?;

        let refs = extract_refs(&body, &url);
        tracing::debug!(
            "{}: {} links, {} images, {} videos",
            url,
            refs.links.len(),
            refs.images.len(),
            refs.videos.len()
        );

        // Enqueue dedups against visited only; the frontier may briefly hold
        // the same URL more than once.
        for link in &refs.links {
            if !self.visited.contains(link.as_str()) {
                self.frontier.push_back(link.clone());
            }
        }

        self.download_all(&refs.images, MediaKind::Image).await;
        self.download_all(&refs.videos, MediaKind::Video).await;

        self.pages_crawled += 1;
        self.stats.pages_crawled = self.pages_crawled;
        for observer in &self.observers {
            observer.on_page_crawled(&url, self.pages_crawled);
        }

        tokio::time::sleep(self.config.crawler.crawl_delay()).await;

        Ok(())
    }

    /// Best-effort downloads for one media set
    async fn download_all(&mut self, urls: &HashSet<Url>, kind: MediaKind) {
        for media_url in urls {
            match self.store.download_media(&self.client, media_url, kind).await {
                DownloadStatus::Downloaded => {
                    self.stats.record_media(kind);
                    for observer in &self.observers {
                        observer.on_media_downloaded(media_url, kind);
                    }
                }
                DownloadStatus::AlreadyExists => {
                    tracing::debug!("[{}] exists, skipping {}", kind.label(), media_url);
                }
                DownloadStatus::Failed(e) => {
                    tracing::debug!("[{}] failed {}: {}", kind.label(), media_url, e);
                }
            }
        }
    }

    fn notify_skip(&mut self, url: &Url, reason: SkipReason) {
        self.stats.pages_skipped += 1;
        for observer in &self.observers {
            observer.on_skip(url, reason);
        }
    }
}
