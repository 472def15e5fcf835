//! Console event reporting via tracing

use super::{CrawlObserver, CrawlStats, SkipReason};
use crate::crawler::{FetchError, FetchErrorKind};
use crate::storage::MediaKind;
use url::Url;

/// Logs every crawl event as a tracing event
#[derive(Debug, Default)]
pub struct LogReporter;

impl LogReporter {
    pub fn new() -> Self {
        Self
    }
}

impl CrawlObserver for LogReporter {
    fn on_page_crawled(&self, url: &Url, pages_crawled: u32) {
        tracing::info!("[PAGE] {} ({} crawled)", url, pages_crawled);
    }

    fn on_media_downloaded(&self, url: &Url, kind: MediaKind) {
        tracing::info!("[{}] {}", kind.label(), url);
    }

    fn on_skip(&self, url: &Url, reason: SkipReason) {
        tracing::info!("[SKIP] {} ({})", url, reason);
    }

    fn on_fetch_error(&self, url: &Url, error: &FetchError) {
        let kind = match error.kind() {
            FetchErrorKind::Transient => "transient",
            FetchErrorKind::Fatal => "fatal",
        };
        tracing::warn!("[ERROR] {} -> {} ({})", url, error, kind);
    }

    fn on_finish(&self, stats: &CrawlStats) {
        tracing::info!(
            "Crawling complete! Total pages crawled: {}",
            stats.pages_crawled
        );
    }
}
