//! Observer interface for crawl events

use crate::crawler::FetchError;
use crate::output::CrawlStats;
use crate::storage::MediaKind;
use std::fmt;
use url::Url;

/// Why a dequeued URL was skipped without fetching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Already dequeued and processed earlier this run
    AlreadyVisited,
    /// Host does not match the crawl's domain scope
    OffDomain,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyVisited => write!(f, "already visited"),
            Self::OffDomain => write!(f, "off-domain"),
        }
    }
}

/// Receiver for scheduler events
///
/// All methods default to no-ops, so implementations override only the
/// events they render. Nothing returned here reaches the scheduler: an
/// observer cannot gate scheduling decisions.
pub trait CrawlObserver: Send {
    /// A page was fetched, saved, and harvested; `pages_crawled` is the new
    /// counter value
    fn on_page_crawled(&self, _url: &Url, _pages_crawled: u32) {}

    /// A media file was freshly downloaded (existence-check skips do not fire)
    fn on_media_downloaded(&self, _url: &Url, _kind: MediaKind) {}

    /// A dequeued URL was dropped without fetching
    fn on_skip(&self, _url: &Url, _reason: SkipReason) {}

    /// A page fetch failed; the URL is permanently dropped
    fn on_fetch_error(&self, _url: &Url, _error: &FetchError) {}

    /// The crawl loop ended (budget, empty frontier, or cancellation)
    fn on_finish(&self, _stats: &CrawlStats) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(SkipReason::AlreadyVisited.to_string(), "already visited");
        assert_eq!(SkipReason::OffDomain.to_string(), "off-domain");
    }

    #[test]
    fn test_default_methods_are_noops() {
        struct Silent;
        impl CrawlObserver for Silent {}

        let observer = Silent;
        let url = Url::parse("http://example.com/").unwrap();
        observer.on_page_crawled(&url, 1);
        observer.on_skip(&url, SkipReason::OffDomain);
        observer.on_finish(&CrawlStats::default());
    }
}
