//! Progress bar rendering for crawl events

use super::{CrawlObserver, CrawlStats};
use crate::storage::MediaKind;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicU64, Ordering};
use url::Url;

/// Renders crawl progress as a terminal bar
///
/// Pure subscriber: it tracks a media counter for display purposes only and
/// holds no scheduling state.
pub struct ProgressRenderer {
    bar: ProgressBar,
    media_downloaded: AtomicU64,
}

impl ProgressRenderer {
    /// Creates a bar sized to the page budget
    pub fn new(page_budget: u32) -> Self {
        let bar = ProgressBar::new(page_budget as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pages {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        Self {
            bar,
            media_downloaded: AtomicU64::new(0),
        }
    }
}

impl CrawlObserver for ProgressRenderer {
    fn on_page_crawled(&self, url: &Url, pages_crawled: u32) {
        self.bar.set_position(pages_crawled as u64);

        // Truncate safely on char boundaries for display.
        let display_url = if url.as_str().chars().count() > 40 {
            let truncated: String = url.as_str().chars().take(37).collect();
            format!("{}...", truncated)
        } else {
            url.as_str().to_string()
        };

        let media = self.media_downloaded.load(Ordering::Relaxed);
        self.bar.set_message(format!("{} media | {}", media, display_url));
    }

    fn on_media_downloaded(&self, _url: &Url, _kind: MediaKind) {
        self.media_downloaded.fetch_add(1, Ordering::Relaxed);
    }

    fn on_finish(&self, stats: &CrawlStats) {
        self.bar.finish_with_message(format!(
            "done: {} pages, {} media",
            stats.pages_crawled,
            stats.media_downloaded()
        ));
    }
}
