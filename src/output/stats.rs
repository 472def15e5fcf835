//! Crawl statistics and the end-of-run summary

use crate::storage::MediaKind;

/// Counters accumulated over one crawl run
#[derive(Debug, Clone, Copy, Default)]
pub struct CrawlStats {
    /// Pages successfully fetched and saved
    pub pages_crawled: u32,

    /// Dequeued URLs dropped without fetching (visited or off-domain)
    pub pages_skipped: u64,

    /// Pages permanently dropped after a failed fetch
    pub fetch_errors: u64,

    /// Images freshly downloaded
    pub images_downloaded: u64,

    /// Videos freshly downloaded
    pub videos_downloaded: u64,
}

impl CrawlStats {
    /// Records one fresh media download
    pub fn record_media(&mut self, kind: MediaKind) {
        match kind {
            MediaKind::Image => self.images_downloaded += 1,
            MediaKind::Video => self.videos_downloaded += 1,
        }
    }

    /// Total media files freshly downloaded
    pub fn media_downloaded(&self) -> u64 {
        self.images_downloaded + self.videos_downloaded
    }
}

/// Prints the end-of-run summary to stdout
pub fn print_summary(stats: &CrawlStats) {
    println!("\nCrawl Summary");
    println!("=============");
    println!("Pages crawled:     {}", stats.pages_crawled);
    println!("Pages skipped:     {}", stats.pages_skipped);
    println!("Fetch errors:      {}", stats.fetch_errors);
    println!("Images downloaded: {}", stats.images_downloaded);
    println!("Videos downloaded: {}", stats.videos_downloaded);
}
