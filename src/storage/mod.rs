//! Filesystem persistence for crawled pages and downloaded media
//!
//! Pages are written content-addressed (`pages/<sha256(url)>.html`) so a
//! re-crawled URL overwrites its previous body deterministically. Media files
//! are named by the last segment of the URL path, with a hashed fallback, and
//! an existing destination file short-circuits the download entirely.

mod fs;

pub use fs::FsStore;

use thiserror::Error;

/// Errors raised while persisting page bodies
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Errors that can interrupt a single media download
///
/// These never escape the store: a failed download is reported as
/// [`DownloadStatus::Failed`] and the crawl moves on.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The two media categories harvested from pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Subdirectory this kind of media is stored under
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Image => "images",
            Self::Video => "videos",
        }
    }

    /// Short tag used in log lines
    pub fn label(&self) -> &'static str {
        match self {
            Self::Image => "IMG",
            Self::Video => "VID",
        }
    }
}

/// Outcome of a best-effort media download
#[derive(Debug)]
pub enum DownloadStatus {
    /// Fetched and written to disk
    Downloaded,
    /// A file with the derived name already exists; no request was made
    AlreadyExists,
    /// The fetch or write failed; the page's crawl is unaffected
    Failed(DownloadError),
}
