use super::{DownloadError, DownloadStatus, MediaKind, StorageError};
use reqwest::Client;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use url::Url;

/// Flat-file store rooted at one output directory
///
/// Layout:
///
/// ```text
/// <root>/pages/<sha256(url)>.html
/// <root>/images/<basename-or-hash>
/// <root>/videos/<basename-or-hash>
/// ```
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Creates a store rooted at `root`; directories are created lazily on
    /// first write
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory page bodies are written under
    pub fn pages_dir(&self) -> PathBuf {
        self.root.join("pages")
    }

    /// Directory a given media kind is written under
    pub fn media_dir(&self, kind: MediaKind) -> PathBuf {
        self.root.join(kind.dir_name())
    }

    /// Hex-encoded SHA-256 of a URL string
    ///
    /// Used for page filenames and as the fallback media name, so the same
    /// URL always maps to the same file across runs.
    pub fn hash_name(text: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// The path a page body for `url` is persisted at
    pub fn page_path(&self, url: &Url) -> PathBuf {
        self.pages_dir()
            .join(format!("{}.html", Self::hash_name(url.as_str())))
    }

    /// Writes a page body, overwriting any previous content for the same URL
    ///
    /// # Arguments
    ///
    /// * `url` - The URL the content was fetched from (keys the filename)
    /// * `content` - The raw page body
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - The path the body was written to
    /// * `Err(StorageError)` - Directory creation or the write failed
    pub async fn save_page(&self, url: &Url, content: &str) -> Result<PathBuf, StorageError> {
        let dir = self.pages_dir();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| StorageError::CreateDir {
                path: dir.display().to_string(),
                source,
            })?;

        let path = self.page_path(url);
        tokio::fs::write(&path, content)
            .await
            .map_err(|source| StorageError::Write {
                path: path.display().to_string(),
                source,
            })?;

        Ok(path)
    }

    /// Destination filename for a media URL: the last path segment, or the
    /// URL hash when the path has no usable filename
    pub fn media_file_name(url: &Url) -> String {
        Path::new(url.path())
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .map(|name| name.to_string())
            .unwrap_or_else(|| Self::hash_name(url.as_str()))
    }

    /// Downloads a media URL to disk, best-effort
    ///
    /// Dedup is existence-based only: if a file with the derived name is
    /// already present, no request is made. Any error during the fetch or
    /// write is folded into [`DownloadStatus::Failed`]; it never fails the
    /// page being crawled.
    pub async fn download_media(
        &self,
        client: &Client,
        url: &Url,
        kind: MediaKind,
    ) -> DownloadStatus {
        let dir = self.media_dir(kind);
        if let Err(e) = tokio::fs::create_dir_all(&dir).await {
            return DownloadStatus::Failed(DownloadError::Io(e));
        }

        let path = dir.join(Self::media_file_name(url));
        if path.exists() {
            return DownloadStatus::AlreadyExists;
        }

        match stream_to_file(client, url, &path).await {
            Ok(()) => DownloadStatus::Downloaded,
            Err(e) => {
                // A partial file must not satisfy the existence check later.
                let _ = tokio::fs::remove_file(&path).await;
                DownloadStatus::Failed(e)
            }
        }
    }
}

/// Streams a response body chunk-by-chunk into a file
async fn stream_to_file(client: &Client, url: &Url, path: &Path) -> Result<(), DownloadError> {
    let response = client.get(url.clone()).send().await?;
    let mut response = response.error_for_status()?;

    let mut file = tokio::fs::File::create(path).await?;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_hash_name_is_hex_sha256() {
        let hash = FsStore::hash_name("http://example.com/");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_name_is_deterministic() {
        assert_eq!(
            FsStore::hash_name("http://example.com/a"),
            FsStore::hash_name("http://example.com/a")
        );
        assert_ne!(
            FsStore::hash_name("http://example.com/a"),
            FsStore::hash_name("http://example.com/b")
        );
    }

    #[test]
    fn test_page_path_uses_hash_and_html_extension() {
        let store = FsStore::new("/tmp/out");
        let path = store.page_path(&url("http://example.com/page"));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.ends_with(".html"));
        assert_eq!(name.len(), 64 + ".html".len());
        assert!(path.starts_with("/tmp/out/pages"));
    }

    #[test]
    fn test_media_file_name_from_path() {
        assert_eq!(
            FsStore::media_file_name(&url("http://example.com/img/logo.png")),
            "logo.png"
        );
    }

    #[test]
    fn test_media_file_name_ignores_query() {
        assert_eq!(
            FsStore::media_file_name(&url("http://example.com/img/logo.png?v=2")),
            "logo.png"
        );
    }

    #[test]
    fn test_media_file_name_falls_back_to_hash() {
        let name = FsStore::media_file_name(&url("http://example.com/"));
        assert_eq!(name.len(), 64);
    }

    #[tokio::test]
    async fn test_save_page_writes_content() {
        let dir = TempDir::new().unwrap();
        let store = FsStore::new(dir.path());
        let page_url = url("http://example.com/page");

        let path = store.save_page(&page_url, "<html>one</html>").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<html>one</html>");
    }

    #[tokio::test]
    async fn test_save_page_overwrites_not_appends() {
        let dir = TempDir::new().unwrap();
        let store = FsStore::new(dir.path());
        let page_url = url("http://example.com/page");

        store.save_page(&page_url, "first version").await.unwrap();
        let path = store.save_page(&page_url, "second").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
        // Still exactly one file for this URL.
        let count = std::fs::read_dir(store.pages_dir()).unwrap().count();
        assert_eq!(count, 1);
    }
}
