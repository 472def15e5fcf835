//! HTML extractor for hyperlinks and media references
//!
//! Extraction is best-effort by construction: the underlying parser accepts
//! arbitrary malformed markup, and any reference that fails to resolve is
//! dropped rather than failing the page.

use crate::url::resolve_url;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Absolute URL sets extracted from one page
#[derive(Debug, Clone, Default)]
pub struct PageRefs {
    /// Hyperlink targets (`<a href>`)
    pub links: HashSet<Url>,

    /// Image sources (`<img src>`)
    pub images: HashSet<Url>,

    /// Video sources (`<video src>` plus `<source src>` nested in a video)
    pub videos: HashSet<Url>,
}

/// Extracts links, images, and videos from HTML
///
/// All returned URLs are absolute, resolved against `base_url`.
///
/// # Link Extraction Rules
///
/// **Include:** every `<a href="...">` target.
///
/// **Exclude:** `javascript:`, `mailto:`, `tel:`, `data:` schemes,
/// fragment-only anchors, and anything that does not resolve to an
/// http/https URL.
///
/// Media sources get the same http/https restriction (so inline `data:`
/// images are never queued for download).
pub fn extract_refs(html: &str, base_url: &Url) -> PageRefs {
    let document = Html::parse_document(html);
    let mut refs = PageRefs::default();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(link) = resolve_link(href, base_url) {
                    refs.links.insert(link);
                }
            }
        }
    }

    if let Ok(selector) = Selector::parse("img[src]") {
        for element in document.select(&selector) {
            if let Some(src) = element.value().attr("src") {
                if let Some(image) = resolve_media(src, base_url) {
                    refs.images.insert(image);
                }
            }
        }
    }

    // A <video> may carry its source directly, in nested <source> children,
    // or both; all of them belong to the video set.
    if let Ok(video_selector) = Selector::parse("video") {
        let source_selector = Selector::parse("source[src]").ok();
        for video in document.select(&video_selector) {
            if let Some(src) = video.value().attr("src") {
                if let Some(resolved) = resolve_media(src, base_url) {
                    refs.videos.insert(resolved);
                }
            }
            if let Some(source_selector) = &source_selector {
                for source in video.select(source_selector) {
                    if let Some(src) = source.value().attr("src") {
                        if let Some(resolved) = resolve_media(src, base_url) {
                            refs.videos.insert(resolved);
                        }
                    }
                }
            }
        }
    }

    refs
}

/// Resolves a hyperlink href, filtering out non-navigable targets
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    // Fragment-only links are same-page anchors.
    if href.starts_with('#') {
        return None;
    }

    resolve_media(href, base_url)
}

/// Resolves a media source, keeping only http/https results
fn resolve_media(src: &str, base_url: &Url) -> Option<Url> {
    let resolved = resolve_url(src, base_url)?;
    match resolved.scheme() {
        "http" | "https" => Some(resolved),
        _ => None,
    }
}
