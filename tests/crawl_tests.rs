//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and a temporary
//! output directory to run full crawl cycles end-to-end.

use sitegrab::config::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use sitegrab::crawler::Crawler;
use sitegrab::storage::FsStore;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing under `output_root`
fn create_test_config(output_root: &std::path::Path, max_pages: u32) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_pages,
            crawl_delay_ms: 0, // No pacing in tests
            request_timeout_secs: 5,
        },
        user_agent: UserAgentConfig {
            name: "TestBot".to_string(),
            version: "1.0.0".to_string(),
        },
        output: OutputConfig {
            root_dir: output_root.display().to_string(),
        },
    }
}

/// Mounts a GET mock serving an HTML body at `route`
async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

fn seed_url(server: &MockServer) -> Url {
    Url::parse(&format!("{}/", server.uri())).expect("Failed to parse mock server URI")
}

fn count_files(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}

#[tokio::test]
async fn test_crawl_follows_in_domain_links_only() {
    let mock_server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    // Seed links two in-domain pages and one off-domain page.
    mount_page(
        &mock_server,
        "/",
        r#"<html><body>
        <a href="/page1">One</a>
        <a href="/page2">Two</a>
        <a href="http://off-domain.test/x">Elsewhere</a>
        </body></html>"#
            .to_string(),
    )
    .await;
    mount_page(&mock_server, "/page1", "<html><body>Page 1</body></html>".to_string()).await;
    mount_page(&mock_server, "/page2", "<html><body>Page 2</body></html>".to_string()).await;

    let config = create_test_config(out.path(), 10);
    let mut crawler = Crawler::new(seed_url(&mock_server), config).unwrap();
    let total = crawler.run().await.expect("Crawl failed");

    // Exactly seed + 2 in-domain pages; the off-domain link is skipped.
    assert_eq!(total, 3);
    assert_eq!(count_files(&out.path().join("pages")), 3);
    assert_eq!(crawler.stats().pages_skipped, 1);
}

#[tokio::test]
async fn test_budget_enforced() {
    let mock_server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    // A chain: / -> /p1 -> /p2. With budget 2, /p2 must never be requested.
    mount_page(&mock_server, "/", r#"<a href="/p1">next</a>"#.to_string()).await;
    mount_page(&mock_server, "/p1", r#"<a href="/p2">next</a>"#.to_string()).await;
    Mock::given(method("GET"))
        .and(path("/p2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(out.path(), 2);
    let mut crawler = Crawler::new(seed_url(&mock_server), config).unwrap();
    let total = crawler.run().await.expect("Crawl failed");

    assert_eq!(total, 2);
    assert_eq!(count_files(&out.path().join("pages")), 2);
}

#[tokio::test]
async fn test_failed_fetch_is_skipped_permanently() {
    let mock_server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    // /missing is linked from both pages but 404s; it must be fetched exactly
    // once (no retry, and the visited set blocks the second discovery).
    mount_page(
        &mock_server,
        "/",
        r#"<a href="/missing">gone</a><a href="/ok">ok</a>"#.to_string(),
    )
    .await;
    mount_page(&mock_server, "/ok", r#"<a href="/missing">gone again</a>"#.to_string()).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(out.path(), 10);
    let mut crawler = Crawler::new(seed_url(&mock_server), config).unwrap();
    let total = crawler.run().await.expect("Crawl failed");

    // The failed page never counts toward the budget.
    assert_eq!(total, 2);
    assert_eq!(crawler.stats().fetch_errors, 1);
    assert_eq!(count_files(&out.path().join("pages")), 2);
}

#[tokio::test]
async fn test_linked_cycle_processes_each_page_once() {
    let mock_server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    // / and /loop link each other (and /loop links itself).
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"<a href="/loop">loop</a>"#),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<a href="/">back</a><a href="/loop">self</a>"#),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(out.path(), 10);
    let mut crawler = Crawler::new(seed_url(&mock_server), config).unwrap();
    let total = crawler.run().await.expect("Crawl failed");

    assert_eq!(total, 2);
}

#[tokio::test]
async fn test_media_downloaded_and_deduped() {
    let mock_server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    // The same image is referenced from two pages; the existence check must
    // keep it to a single network fetch.
    mount_page(
        &mock_server,
        "/",
        r#"<a href="/p1">next</a><img src="/img/logo.png">"#.to_string(),
    )
    .await;
    mount_page(&mock_server, "/p1", r#"<img src="/img/logo.png">"#.to_string()).await;
    Mock::given(method("GET"))
        .and(path("/img/logo.png"))
        .respond_with(
            ResponseTemplate::new(200).set_body_bytes(vec![0x89, 0x50, 0x4E, 0x47]),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(out.path(), 10);
    let mut crawler = Crawler::new(seed_url(&mock_server), config).unwrap();
    let total = crawler.run().await.expect("Crawl failed");

    assert_eq!(total, 2);
    assert_eq!(crawler.stats().images_downloaded, 1);

    let logo = out.path().join("images").join("logo.png");
    assert_eq!(std::fs::read(&logo).unwrap(), vec![0x89, 0x50, 0x4E, 0x47]);
}

#[tokio::test]
async fn test_video_and_nested_sources_downloaded() {
    let mock_server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/",
        r#"<video src="/media/clip.mp4"><source src="/media/clip.webm"></video>"#.to_string(),
    )
    .await;
    for route in ["/media/clip.mp4", "/media/clip.webm"] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x00, 0x01]))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let config = create_test_config(out.path(), 10);
    let mut crawler = Crawler::new(seed_url(&mock_server), config).unwrap();
    crawler.run().await.expect("Crawl failed");

    assert_eq!(crawler.stats().videos_downloaded, 2);
    assert!(out.path().join("videos").join("clip.mp4").exists());
    assert!(out.path().join("videos").join("clip.webm").exists());
}

#[tokio::test]
async fn test_media_failure_does_not_fail_the_page() {
    let mock_server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_page(&mock_server, "/", r#"<img src="/broken.png">"#.to_string()).await;
    Mock::given(method("GET"))
        .and(path("/broken.png"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = create_test_config(out.path(), 10);
    let mut crawler = Crawler::new(seed_url(&mock_server), config).unwrap();
    let total = crawler.run().await.expect("Crawl failed");

    // The page still counts; the image is simply not downloaded.
    assert_eq!(total, 1);
    assert_eq!(crawler.stats().images_downloaded, 0);
    assert!(!out.path().join("images").join("broken.png").exists());
}

#[tokio::test]
async fn test_off_scope_seed_crawls_nothing() {
    let out = TempDir::new().unwrap();

    // Scope pinned to a different host: the seed is dequeued, skipped, and
    // no request is ever made (the host does not even resolve).
    let config = create_test_config(out.path(), 10);
    let mut crawler = Crawler::with_scope(
        Url::parse("http://unreachable.test/").unwrap(),
        "elsewhere.test".to_string(),
        config,
    )
    .unwrap();

    let total = crawler.run().await.expect("Crawl failed");
    assert_eq!(total, 0);
    assert_eq!(crawler.stats().pages_skipped, 1);
    assert_eq!(count_files(&out.path().join("pages")), 0);
}

#[tokio::test]
async fn test_cancellation_stops_before_next_dequeue() {
    let mock_server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_page(&mock_server, "/", r#"<a href="/p1">next</a>"#.to_string()).await;
    Mock::given(method("GET"))
        .and(path("/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(out.path(), 10);
    let mut crawler = Crawler::new(seed_url(&mock_server), config).unwrap();

    // Cancel before the run: nothing is dequeued at all.
    crawler.cancel_flag().store(true, std::sync::atomic::Ordering::Relaxed);
    let total = crawler.run().await.expect("Crawl failed");

    assert_eq!(total, 0);
    assert_eq!(count_files(&out.path().join("pages")), 0);
}

#[tokio::test]
async fn test_saved_pages_are_content_addressed() {
    let mock_server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_page(&mock_server, "/", "<html><body>hello</body></html>".to_string()).await;

    let config = create_test_config(out.path(), 10);
    let seed = seed_url(&mock_server);
    let mut crawler = Crawler::new(seed.clone(), config).unwrap();
    crawler.run().await.expect("Crawl failed");

    // The filename is the hex SHA-256 of the URL string.
    let store = FsStore::new(out.path());
    let expected = store.page_path(&seed);
    assert!(expected.exists());
    assert_eq!(
        std::fs::read_to_string(expected).unwrap(),
        "<html><body>hello</body></html>"
    );
}
