// Tests for crawl functionality

use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use warcrawl_core::archive::Archive;
use warcrawl_core::crawl::{CrawlOptions, CrawlProgressCallback, execute_crawl, extract_url_path};
use warcrawl_scanner::Whitelist;

// ============================================================================
// URL Path Extraction Tests
// ============================================================================

#[test]
fn test_extract_url_path_root() {
    assert_eq!(extract_url_path("http://example.com/"), "/");
    assert_eq!(extract_url_path("http://example.com"), "/");
}

#[test]
fn test_extract_url_path_nested() {
    assert_eq!(extract_url_path("http://example.com/css/site.css"), "/css/site.css");
}

#[test]
fn test_extract_url_path_drops_query_and_fragment() {
    assert_eq!(extract_url_path("http://example.com/page?key=value#top"), "/page");
}

#[test]
fn test_extract_url_path_with_port() {
    assert_eq!(extract_url_path("http://example.com:8080/fonts/a.woff2"), "/fonts/a.woff2");
}

#[test]
fn test_extract_url_path_invalid_url() {
    let url = "not a valid url";
    // Should return original string for invalid URLs
    assert_eq!(extract_url_path(url), url);
}

// ============================================================================
// Crawl Execution Tests
// ============================================================================

#[tokio::test]
async fn test_execute_crawl_records_failures_in_archive_session() {
    let temp_dir = TempDir::new().unwrap();
    let archive_path = temp_dir.path().join("archive.db");

    // Nothing listens on the discard port, so the single seed fails to fetch.
    let options = CrawlOptions {
        seeds: vec!["http://127.0.0.1:9/".to_string()],
        whitelist: Whitelist::from_hosts(["127.0.0.1"]),
        archive_path: Some(archive_path.clone()),
        timeout_secs: 2,
        show_progress_bars: false,
    };

    let report = execute_crawl(options, None).await.unwrap();
    assert_eq!(report.pages.len(), 1);
    assert!(report.pages[0].error.is_some());

    let archive = Archive::new(&archive_path).unwrap();
    assert!(archive.lookup("http://127.0.0.1:9/").unwrap().is_none());
}

#[tokio::test]
async fn test_execute_crawl_reports_progress() {
    let messages: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let messages_clone = messages.clone();

    let options = CrawlOptions {
        seeds: vec!["http://127.0.0.1:9/".to_string()],
        whitelist: Whitelist::from_hosts(["127.0.0.1"]),
        archive_path: None,
        timeout_secs: 2,
        show_progress_bars: false,
    };
    let callback: CrawlProgressCallback = Arc::new(move |msg: String| {
        messages_clone.lock().unwrap().push(msg);
    });

    execute_crawl(options, Some(callback)).await.unwrap();

    let messages = messages.lock().unwrap();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].starts_with("Archive session "));
    assert_eq!(messages[1], "[0] Archived http://127.0.0.1:9/");
}

#[tokio::test]
async fn test_execute_crawl_rejects_missing_seeds() {
    let options = CrawlOptions {
        seeds: Vec::new(),
        whitelist: Whitelist::from_hosts(["example.com"]),
        archive_path: None,
        timeout_secs: 1,
        show_progress_bars: false,
    };

    let err = execute_crawl(options, None).await.unwrap_err();
    assert!(err.contains("no starting points"));
}
