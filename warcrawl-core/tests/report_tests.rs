// Tests for report generation functionality

use std::time::Duration;
use tempfile::TempDir;
use warcrawl_core::report::{
    ReportFormat, generate_crawl_report, generate_json_report, generate_refusal_report,
    save_report,
};
use warcrawl_scanner::{CrawlReport, CrawlResult, RefusalLog};

fn sample_report() -> CrawlReport {
    let mut refusals = RefusalLog::new();
    refusals.record("other.com", "https://other.com/x".to_string());
    refusals.record("cdn.net", "https://cdn.net/a.js".to_string());
    refusals.record("other.com", "https://other.com/y".to_string());
    refusals.record("other.com", "https://other.com/x".to_string());

    CrawlReport {
        pages: vec![
            CrawlResult {
                url: "https://example.com/".to_string(),
                status_code: 200,
                content_type: Some("text/html".to_string()),
                content_length: Some(1024),
                response_time: Duration::from_millis(100),
                links_found: vec![
                    "https://example.com/about".to_string(),
                    "https://example.com/site.css".to_string(),
                ],
                links_enqueued: 2,
                error: None,
            },
            CrawlResult {
                url: "https://example.com/site.css".to_string(),
                status_code: 200,
                content_type: Some("text/css".to_string()),
                content_length: Some(512),
                response_time: Duration::from_millis(50),
                links_found: vec![],
                links_enqueued: 0,
                error: None,
            },
            CrawlResult::with_error(
                "https://example.com/about".to_string(),
                "HTTP request failed: connection reset".to_string(),
            ),
        ],
        refusals,
    }
}

// ============================================================================
// Report Format Tests
// ============================================================================

#[test]
fn test_report_format_from_str() {
    assert_eq!(ReportFormat::from_str("text"), Some(ReportFormat::Text));
    assert_eq!(ReportFormat::from_str("JSON"), Some(ReportFormat::Json));
    assert_eq!(ReportFormat::from_str("csv"), None);
}

// ============================================================================
// Refusal Report Tests
// ============================================================================

#[test]
fn test_refusal_report_lists_hosts_counts_and_urls() {
    let report = generate_refusal_report(&sample_report().refusals);

    assert_eq!(
        report,
        "Refused domains from whitelist:\n\
         - cdn.net (1 times)\n\
         \x20   - https://cdn.net/a.js\n\
         - other.com (3 times)\n\
         \x20   - https://other.com/x\n\
         \x20   - https://other.com/y\n\
         \x20   - https://other.com/x\n"
    );
}

#[test]
fn test_refusal_report_empty() {
    assert_eq!(generate_refusal_report(&RefusalLog::new()), "");
}

// ============================================================================
// Crawl Report Tests
// ============================================================================

#[test]
fn test_crawl_report_summary() {
    let report = generate_crawl_report(&sample_report(), false);

    assert!(report.contains("Pages archived: 2"));
    assert!(report.contains("Fetch failures: 1"));
    assert!(report.contains("Links discovered: 2"));
    assert!(report.contains("Refused URLs: 4 across 2 host(s)"));
}

#[test]
fn test_crawl_report_groups_by_host() {
    let report = generate_crawl_report(&sample_report(), false);

    assert!(report.contains("## example.com"));
    assert!(report.contains("2 pages archived"));
    assert!(report.contains("/site.css"));
    assert!(report.contains("text/css"));
    assert!(!report.contains("text/html")); // Should be hidden
}

#[test]
fn test_crawl_report_lists_failures() {
    let report = generate_crawl_report(&sample_report(), false);

    assert!(report.contains("## Failed"));
    assert!(report.contains("https://example.com/about HTTP request failed: connection reset"));
}

#[test]
fn test_crawl_report_plain_has_no_escape_codes() {
    let report = generate_crawl_report(&sample_report(), false);

    assert!(!report.contains('\x1b'));
    assert!(report.contains("  200 /site.css text/css\n"));
}

#[test]
fn test_crawl_report_without_failures() {
    let mut crawl = sample_report();
    crawl.pages.retain(|p| p.error.is_none());

    let report = generate_crawl_report(&crawl, false);
    assert!(!report.contains("## Failed"));
}

// ============================================================================
// JSON Report Tests
// ============================================================================

#[test]
fn test_json_report() {
    let json = generate_json_report(&sample_report()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["pages_archived"], 2);
    assert_eq!(value["fetch_failures"], 1);
    assert_eq!(value["refused_urls"], 4);
    assert_eq!(value["pages"].as_array().unwrap().len(), 3);
    assert_eq!(value["refusals"]["other.com"].as_array().unwrap().len(), 3);
    assert_eq!(value["refusals"]["cdn.net"][0], "https://cdn.net/a.js");
}

// ============================================================================
// Save Report Tests
// ============================================================================

#[test]
fn test_save_report() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("report.txt");

    save_report("hello report", &path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello report");
}
