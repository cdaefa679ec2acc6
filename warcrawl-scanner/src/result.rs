use crate::resolve::RefusalLog;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome of processing one URL from the frontier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlResult {
    pub url: String,
    pub status_code: u16,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub response_time: Duration,
    /// Accepted links found on the page, in discovery order.
    pub links_found: Vec<String>,
    /// How many of `links_found` were new to the frontier.
    pub links_enqueued: usize,
    pub error: Option<String>,
}

impl CrawlResult {
    pub fn new(url: String) -> Self {
        Self {
            url,
            status_code: 0,
            content_type: None,
            content_length: None,
            response_time: Duration::from_secs(0),
            links_found: Vec::new(),
            links_enqueued: 0,
            error: None,
        }
    }

    pub fn with_error(url: String, error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::new(url)
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Everything a finished crawl hands back to the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlReport {
    /// One entry per processed URL, in processing order.
    pub pages: Vec<CrawlResult>,
    pub refusals: RefusalLog,
}

impl CrawlReport {
    pub fn archived(&self) -> impl Iterator<Item = &CrawlResult> {
        self.pages.iter().filter(|p| !p.is_failure())
    }

    pub fn failures(&self) -> impl Iterator<Item = &CrawlResult> {
        self.pages.iter().filter(|p| p.is_failure())
    }

    pub fn total_links(&self) -> usize {
        self.pages.iter().map(|p| p.links_found.len()).sum()
    }
}
