use crate::archive::Archive;
use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;
use warcrawl_scanner::error::Result as ScanResult;
use warcrawl_scanner::{
    CrawlConfig, CrawlReport, Crawler, FetchedResponse, Fetcher, HttpFetcher, ProgressCallback,
    Whitelist,
};

/// Options for configuring a crawl operation
pub struct CrawlOptions {
    pub seeds: Vec<String>,
    pub whitelist: Whitelist,
    /// Where captures are written. `None` keeps them in memory for the run only.
    pub archive_path: Option<PathBuf>,
    pub timeout_secs: u64,
    pub show_progress_bars: bool,
}

/// Callback for reporting crawl progress messages
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Fetcher that writes every response it sees into an [`Archive`] session.
pub struct ArchivingFetcher<F> {
    inner: F,
    archive: Mutex<Archive>,
    session_id: String,
}

impl<F: Fetcher> ArchivingFetcher<F> {
    pub fn new(inner: F, archive: Archive, session_id: String) -> Self {
        Self {
            inner,
            archive: Mutex::new(archive),
            session_id,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Run `f` against the archive.
    pub fn with_archive<T>(&self, f: impl FnOnce(&Archive) -> T) -> T {
        let archive = self
            .archive
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&archive)
    }
}

#[async_trait]
impl<F: Fetcher> Fetcher for ArchivingFetcher<F> {
    async fn fetch(&self, url: &str) -> ScanResult<FetchedResponse> {
        let response = self.inner.fetch(url).await?;

        match self.with_archive(|archive| archive.store_capture(&self.session_id, &response)) {
            Ok(record) => debug!(
                "Stored {} as {} record #{} ({})",
                url,
                record.record_type.as_str(),
                record.id,
                record.payload_digest
            ),
            Err(e) => warn!("Failed to archive {}: {}", url, e),
        }

        Ok(response)
    }
}

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

/// Execute a crawl with the given options
/// Returns the crawl report
pub async fn execute_crawl(
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<CrawlReport, String> {
    let CrawlOptions {
        seeds,
        whitelist,
        archive_path,
        timeout_secs,
        show_progress_bars,
    } = options;

    let hosts: Vec<String> = whitelist.iter().map(str::to_string).collect();
    let config = CrawlConfig::new(seeds, whitelist).map_err(|e| e.to_string())?;

    let archive = match archive_path {
        Some(ref path) => Archive::new(path)
            .map_err(|e| format!("Failed to open archive {}: {}", path.display(), e))?,
        None => Archive::in_memory().map_err(|e| format!("Failed to open archive: {}", e))?,
    };
    let session_id = archive
        .create_session(&config.seeds, &hosts)
        .map_err(|e| format!("Failed to start archive session: {}", e))?;

    if let Some(ref callback) = progress_callback {
        callback(format!("Archive session {}", session_id));
    }

    let http = HttpFetcher::with_timeout(timeout_secs).map_err(|e| e.to_string())?;
    let fetcher = ArchivingFetcher::new(http, archive, session_id.clone());

    // Set up single progress bar for overall crawl progress (only if enabled)
    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .map_err(|e| e.to_string())?,
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting crawl...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let internal_progress_callback: ProgressCallback = {
        let pb_clone = progress_bar.clone();
        let outer = progress_callback.clone();
        Arc::new(move |queue_depth: usize, url: String| {
            let line = format!("[{}] Archived {}", queue_depth, url);
            if let Some(ref pb) = pb_clone {
                pb.set_message(format!("{} URL(s) queued", queue_depth));
                pb.println(&line);
            }
            if let Some(ref callback) = outer {
                callback(line);
            }
        })
    };

    let crawler = Crawler::new(fetcher, config).with_progress_callback(internal_progress_callback);
    let report = crawler.crawl().await;

    let finished = crawler
        .fetcher()
        .with_archive(|archive| archive.complete_session(&session_id));
    if let Err(e) = finished {
        warn!("Failed to close archive session {}: {}", session_id, e);
    }

    if let Some(ref pb) = progress_bar {
        pb.finish_with_message(format!(
            "Crawl complete! {} URLs processed",
            report.pages.len()
        ));
    }

    Ok(report)
}
