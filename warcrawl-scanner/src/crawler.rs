use crate::css::extract_css_links;
use crate::error::{Result, ScanError};
use crate::fetcher::{FetchedResponse, Fetcher};
use crate::frontier::Frontier;
use crate::html::extract_html_links;
use crate::resolve::{RefusalLog, Resolver, Whitelist};
use crate::result::{CrawlReport, CrawlResult};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Called after every processed URL with the remaining queue depth and the URL.
pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

/// Seeds and scope for a single run.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub seeds: Vec<String>,
    pub whitelist: Whitelist,
}

impl CrawlConfig {
    pub fn new(seeds: Vec<String>, whitelist: Whitelist) -> Result<Self> {
        if seeds.is_empty() {
            return Err(ScanError::Config("no starting points given".to_string()));
        }
        if whitelist.is_empty() {
            return Err(ScanError::Config("no domain whitelisted".to_string()));
        }
        // Seeds share the resolver's canonical form so the frontier sees
        // `https://a.test` and a later `href="/"` as the same URL.
        let seeds = seeds
            .iter()
            .map(|seed| {
                let mut url = Url::parse(seed)
                    .map_err(|e| ScanError::InvalidUrl(format!("seed {}: {}", seed, e)))?;
                url.set_fragment(None);
                Ok(url.to_string())
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { seeds, whitelist })
    }
}

/// Single-threaded breadth-first crawl driver.
pub struct Crawler<F> {
    fetcher: F,
    config: CrawlConfig,
    progress_callback: Option<ProgressCallback>,
}

impl<F: Fetcher> Crawler<F> {
    pub fn new(fetcher: F, config: CrawlConfig) -> Self {
        Self {
            fetcher,
            config,
            progress_callback: None,
        }
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Run until the frontier is exhausted.
    ///
    /// A failing page never aborts the run; it is recorded and skipped.
    pub async fn crawl(&self) -> CrawlReport {
        info!(
            "Starting crawl of {} seed(s) across {} whitelisted host(s)",
            self.config.seeds.len(),
            self.config.whitelist.len()
        );

        let resolver = Resolver::new(&self.config.whitelist);
        let mut frontier = Frontier::new(&self.config.seeds);
        let mut refusals = RefusalLog::new();
        let mut pages = Vec::new();

        while let Some(url) = frontier.pop_next() {
            let result = match self.fetcher.fetch(&url).await {
                Ok(response) => {
                    let links = Self::discover_links(&resolver, &response, &mut refusals);
                    let mut result = Self::describe(&response);
                    for link in &links {
                        if frontier.push(link.clone()) {
                            debug!("Queued {}", link);
                            result.links_enqueued += 1;
                        }
                    }
                    result.links_found = links;
                    result
                }
                Err(e) => {
                    warn!("Archive error for {}: {}", url, e);
                    CrawlResult::with_error(url.clone(), e.to_string())
                }
            };

            frontier.mark_processed(&url);
            pages.push(result);

            debug!("[{}] Archived {}", frontier.len(), url);
            if let Some(ref callback) = self.progress_callback {
                callback(frontier.len(), url);
            }
        }

        info!(
            "Crawl complete. Processed {} URL(s), refused {} link(s)",
            pages.len(),
            refusals.total()
        );

        CrawlReport { pages, refusals }
    }

    /// Extract, resolve and deduplicate the in-scope links of a response.
    fn discover_links(
        resolver: &Resolver<'_>,
        response: &FetchedResponse,
        refusals: &mut RefusalLog,
    ) -> Vec<String> {
        let content_type = response.normalized_content_type();
        let raw_links = if content_type.starts_with("text/css") {
            extract_css_links(&response.body_text())
        } else if content_type.starts_with("text/html") {
            extract_html_links(&response.body_text())
        } else {
            debug!("No extractor for {} ({})", response.url, content_type);
            Vec::new()
        };

        let mut seen = HashSet::new();
        raw_links
            .iter()
            .filter_map(|raw| resolver.resolve(&response.url, raw, refusals))
            .filter(|resolved| seen.insert(resolved.clone()))
            .collect()
    }

    fn describe(response: &FetchedResponse) -> CrawlResult {
        let mut result = CrawlResult::new(response.url.clone());
        result.status_code = response.status_code;
        result.content_type = response.content_type.clone();
        result.content_length = Some(response.body.len() as u64);
        result.response_time = response.response_time;
        result
    }
}
