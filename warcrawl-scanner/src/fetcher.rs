use crate::error::{Result, ScanError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::debug;

/// Upper bound on a single response body.
pub const DEFAULT_MAX_BODY_BYTES: u64 = 1_000_000_000;

/// A fully read HTTP response.
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    /// The requested URL (not the post-redirect one).
    pub url: String,
    pub status_code: u16,
    pub content_type: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub response_time: Duration,
}

impl FetchedResponse {
    /// Lowercased content type, empty when the header was missing.
    pub fn normalized_content_type(&self) -> String {
        self.content_type
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_lowercase()
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Anything that can turn a URL into a response.
///
/// Any HTTP status is a successful fetch; only transport problems are errors.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedResponse>;
}

pub struct HttpFetcher {
    client: Client,
    max_body_bytes: u64,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(30)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("warcrawl/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(10))
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        })
    }

    pub fn with_max_body_bytes(mut self, limit: u64) -> Self {
        self.max_body_bytes = limit;
        self
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedResponse> {
        debug!("Fetching {}", url);

        let start = Instant::now();
        let response = self.client.get(url).send().await?;

        if let Some(length) = response.content_length()
            && length > self.max_body_bytes
        {
            return Err(ScanError::BodyTooLarge {
                url: url.to_string(),
                limit: self.max_body_bytes,
            });
        }

        let status_code = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = response.bytes().await?.to_vec();
        let response_time = start.elapsed();

        if body.len() as u64 > self.max_body_bytes {
            return Err(ScanError::BodyTooLarge {
                url: url.to_string(),
                limit: self.max_body_bytes,
            });
        }

        Ok(FetchedResponse {
            url: url.to_string(),
            status_code,
            content_type,
            headers,
            body,
            response_time,
        })
    }
}
