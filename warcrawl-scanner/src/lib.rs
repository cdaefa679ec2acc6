pub mod crawler;
pub mod css;
pub mod error;
pub mod fetcher;
pub mod frontier;
pub mod html;
pub mod resolve;
pub mod result;

pub use crawler::{CrawlConfig, Crawler, ProgressCallback};
pub use error::ScanError;
pub use fetcher::{FetchedResponse, Fetcher, HttpFetcher};
pub use frontier::Frontier;
pub use resolve::{RefusalLog, Resolver, Whitelist};
pub use result::{CrawlReport, CrawlResult};
