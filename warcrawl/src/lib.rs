// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{parse_seed_list, parse_whitelist, prepare_archive_path};

// Re-export crawl functionality from warcrawl-core
pub use warcrawl_core::crawl::{CrawlOptions, CrawlProgressCallback, execute_crawl};
