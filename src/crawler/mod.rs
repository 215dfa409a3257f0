//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The frontier queue and the worker pool draining it
//! - HTTP fetching with a per-request timeout
//! - HTML parsing for titles and links
//! - The per-task fetch pipeline
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod pipeline;
mod worker;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, fetch_url, FetchResponse};
pub use frontier::Frontier;
pub use parser::{
    fallback_title, parse_body, parse_html, sanitize_title, ParsedPage, FALLBACK_TITLE_FORMAT,
    MAX_TITLE_BYTES, RESERVED_CHARS,
};
pub use pipeline::{matches_keyword, FetchedPage, Pipeline};
pub use worker::WorkerPool;
