//! Output module for crawl results
//!
//! This module handles:
//! - Writing fetched page bodies to `<title>.html` files
//! - Counting task outcomes and rendering the end-of-crawl report

mod files;
pub mod stats;

pub use files::{page_file_path, write_page};
pub use stats::{print_report, CrawlReport, CrawlStats};
