//! Configuration module for keyspider
//!
//! This module handles the crawl configuration: built-in defaults, optional
//! TOML configuration files and validation of the resolved values.
//!
//! # Example
//!
//! ```no_run
//! use keyspider::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("spider.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CrawlConfig, DEFAULT_TABLE, DEFAULT_USER_AGENT};

// Re-export parser and validation functions
pub use parser::{compute_config_hash, load_config, read_config};
pub use validation::{ensure_scheme, validate};
