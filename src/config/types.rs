use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Browser-like User-Agent sent with every page request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/44.0.2403.107 Safari/537.36";

/// Table used when no keyword is configured
pub const DEFAULT_TABLE: &str = "NoKeyword";

/// Configuration for a single crawl run
///
/// Every field has a default, so a TOML file only needs the values it
/// changes. The seed URL may instead come from the command line; an empty
/// seed is rejected by validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct CrawlConfig {
    /// Seed URL the crawl starts from
    #[serde(default)]
    pub url: String,

    /// Number of link hops followed from the seed
    #[serde(default = "default_depth")]
    pub depth: u32,

    /// Number of concurrent workers
    #[serde(default = "default_threads")]
    pub threads: usize,

    /// Only pages containing this string are stored in the database
    #[serde(default)]
    pub keyword: Option<String>,

    /// Path to the SQLite database file
    #[serde(default = "default_dbfile")]
    pub dbfile: String,

    /// Directory receiving the `<title>.html` page files
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Per-request timeout (milliseconds)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// User-Agent header value
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_depth() -> u32 {
    2
}

fn default_threads() -> usize {
    10
}

fn default_dbfile() -> String {
    "spider.db".to_string()
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_timeout_ms() -> u64 {
    3000
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl CrawlConfig {
    /// Creates a configuration for `url` with every other field defaulted
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            depth: default_depth(),
            threads: default_threads(),
            keyword: None,
            dbfile: default_dbfile(),
            output_dir: default_output_dir(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }

    /// Name of the table pages are stored in: the keyword, or [`DEFAULT_TABLE`]
    pub fn table_name(&self) -> &str {
        self.keyword.as_deref().unwrap_or(DEFAULT_TABLE)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(&self.output_dir)
    }
}
