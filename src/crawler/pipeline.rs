//! Per-task fetch pipeline
//!
//! For every task taken off the frontier:
//! 1. Claim the URL in the visited set (duplicates stop here)
//! 2. GET the page
//! 3. Parse it and derive a file-safe title
//! 4. Write the raw body to `<title>.html`
//! 5. Store the page if it contains the keyword (or always, without one)
//! 6. Queue every link on the page one level deeper, if depth remains
//!
//! Any error ends the task; the worker counts and logs it.

use crate::config::CrawlConfig;
use crate::crawler::fetcher::{fetch_url, FetchResponse};
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::parse_body;
use crate::output::{write_page, CrawlStats};
use crate::state::{CrawlTask, TaskOutcome, VisitedSet};
use crate::storage::{PageStore, SqliteStore, StorageError};
use crate::SpiderError;
use chrono::Local;
use reqwest::Client;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// A fetched page ready to be persisted
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,

    /// File-safe title, never empty
    pub title: String,

    pub body: Vec<u8>,
}

/// Returns true if a page with `body` should be stored under `keyword`
///
/// Without a keyword every page matches; otherwise the keyword must occur
/// byte for byte somewhere in the body.
pub fn matches_keyword(body: &[u8], keyword: Option<&str>) -> bool {
    match keyword {
        None => true,
        Some(keyword) if keyword.is_empty() => true,
        Some(keyword) => body
            .windows(keyword.len())
            .any(|window| window == keyword.as_bytes()),
    }
}

/// Shared state and logic for processing crawl tasks
pub struct Pipeline {
    client: Client,
    visited: Arc<VisitedSet>,
    frontier: Arc<Frontier>,
    store: Arc<Mutex<SqliteStore>>,
    stats: Arc<CrawlStats>,
    keyword: Option<String>,
    table: String,
    output_dir: PathBuf,
}

impl Pipeline {
    pub fn new(
        config: &CrawlConfig,
        client: Client,
        visited: Arc<VisitedSet>,
        frontier: Arc<Frontier>,
        store: Arc<Mutex<SqliteStore>>,
        stats: Arc<CrawlStats>,
    ) -> Self {
        Self {
            client,
            visited,
            frontier,
            store,
            stats,
            keyword: config.keyword.clone(),
            table: config.table_name().to_string(),
            output_dir: config.output_path(),
        }
    }

    /// Runs every pipeline step for `task`
    pub async fn execute(&self, task: CrawlTask) -> Result<TaskOutcome, SpiderError> {
        if !self.visited.try_claim(task.url()) {
            tracing::warn!("Already crawled, skipping {}", task.url());
            self.stats.record_duplicate();
            return Ok(TaskOutcome::Duplicate);
        }
        tracing::info!("Crawling {}", task);
        self.stats.record_claimed();

        let FetchResponse {
            final_url,
            status_code,
            body,
        } = fetch_url(&self.client, task.url()).await?;
        self.stats.record_fetched();
        if final_url != task.url() {
            tracing::debug!(
                "{} redirected to {} (HTTP {})",
                task.url(),
                final_url,
                status_code
            );
        }

        if body.is_empty() {
            tracing::debug!("Empty body from {}", task.url());
            return Ok(TaskOutcome::EmptyBody);
        }

        let parsed = parse_body(&body);
        let page = FetchedPage {
            url: task.url().to_string(),
            title: parsed.file_title(Local::now()),
            body,
        };

        let path = write_page(&self.output_dir, &page.title, &page.body).await?;
        self.stats.record_page_written();
        tracing::debug!("Saved {} to {}", page.url, path.display());

        let stored = self.store_page(&page).await?;

        let children = if task.can_expand() {
            self.expand(&task, parsed.links)
        } else {
            0
        };

        Ok(TaskOutcome::Processed { stored, children })
    }

    /// Stores the page if it passes the keyword filter
    async fn store_page(&self, page: &FetchedPage) -> Result<bool, SpiderError> {
        if !matches_keyword(&page.body, self.keyword.as_deref()) {
            tracing::debug!(
                "{} does not contain keyword {:?}, not stored",
                page.url,
                self.keyword
            );
            self.stats.record_keyword_miss();
            return Ok(false);
        }

        let store = self.store.clone();
        let table = self.table.clone();
        let url = page.url.clone();
        let data = String::from_utf8_lossy(&page.body).into_owned();

        tokio::task::spawn_blocking(move || -> Result<i64, StorageError> {
            let mut store = store.lock().map_err(|_| StorageError::Poisoned)?;
            store.insert_row(&table, &url, &data)
        })
        .await??;

        self.stats.record_row_stored();
        match &self.keyword {
            Some(keyword) => tracing::info!(
                "{} inserted into {}, keyword: {}",
                page.url,
                self.table,
                keyword
            ),
            None => tracing::info!("{} inserted into {}, no keyword", page.url, self.table),
        }
        Ok(true)
    }

    /// Queues every link one level deeper; returns how many were queued
    fn expand(&self, task: &CrawlTask, links: Vec<String>) -> usize {
        let count = links
            .into_iter()
            .filter_map(|link| task.child(link))
            .map(|child| self.frontier.enqueue(child))
            .filter(|queued| *queued)
            .count();

        tracing::debug!("Queued {} links from {}", count, task.url());
        self.stats.record_children(count);
        count
    }
}
