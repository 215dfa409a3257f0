//! Crawler coordinator - main crawl orchestration logic
//!
//! This module ties the crawl together:
//! - Validating the configuration and opening storage before any work starts
//! - Starting the worker pool
//! - Seeding the frontier and waiting for it to drain
//! - Producing the final report

use crate::config::{validate, CrawlConfig};
use crate::crawler::fetcher::build_http_client;
use crate::crawler::frontier::Frontier;
use crate::crawler::pipeline::Pipeline;
use crate::crawler::worker::WorkerPool;
use crate::output::{CrawlReport, CrawlStats};
use crate::state::{CrawlTask, VisitedSet};
use crate::storage::{open_storage, PageStore, SqliteStore};
use crate::SpiderError;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Main crawler coordinator structure
///
/// A coordinator drives exactly one crawl run; the visited set and the
/// statistics live as long as it does.
pub struct Coordinator {
    config: Arc<CrawlConfig>,
    pipeline: Arc<Pipeline>,
    frontier: Arc<Frontier>,
    visited: Arc<VisitedSet>,
    store: Arc<Mutex<SqliteStore>>,
    stats: Arc<CrawlStats>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Every configuration problem is reported here, before any worker
    /// starts: invalid values, an unusable database path or output directory,
    /// or an HTTP client that cannot be built.
    pub fn new(mut config: CrawlConfig) -> Result<Self, SpiderError> {
        validate(&mut config)?;

        let store = open_storage(Path::new(&config.dbfile))?;

        let output_dir = config.output_path();
        std::fs::create_dir_all(&output_dir).map_err(|source| SpiderError::PageWrite {
            path: output_dir.display().to_string(),
            source,
        })?;

        let client = build_http_client(&config.user_agent, config.timeout())?;

        let frontier = Arc::new(Frontier::new());
        let visited = Arc::new(VisitedSet::new());
        let store = Arc::new(Mutex::new(store));
        let stats = Arc::new(CrawlStats::new());

        let pipeline = Arc::new(Pipeline::new(
            &config,
            client,
            visited.clone(),
            frontier.clone(),
            store.clone(),
            stats.clone(),
        ));

        Ok(Self {
            config: Arc::new(config),
            pipeline,
            frontier,
            visited,
            store,
            stats,
        })
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// The set of URLs claimed so far
    pub fn visited(&self) -> Arc<VisitedSet> {
        self.visited.clone()
    }

    /// Runs the crawl to completion
    ///
    /// Starts the workers, seeds the frontier with the configured URL and
    /// returns once no task is pending or in flight. Individual task failures
    /// are counted in the report and never abort the run.
    pub async fn run(self) -> Result<CrawlReport, SpiderError> {
        let start_time = Instant::now();
        tracing::info!(
            "Crawling {} to depth {} with {} workers, table {}",
            self.config.url,
            self.config.depth,
            self.config.threads,
            self.config.table_name()
        );

        let pipeline = self.pipeline.clone();
        let pool = WorkerPool::start(
            self.config.threads,
            self.frontier.clone(),
            self.stats.clone(),
            move |task| {
                let pipeline = pipeline.clone();
                async move { pipeline.execute(task).await }
            },
        );

        pool.submit(CrawlTask::seed(self.config.url.clone(), self.config.depth));
        pool.wait_completion().await;
        pool.shutdown().await?;

        let report = self.stats.snapshot(start_time.elapsed());
        tracing::info!(
            "Crawl completed: {} pages fetched, {} stored, {} duplicates, {} failed in {:?}",
            report.fetched,
            report.rows_stored,
            report.duplicates,
            report.failed(),
            report.elapsed
        );

        self.close_storage();
        Ok(report)
    }

    fn close_storage(self) {
        let Self {
            pipeline, store, ..
        } = self;
        drop(pipeline);

        match Arc::try_unwrap(store) {
            Ok(store) => {
                let store = store
                    .into_inner()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                if let Err(e) = store.close() {
                    tracing::warn!("Failed to close storage: {}", e);
                }
            }
            Err(_) => tracing::debug!("Storage still shared, leaving it to be dropped"),
        }
    }
}

/// Runs a complete crawl for `config`
///
/// # Example
///
/// ```no_run
/// use keyspider::config::CrawlConfig;
/// use keyspider::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut config = CrawlConfig::new("http://example.com/");
/// config.keyword = Some("rust".to_string());
/// let report = run_crawl(config).await?;
/// println!("{} pages stored", report.rows_stored);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: CrawlConfig) -> Result<CrawlReport, SpiderError> {
    Coordinator::new(config)?.run().await
}
