//! Crawl statistics
//!
//! Workers bump shared atomic counters while the crawl runs; the coordinator
//! freezes them into a [`CrawlReport`] once the frontier drains.

use crate::SpiderError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Live counters shared by all workers
#[derive(Debug, Default)]
pub struct CrawlStats {
    claimed: AtomicUsize,
    duplicates: AtomicUsize,
    fetched: AtomicUsize,
    pages_written: AtomicUsize,
    rows_stored: AtomicUsize,
    keyword_misses: AtomicUsize,
    children_enqueued: AtomicUsize,
    fetch_failures: AtomicUsize,
    storage_failures: AtomicUsize,
    file_failures: AtomicUsize,
    other_failures: AtomicUsize,
    panicked: AtomicUsize,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_claimed(&self) {
        self.claimed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_duplicate(&self) {
        self.duplicates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fetched(&self) {
        self.fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_page_written(&self) {
        self.pages_written.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_row_stored(&self) {
        self.rows_stored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_keyword_miss(&self) {
        self.keyword_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_children(&self, count: usize) {
        self.children_enqueued.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_panic(&self) {
        self.panicked.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a task that ended with `error`, bucketed by its cause
    pub fn record_failure(&self, error: &SpiderError) {
        let counter = match error {
            SpiderError::Http { .. } | SpiderError::Timeout { .. } | SpiderError::Reqwest(_) => {
                &self.fetch_failures
            }
            SpiderError::Storage(_) | SpiderError::Database(_) => &self.storage_failures,
            SpiderError::PageWrite { .. } => &self.file_failures,
            SpiderError::Config(_) | SpiderError::Join(_) => &self.other_failures,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Freezes the counters into a report
    pub fn snapshot(&self, elapsed: Duration) -> CrawlReport {
        CrawlReport {
            claimed: self.claimed.load(Ordering::Relaxed),
            duplicates: self.duplicates.load(Ordering::Relaxed),
            fetched: self.fetched.load(Ordering::Relaxed),
            pages_written: self.pages_written.load(Ordering::Relaxed),
            rows_stored: self.rows_stored.load(Ordering::Relaxed),
            keyword_misses: self.keyword_misses.load(Ordering::Relaxed),
            children_enqueued: self.children_enqueued.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            storage_failures: self.storage_failures.load(Ordering::Relaxed),
            file_failures: self.file_failures.load(Ordering::Relaxed),
            other_failures: self.other_failures.load(Ordering::Relaxed),
            panicked: self.panicked.load(Ordering::Relaxed),
            elapsed,
        }
    }
}

/// Summary of a finished crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// URLs claimed for fetching (distinct URLs attempted)
    pub claimed: usize,

    /// Tasks skipped because their URL was already claimed
    pub duplicates: usize,

    /// Pages that returned a response body
    pub fetched: usize,

    /// Page files written to the output directory
    pub pages_written: usize,

    /// Rows inserted into the storage table
    pub rows_stored: usize,

    /// Fetched pages not stored because the keyword was absent
    pub keyword_misses: usize,

    /// Child tasks put on the frontier
    pub children_enqueued: usize,

    pub fetch_failures: usize,
    pub storage_failures: usize,
    pub file_failures: usize,
    pub other_failures: usize,

    /// Tasks whose pipeline panicked
    pub panicked: usize,

    pub elapsed: Duration,
}

impl CrawlReport {
    /// Total number of tasks that ended in an error
    pub fn failed(&self) -> usize {
        self.fetch_failures
            + self.storage_failures
            + self.file_failures
            + self.other_failures
            + self.panicked
    }

    /// Total number of tasks taken off the frontier
    pub fn tasks(&self) -> usize {
        self.claimed + self.duplicates
    }
}

/// Prints the report to stdout in a formatted manner
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");

    println!("Tasks:");
    println!("  Processed: {}", report.tasks());
    println!("  Distinct URLs: {}", report.claimed);
    println!("  Duplicates skipped: {}", report.duplicates);
    println!("  Child tasks queued: {}", report.children_enqueued);
    println!();

    println!("Pages:");
    println!("  Fetched: {}", report.fetched);
    println!("  Files written: {}", report.pages_written);
    println!("  Rows stored: {}", report.rows_stored);
    println!("  Keyword misses: {}", report.keyword_misses);
    println!();

    if report.failed() > 0 {
        println!("Failures ({}):", report.failed());
        println!("  Fetch: {}", report.fetch_failures);
        println!("  Storage: {}", report.storage_failures);
        println!("  File: {}", report.file_failures);
        if report.other_failures > 0 {
            println!("  Other: {}", report.other_failures);
        }
        if report.panicked > 0 {
            println!("  Panicked: {}", report.panicked);
        }
        println!();
    }

    let rate = if report.elapsed.as_secs_f64() > 0.0 {
        report.fetched as f64 / report.elapsed.as_secs_f64()
    } else {
        0.0
    };
    println!(
        "Finished in {:.2?} ({:.2} pages/sec)",
        report.elapsed, rate
    );
}
