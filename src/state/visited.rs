/// Visited URL set shared by all workers
///
/// The set only grows during a run. URLs are compared as exact strings.
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

/// Thread-safe record of URLs that have been claimed for fetching
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `url` for the calling worker
    ///
    /// Membership check and insertion happen under one lock acquisition.
    /// Returns true iff no earlier call in this run claimed the same URL.
    pub fn try_claim(&self, url: &str) -> bool {
        let mut urls = self.lock();
        if urls.contains(url) {
            return false;
        }
        urls.insert(url.to_string())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.lock().contains(url)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panicking worker cannot leave the set half-updated, so a poisoned
    // lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.urls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
