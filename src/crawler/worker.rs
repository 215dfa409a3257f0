//! Worker pool draining the frontier
//!
//! The pool runs a fixed number of long-lived workers. Each one loops:
//! take a task, run the handler, mark the task done, repeat. A failing or
//! panicking task is counted and logged; the worker carries on with the next
//! task.

use crate::crawler::frontier::Frontier;
use crate::output::CrawlStats;
use crate::state::{CrawlTask, TaskOutcome};
use crate::SpiderError;
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Marks the current task done when dropped, whatever happened to it
struct DoneGuard<'a>(&'a Frontier);

impl Drop for DoneGuard<'_> {
    fn drop(&mut self) {
        self.0.mark_done();
    }
}

/// Fixed-size pool of workers sharing one frontier
pub struct WorkerPool {
    frontier: Arc<Frontier>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Starts `size` workers running `handler` on every task they dequeue
    ///
    /// All workers are spawned before this returns, so tasks may be submitted
    /// right away.
    pub fn start<F, Fut>(
        size: usize,
        frontier: Arc<Frontier>,
        stats: Arc<CrawlStats>,
        handler: F,
    ) -> Self
    where
        F: Fn(CrawlTask) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<TaskOutcome, SpiderError>> + Send + 'static,
    {
        let handler = Arc::new(handler);
        let workers = (1..=size.max(1))
            .map(|id| {
                tracing::info!("Starting worker {}", id);
                tokio::spawn(run_worker(
                    id,
                    frontier.clone(),
                    stats.clone(),
                    handler.clone(),
                ))
            })
            .collect();

        Self { frontier, workers }
    }

    /// Number of workers in the pool
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    pub fn frontier(&self) -> &Arc<Frontier> {
        &self.frontier
    }

    /// Puts a task on the frontier
    pub fn submit(&self, task: CrawlTask) -> bool {
        tracing::debug!("Task added: {}", task);
        self.frontier.enqueue(task)
    }

    /// Waits until the frontier is empty and no task is in flight
    pub async fn wait_completion(&self) {
        self.frontier.wait_until_drained().await;
        tracing::info!("All tasks completed");
    }

    /// Closes the frontier and waits for every worker to exit
    pub async fn shutdown(self) -> Result<(), SpiderError> {
        self.frontier.close();
        for worker in self.workers {
            worker.await?;
        }
        Ok(())
    }
}

async fn run_worker<F, Fut>(
    id: usize,
    frontier: Arc<Frontier>,
    stats: Arc<CrawlStats>,
    handler: Arc<F>,
) where
    F: Fn(CrawlTask) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<TaskOutcome, SpiderError>> + Send + 'static,
{
    while let Some(task) = frontier.dequeue().await {
        let _done = DoneGuard(&frontier);
        let url = task.url().to_string();
        tracing::debug!("Worker {} is working on {}", id, task);

        // The handler runs in its own task so a panic only takes down this task.
        match tokio::spawn(handler(task)).await {
            Ok(Ok(outcome)) => {
                tracing::trace!("Worker {} finished {}: {:?}", id, url, outcome);
            }
            Ok(Err(e)) => {
                stats.record_failure(&e);
                match e {
                    SpiderError::Http { .. }
                    | SpiderError::Timeout { .. }
                    | SpiderError::Reqwest(_) => {
                        tracing::warn!("Failed to fetch {}: {}", url, e);
                    }
                    _ => tracing::error!("Task for {} failed: {}", url, e),
                }
            }
            Err(e) => {
                stats.record_panic();
                tracing::error!("Worker {} task for {} panicked: {}", id, url, e);
            }
        }
    }

    tracing::debug!("Worker {} exiting", id);
}
