//! Frontier queue shared by the coordinator and the workers
//!
//! The frontier is a FIFO of crawl tasks with join semantics: it counts every
//! task from `enqueue` until the matching `mark_done`, so the crawl is over
//! exactly when that count drops to zero. The total number of tasks is not
//! known up front because workers keep adding children while they run.
//!
//! The queue is unbounded. A wide site crawled deep can grow it without limit.

use crate::state::CrawlTask;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::{watch, Notify};

#[derive(Debug, Default)]
struct QueueState {
    tasks: VecDeque<CrawlTask>,
    closed: bool,
}

/// FIFO of pending crawl tasks
#[derive(Debug)]
pub struct Frontier {
    state: Mutex<QueueState>,

    /// Wakes workers waiting in `dequeue`
    task_ready: Notify,

    /// Tasks enqueued but not yet marked done (pending + in flight)
    unfinished: watch::Sender<usize>,
}

impl Default for Frontier {
    fn default() -> Self {
        Self::new()
    }
}

impl Frontier {
    pub fn new() -> Self {
        let (unfinished, _) = watch::channel(0);
        Self {
            state: Mutex::new(QueueState::default()),
            task_ready: Notify::new(),
            unfinished,
        }
    }

    /// Appends a task without blocking
    ///
    /// Returns false if the frontier is closed; the task is dropped.
    pub fn enqueue(&self, task: CrawlTask) -> bool {
        {
            let mut state = self.lock();
            if state.closed {
                tracing::debug!("Frontier closed, dropping {}", task);
                return false;
            }
            self.unfinished.send_modify(|n| *n += 1);
            state.tasks.push_back(task);
        }
        self.task_ready.notify_one();
        true
    }

    /// Takes the oldest task, waiting until one is available
    ///
    /// Returns `None` once the frontier is closed and empty.
    pub async fn dequeue(&self) -> Option<CrawlTask> {
        loop {
            // Register interest before looking at the queue so a notification
            // sent in between is not lost.
            let notified = self.task_ready.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = self.lock();
                if let Some(task) = state.tasks.pop_front() {
                    if !state.tasks.is_empty() {
                        self.task_ready.notify_one();
                    }
                    return Some(task);
                }
                if state.closed {
                    return None;
                }
            }

            notified.await;
        }
    }

    /// Signals that one dequeued task has finished, successfully or not
    pub fn mark_done(&self) {
        self.unfinished.send_modify(|n| {
            if *n == 0 {
                tracing::error!("mark_done called more times than enqueue");
            } else {
                *n -= 1;
            }
        });
    }

    /// Waits until every enqueued task has been dequeued and marked done
    pub async fn wait_until_drained(&self) {
        let mut unfinished = self.unfinished.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = unfinished.wait_for(|n| *n == 0).await;
    }

    /// Closes the frontier: further enqueues are dropped and idle workers exit
    pub fn close(&self) {
        self.lock().closed = true;
        self.task_ready.notify_waiters();
    }

    /// Number of tasks waiting to be dequeued
    pub fn pending(&self) -> usize {
        self.lock().tasks.len()
    }

    /// Number of tasks enqueued but not yet marked done
    pub fn unfinished(&self) -> usize {
        *self.unfinished.borrow()
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
