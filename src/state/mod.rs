//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlTask`: a URL on the frontier together with its remaining depth budget
//! - `TaskOutcome`: what the fetch pipeline did with a task
//! - `VisitedSet`: the URLs already claimed during the current run

mod task;
mod visited;

// Re-export main types
pub use task::{CrawlTask, TaskOutcome};
pub use visited::VisitedSet;
