/// Crawl task and outcome definitions
///
/// A task is one unit of work on the frontier: a URL plus the number of link
/// hops still allowed below it.
use std::fmt;

/// A URL waiting to be fetched, with its remaining depth budget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    url: String,
    remaining_depth: u32,
}

impl CrawlTask {
    /// Creates the seed task of a crawl
    pub fn seed(url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            remaining_depth: depth,
        }
    }

    /// Creates a task for a link found on this task's page
    ///
    /// Returns `None` once the depth budget is spent, so a task with a
    /// remaining depth of zero can never produce children.
    pub fn child(&self, url: impl Into<String>) -> Option<Self> {
        let remaining_depth = self.remaining_depth.checked_sub(1)?;
        Some(Self {
            url: url.into(),
            remaining_depth,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn remaining_depth(&self) -> u32 {
        self.remaining_depth
    }

    /// Returns true if links found on this page should be followed
    pub fn can_expand(&self) -> bool {
        self.remaining_depth > 0
    }
}

impl fmt::Display for CrawlTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (depth {})", self.url, self.remaining_depth)
    }
}

/// What the fetch pipeline did with a task that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Another worker already claimed the URL
    Duplicate,

    /// The response had an empty body; nothing was written or followed
    EmptyBody,

    /// The page was fetched and written to disk
    Processed {
        /// A row was inserted into the storage table
        stored: bool,
        /// Number of child tasks put on the frontier
        children: usize,
    },
}

impl TaskOutcome {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate)
    }
}
