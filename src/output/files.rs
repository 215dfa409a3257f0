//! Page file output
//!
//! Every fetched page is written to `<title>.html` in the output directory.
//! Files are overwritten without locking: two pages with the same sanitized
//! title race and the last writer wins.

use crate::SpiderError;
use std::path::{Path, PathBuf};

/// Returns the path a page with `title` is written to
pub fn page_file_path(dir: &Path, title: &str) -> PathBuf {
    dir.join(format!("{}.html", title))
}

/// Writes the raw page body, replacing any existing file
pub async fn write_page(dir: &Path, title: &str, body: &[u8]) -> Result<PathBuf, SpiderError> {
    let path = page_file_path(dir, title);

    tokio::fs::write(&path, body)
        .await
        .map_err(|source| SpiderError::PageWrite {
            path: path.display().to_string(),
            source,
        })?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_file_path() {
        let path = page_file_path(Path::new("/tmp/pages"), "Home Page");
        assert_eq!(path, PathBuf::from("/tmp/pages/Home Page.html"));
    }

    #[tokio::test]
    async fn test_write_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_page(dir.path(), "Home", b"<html>hi</html>")
            .await
            .unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"<html>hi</html>");
    }

    #[tokio::test]
    async fn test_write_page_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        write_page(dir.path(), "Same", b"first").await.unwrap();
        let path = write_page(dir.path(), "Same", b"second").await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_write_page_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let result = write_page(&missing, "Home", b"x").await;

        assert!(matches!(result, Err(SpiderError::PageWrite { .. })));
    }
}
