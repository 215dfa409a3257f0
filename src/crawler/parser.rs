//! HTML parser for extracting the page title and outbound links
//!
//! Links are returned exactly as written in the `href` attribute. Nothing is
//! resolved, trimmed or filtered, and an anchor without `href` yields an
//! empty string.

use chrono::{DateTime, Local};
use scraper::{Html, Selector};

/// Timestamp format used as the title of pages that have none
pub const FALLBACK_TITLE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Characters that cannot appear in a page file name
pub const RESERVED_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Longest page file stem in bytes, leaving room for `.html` under the
/// usual 255-byte file name limit
pub const MAX_TITLE_BYTES: usize = 250;

/// Extracted information from an HTML page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPage {
    /// The page title (from the first `<title>` tag), if non-empty
    pub title: Option<String>,

    /// The `href` of every `<a>` element, in document order
    pub links: Vec<String>,
}

impl ParsedPage {
    /// Returns the file-safe title, falling back to the timestamp at `now`
    ///
    /// Long titles are cut to [`MAX_TITLE_BYTES`] on a character boundary.
    pub fn file_title(&self, now: DateTime<Local>) -> String {
        let mut title = match &self.title {
            Some(title) => sanitize_title(title),
            None => sanitize_title(&fallback_title(now)),
        };
        truncate_title(&mut title, MAX_TITLE_BYTES);
        title
    }
}

/// Parses HTML content and extracts the title and links
///
/// # Example
///
/// ```
/// use keyspider::crawler::parse_html;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let parsed = parse_html(html);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.links, vec!["/page".to_string()]);
/// ```
pub fn parse_html(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        links: extract_links(&document),
    }
}

/// Parses a raw response body, decoding it as UTF-8 with replacement
pub fn parse_body(body: &[u8]) -> ParsedPage {
    parse_html(&String::from_utf8_lossy(body))
}

/// Extracts the page title: trimmed, with CR and LF removed
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| {
            element
                .text()
                .collect::<String>()
                .trim()
                .replace(['\r', '\n'], "")
        })
        .filter(|s| !s.is_empty())
}

fn extract_links(document: &Html) -> Vec<String> {
    let Ok(a_selector) = Selector::parse("a") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .map(|element| element.value().attr("href").unwrap_or("").to_string())
        .collect()
}

/// Formats the timestamp used for pages without a title
pub fn fallback_title(now: DateTime<Local>) -> String {
    now.format(FALLBACK_TITLE_FORMAT).to_string()
}

/// Replaces every reserved file name character with `_`
///
/// # Example
///
/// ```
/// use keyspider::crawler::sanitize_title;
///
/// assert_eq!(sanitize_title("My:Page?"), "My_Page_");
/// ```
pub fn sanitize_title(title: &str) -> String {
    title.replace(RESERVED_CHARS, "_")
}

fn truncate_title(title: &mut String, max_bytes: usize) {
    if title.len() <= max_bytes {
        return;
    }
    let mut end = max_bytes;
    while !title.is_char_boundary(end) {
        end -= 1;
    }
    title.truncate(end);
}
