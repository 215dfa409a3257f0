//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run whole
//! crawls end-to-end against a temporary database and output directory.

use keyspider::config::CrawlConfig;
use keyspider::crawler::{run_crawl, Coordinator};
use keyspider::storage::{PageStore, SqliteStore};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing into `dir`
fn create_test_config(seed: String, depth: u32, dir: &Path) -> CrawlConfig {
    let mut config = CrawlConfig::new(seed);
    config.depth = depth;
    config.threads = 4;
    config.timeout_ms = 2000;
    config.dbfile = dir.join("spider.db").display().to_string();
    config.output_dir = dir.join("pages").display().to_string();
    config
}

fn html_page(title: &str, links: &[String], text: &str) -> String {
    let anchors: String = links
        .iter()
        .map(|link| format!(r#"<a href="{}">link</a>"#, link))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body><p>{}</p>{}</body></html>",
        title, text, anchors
    )
}

async fn mount_page(server: &MockServer, route: &str, body: String, expected: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(expected)
        .mount(server)
        .await;
}

/// Mounts a -> {b, c}, b -> a, c -> nothing
async fn mount_small_site(server: &MockServer, expected_b_c: u64) {
    let base = server.uri();
    mount_page(
        server,
        "/a",
        html_page(
            "Page A",
            &[format!("{}/b", base), format!("{}/c", base)],
            "start here",
        ),
        1,
    )
    .await;
    mount_page(
        server,
        "/b",
        html_page("Page B", &[format!("{}/a", base)], "rust is mentioned here"),
        expected_b_c,
    )
    .await;
    mount_page(server, "/c", html_page("Page C", &[], "nothing"), expected_b_c).await;
}

fn open_db(dir: &TempDir) -> SqliteStore {
    SqliteStore::new(&dir.path().join("spider.db")).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_full_crawl_depth_one() {
    let server = MockServer::start().await;
    mount_small_site(&server, 1).await;
    let dir = tempfile::tempdir().unwrap();

    let config = create_test_config(format!("{}/a", server.uri()), 1, dir.path());
    let report = run_crawl(config).await.unwrap();

    assert_eq!(report.fetched, 3);
    assert_eq!(report.pages_written, 3);
    assert_eq!(report.rows_stored, 3);
    assert_eq!(report.children_enqueued, 2);
    assert_eq!(report.failed(), 0);

    let pages = dir.path().join("pages");
    for title in ["Page A", "Page B", "Page C"] {
        assert!(pages.join(format!("{}.html", title)).exists(), "{}", title);
    }

    let store = open_db(&dir);
    assert_eq!(store.count_rows("NoKeyword").unwrap(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_back_link_fetched_once() {
    let server = MockServer::start().await;
    mount_small_site(&server, 1).await;
    let dir = tempfile::tempdir().unwrap();

    let config = create_test_config(format!("{}/a", server.uri()), 2, dir.path());
    let report = run_crawl(config).await.unwrap();

    // b links back to the seed, which is claimed already
    assert_eq!(report.fetched, 3);
    assert_eq!(report.duplicates, 1);
    assert_eq!(report.claimed, 3);
    assert_eq!(report.failed(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_keyword_filters_stored_rows() {
    let server = MockServer::start().await;
    mount_small_site(&server, 1).await;
    let dir = tempfile::tempdir().unwrap();

    let mut config = create_test_config(format!("{}/a", server.uri()), 1, dir.path());
    config.keyword = Some("rust".to_string());
    let report = run_crawl(config).await.unwrap();

    assert_eq!(report.pages_written, 3);
    assert_eq!(report.rows_stored, 1);
    assert_eq!(report.keyword_misses, 2);

    let store = open_db(&dir);
    assert!(!store.table_exists("NoKeyword").unwrap());

    let rows = store.fetch_rows("rust").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].url, format!("{}/b", server.uri()));
    assert!(rows[0].data.contains("rust is mentioned here"));
    assert!(rows[0].data.contains("<title>Page B</title>"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_depth_zero_fetches_only_seed() {
    let server = MockServer::start().await;
    mount_small_site(&server, 0).await;
    let dir = tempfile::tempdir().unwrap();

    let config = create_test_config(format!("{}/a", server.uri()), 0, dir.path());
    let report = run_crawl(config).await.unwrap();

    assert_eq!(report.fetched, 1);
    assert_eq!(report.children_enqueued, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_slow_page_times_out_without_stalling() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_page(
        &server,
        "/a",
        html_page(
            "Seed",
            &[format!("{}/slow", base), format!("{}/fast", base)],
            "",
        ),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html_page("Slow", &[], ""))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;
    mount_page(&server, "/fast", html_page("Fast", &[], ""), 1).await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(format!("{}/a", base), 1, dir.path());
    config.timeout_ms = 300;
    let report = run_crawl(config).await.unwrap();

    assert_eq!(report.fetched, 2);
    assert_eq!(report.fetch_failures, 1);
    assert_eq!(report.failed(), 1);
    assert!(!dir.path().join("pages").join("Slow.html").exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_untitled_page_gets_timestamp_name() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/a",
        "<html><body>no title here</body></html>".to_string(),
        1,
    )
    .await;
    let dir = tempfile::tempdir().unwrap();

    let config = create_test_config(format!("{}/a", server.uri()), 0, dir.path());
    let report = run_crawl(config).await.unwrap();
    assert_eq!(report.pages_written, 1);

    let names: Vec<String> = std::fs::read_dir(dir.path().join("pages"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 1);

    // "YYYY-MM-DD HH_MM_SS.html"
    let name = &names[0];
    assert_eq!(name.len(), 24, "{}", name);
    assert!(name.ends_with(".html"));
    assert_eq!(&name[4..5], "-");
    assert_eq!(&name[10..11], " ");
    assert_eq!(&name[13..14], "_");
    assert_eq!(&name[16..17], "_");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_error_status_page_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_string(html_page("Not Found", &[], "gone")),
        )
        .expect(1)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    let config = create_test_config(format!("{}/missing", server.uri()), 1, dir.path());
    let report = run_crawl(config).await.unwrap();

    assert_eq!(report.failed(), 0);
    assert_eq!(report.rows_stored, 1);
    assert!(dir.path().join("pages").join("Not Found.html").exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_empty_body_not_saved() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    let config = create_test_config(format!("{}/empty", server.uri()), 1, dir.path());
    let report = run_crawl(config).await.unwrap();

    assert_eq!(report.fetched, 1);
    assert_eq!(report.pages_written, 0);
    assert_eq!(report.rows_stored, 0);
    assert_eq!(report.failed(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_seed_without_scheme() {
    let server = MockServer::start().await;
    mount_page(&server, "/a", html_page("Bare", &[], ""), 1).await;
    let dir = tempfile::tempdir().unwrap();

    let bare = server.uri().trim_start_matches("http://").to_string();
    let config = create_test_config(format!("{}/a", bare), 0, dir.path());

    let coordinator = Coordinator::new(config).unwrap();
    assert_eq!(coordinator.config().url, format!("{}/a", server.uri()));

    let report = coordinator.run().await.unwrap();
    assert_eq!(report.fetched, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_rows_appended_across_runs() {
    let server = MockServer::start().await;
    mount_page(&server, "/a", html_page("Again", &[], ""), 2).await;
    let dir = tempfile::tempdir().unwrap();

    for _ in 0..2 {
        let config = create_test_config(format!("{}/a", server.uri()), 0, dir.path());
        run_crawl(config).await.unwrap();
    }

    let store = open_db(&dir);
    assert_eq!(store.count_rows("NoKeyword").unwrap(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_storage_failure_counted_and_siblings_crawled() {
    let server = MockServer::start().await;
    mount_small_site(&server, 1).await;
    let dir = tempfile::tempdir().unwrap();

    // A table with the keyword's name but the wrong columns makes every
    // insert fail while the rest of the crawl carries on.
    let conn = rusqlite::Connection::open(dir.path().join("spider.db")).unwrap();
    conn.execute("CREATE TABLE \"rust\" (other INTEGER)", []).unwrap();
    drop(conn);

    let mut config = create_test_config(format!("{}/a", server.uri()), 1, dir.path());
    config.keyword = Some("rust".to_string());
    let report = run_crawl(config).await.unwrap();

    assert_eq!(report.fetched, 3);
    assert_eq!(report.storage_failures, 1);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.rows_stored, 0);
    assert!(dir.path().join("pages").join("Page C.html").exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_file_failure_counted_and_siblings_crawled() {
    let server = MockServer::start().await;
    mount_small_site(&server, 1).await;
    let dir = tempfile::tempdir().unwrap();

    // A directory squatting on the page file name makes the write fail
    std::fs::create_dir_all(dir.path().join("pages").join("Page B.html")).unwrap();

    let config = create_test_config(format!("{}/a", server.uri()), 1, dir.path());
    let report = run_crawl(config).await.unwrap();

    assert_eq!(report.fetched, 3);
    assert_eq!(report.file_failures, 1);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.pages_written, 2);
    assert_eq!(report.rows_stored, 2);

    let rows = open_db(&dir).fetch_rows("NoKeyword").unwrap();
    assert!(rows.iter().all(|row| !row.url.ends_with("/b")));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_long_title_page_still_expands() {
    let server = MockServer::start().await;
    let base = server.uri();
    let title = "長".repeat(100);
    mount_page(
        &server,
        "/a",
        html_page(&title, &[format!("{}/c", base)], ""),
        1,
    )
    .await;
    mount_page(&server, "/c", html_page("Page C", &[], ""), 1).await;
    let dir = tempfile::tempdir().unwrap();

    let config = create_test_config(format!("{}/a", base), 1, dir.path());
    let report = run_crawl(config).await.unwrap();

    assert_eq!(report.fetched, 2);
    assert_eq!(report.file_failures, 0);
    assert_eq!(report.rows_stored, 2);
    assert_eq!(report.children_enqueued, 1);
}
