//! keyspider main entry point
//!
//! This is the command-line interface for the keyspider web crawler.

use clap::Parser;
use keyspider::config::{compute_config_hash, read_config, validate, CrawlConfig};
use keyspider::crawler::run_crawl;
use keyspider::output::print_report;
use keyspider::ConfigError;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// keyspider: a depth-bounded keyword web crawler
///
/// keyspider crawls outward from a seed URL with a pool of workers, saves
/// every page to `<title>.html` and stores the pages containing the keyword
/// in a SQLite table named after it.
#[derive(Parser, Debug)]
#[command(name = "keyspider")]
#[command(version)]
#[command(about = "A depth-bounded keyword web crawler", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from
    #[arg(short, long)]
    url: Option<String>,

    /// Number of link hops to follow from the seed [default: 2]
    #[arg(short, long)]
    depth: Option<u32>,

    /// Log file (appended to)
    #[arg(short = 'f', long, default_value = "SpiderLogfile.log")]
    logfile: PathBuf,

    /// Log file verbosity, 1 (critical only) to 5 (debug)
    #[arg(short, long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(1..=5))]
    loglevel: u8,

    /// Only store pages containing this keyword; also names the table
    #[arg(long)]
    keyword: Option<String>,

    /// Number of concurrent workers [default: 10]
    #[arg(long)]
    thread: Option<usize>,

    /// SQLite database file [default: spider.db]
    #[arg(long)]
    dbfile: Option<String>,

    /// Directory for the saved page files [default: .]
    #[arg(long)]
    output_dir: Option<String>,

    /// Per-request timeout in milliseconds [default: 3000]
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// TOML configuration file; command-line flags override its values
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Validate the configuration and print it without crawling
    #[arg(long)]
    dry_run: bool,

    /// Exit with an error status if any task failed
    #[arg(long)]
    fail_on_error: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.loglevel, &cli.logfile)?;

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let report = match run_crawl(config).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    print_report(&report);

    if cli.fail_on_error && report.failed() > 0 {
        return Err(format!("{} tasks failed", report.failed()).into());
    }

    Ok(())
}

/// Sets up logging to the log file and the console
///
/// The file gets the level picked with `--loglevel` (or `RUST_LOG`), the
/// console always shows INFO and above.
fn setup_logging(loglevel: u8, logfile: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let level = match loglevel {
        1 | 2 => "error",
        3 => "warn",
        4 => "info",
        _ => "debug",
    };
    let file_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("keyspider={},warn", level)));

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(logfile)?;

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(file_filter);

    let console_layer = fmt::layer()
        .with_target(false)
        .with_filter(EnvFilter::new("keyspider=info,warn"));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .init();

    Ok(())
}

/// Layers defaults, the optional config file and command-line flags
fn resolve_config(cli: &Cli) -> Result<CrawlConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let config = read_config(path)?;
            tracing::info!(
                "Configuration loaded (hash: {})",
                compute_config_hash(path)?
            );
            config
        }
        None => CrawlConfig::new(String::new()),
    };

    if let Some(url) = &cli.url {
        config.url = url.clone();
    }
    if let Some(depth) = cli.depth {
        config.depth = depth;
    }
    if let Some(keyword) = &cli.keyword {
        config.keyword = Some(keyword.clone());
    }
    if let Some(threads) = cli.thread {
        config.threads = threads;
    }
    if let Some(dbfile) = &cli.dbfile {
        config.dbfile = dbfile.clone();
    }
    if let Some(output_dir) = &cli.output_dir {
        config.output_dir = output_dir.clone();
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.timeout_ms = timeout_ms;
    }

    validate(&mut config)?;
    Ok(config)
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &CrawlConfig) {
    println!("=== keyspider Dry Run ===\n");

    println!("Crawl:");
    println!("  Seed URL: {}", config.url);
    println!("  Depth: {}", config.depth);
    println!("  Workers: {}", config.threads);
    println!("  Timeout: {}ms", config.timeout_ms);
    println!("  User agent: {}", config.user_agent);

    println!("\nOutput:");
    println!("  Database: {}", config.dbfile);
    println!("  Table: {}", config.table_name());
    match &config.keyword {
        Some(keyword) => println!("  Keyword filter: {}", keyword),
        None => println!("  Keyword filter: none (every page stored)"),
    }
    println!("  Page files: {}", config.output_dir);

    println!("\n✓ Configuration is valid");
}
