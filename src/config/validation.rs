use crate::config::types::CrawlConfig;
use crate::ConfigError;
use url::Url;

const MAX_THREADS: usize = 256;

/// Validates the configuration, defaulting the seed URL's scheme first
pub fn validate(config: &mut CrawlConfig) -> Result<(), ConfigError> {
    config.url = ensure_scheme(config.url.trim());
    validate_seed(&config.url)?;
    validate_workers(config)?;
    validate_storage(config)?;
    Ok(())
}

/// Prepends `http://` to a seed that names no HTTP scheme
///
/// Only the seed gets this treatment; discovered links are used verbatim.
pub fn ensure_scheme(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") || url.is_empty() {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}

fn validate_seed(url: &str) -> Result<(), ConfigError> {
    if url.is_empty() {
        return Err(ConfigError::Validation("seed url cannot be empty".to_string()));
    }

    let parsed = Url::parse(url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", url, e)))?;

    if parsed.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' has no host",
            url
        )));
    }

    Ok(())
}

fn validate_workers(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.threads < 1 || config.threads > MAX_THREADS {
        return Err(ConfigError::Validation(format!(
            "threads must be between 1 and {}, got {}",
            MAX_THREADS, config.threads
        )));
    }

    if config.timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "timeout-ms must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_storage(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.dbfile.is_empty() {
        return Err(ConfigError::Validation("dbfile cannot be empty".to_string()));
    }

    if config.output_dir.is_empty() {
        return Err(ConfigError::Validation(
            "output-dir cannot be empty".to_string(),
        ));
    }

    // The keyword doubles as a table name
    if let Some(keyword) = &config.keyword {
        if keyword.is_empty() {
            return Err(ConfigError::Validation(
                "keyword cannot be empty when given".to_string(),
            ));
        }

        // SQLite reserves these names for internal tables
        let prefix = keyword.get(..7).unwrap_or_default();
        if prefix.eq_ignore_ascii_case("sqlite_") {
            return Err(ConfigError::Validation(format!(
                "keyword '{}' cannot be used as a table name",
                keyword
            )));
        }
    }

    Ok(())
}
