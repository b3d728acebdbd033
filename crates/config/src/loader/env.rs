//! Environment variable parsing for configuration.
//!
//! Responsibilities:
//! - Read and parse `SUMOLOGIC_*` environment variables.
//! - Apply environment variable values to a ConfigLoader instance.
//!
//! Does NOT handle:
//! - Reading the credentials file (see credentials_file.rs).
//! - Building the final Config (see builder.rs).
//! - .env file loading (handled by ConfigLoader::load_dotenv).
//!
//! Invariants:
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed (leading/trailing whitespace removed).
//! - Invalid numeric values return ConfigError::InvalidValue.

use secrecy::SecretString;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use super::builder::ConfigLoader;
use super::error::ConfigError;

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Parse an environment variable, mapping parse failures to `InvalidValue`.
fn parse_env<T: FromStr>(key: &str, expected: &str) -> Result<Option<T>, ConfigError> {
    env_var_or_none(key)
        .map(|raw| {
            raw.parse::<T>().map_err(|_| ConfigError::InvalidValue {
                var: key.to_string(),
                message: expected.to_string(),
            })
        })
        .transpose()
}

fn parse_flag(key: &str) -> Result<Option<bool>, ConfigError> {
    match env_var_or_none(key).as_deref() {
        None => Ok(None),
        Some("1") | Some("true") | Some("yes") => Ok(Some(true)),
        Some("0") | Some("false") | Some("no") => Ok(Some(false)),
        Some(_) => Err(ConfigError::InvalidValue {
            var: key.to_string(),
            message: "must be true or false".to_string(),
        }),
    }
}

/// Apply environment variable configuration to the loader.
pub fn apply_env(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    if let Some(path) = env_var_or_none("SUMOLOGIC_CONFIG_PATH") {
        loader.set_config_path(Some(PathBuf::from(path)));
    }
    if let Some(endpoint) = env_var_or_none("SUMOLOGIC_ENDPOINT") {
        loader.set_endpoint(Some(endpoint));
    }
    if let Some(id) = env_var_or_none("SUMOLOGIC_ACCESS_ID") {
        loader.set_access_id(Some(id));
    }
    if let Some(key) = env_var_or_none("SUMOLOGIC_ACCESS_KEY") {
        loader.set_access_key(Some(SecretString::new(key.into())));
    }

    if let Some(secs) = parse_env::<u64>("SUMOLOGIC_TIMEOUT", "must be a number of seconds")? {
        loader.set_timeout(Some(Duration::from_secs(secs)));
    }
    if let Some(secs) =
        parse_env::<u64>("SUMOLOGIC_METRICS_TIMEOUT", "must be a number of seconds")?
    {
        loader.set_metrics_timeout(Some(Duration::from_secs(secs)));
    }
    if let Some(retries) =
        parse_env::<usize>("SUMOLOGIC_MAX_RETRIES", "must be a non-negative integer")?
    {
        loader.set_max_retries(Some(retries));
    }

    if let Some(wait) = parse_env::<u32>("SUMOLOGIC_MAX_JOB_WAIT", "must be a positive integer")? {
        loader.set_max_job_wait(Some(wait));
    }
    if let Some(ms) =
        parse_env::<u64>("SUMOLOGIC_POLL_INITIAL_MS", "must be a number of milliseconds")?
    {
        loader.set_poll_initial(Some(Duration::from_millis(ms)));
    }
    if let Some(ms) = parse_env::<u64>("SUMOLOGIC_POLL_MAX_MS", "must be a number of milliseconds")?
    {
        loader.set_poll_max(Some(Duration::from_millis(ms)));
    }
    if let Some(ms) =
        parse_env::<u64>("SUMOLOGIC_PAGE_THROTTLE_MS", "must be a number of milliseconds")?
    {
        loader.set_page_throttle(Some(Duration::from_millis(ms)));
    }
    if let Some(limit) =
        parse_env::<usize>("SUMOLOGIC_RECORD_LIMIT", "must be a non-negative integer")?
    {
        loader.set_record_limit(Some(limit));
    }

    if let Some(tz) = env_var_or_none("SUMOLOGIC_TIMEZONE") {
        loader.set_time_zone(Some(tz));
    }
    if let Some(comment) = env_var_or_none("SUMOLOGIC_QUERY_COMMENT") {
        loader.set_query_comment(Some(comment));
    }

    if let Some(secs) =
        parse_env::<u64>("SUMOLOGIC_SEARCH_CACHE_TTL", "must be a number of seconds")?
    {
        loader.set_search_cache_ttl(Some(Duration::from_secs(secs)));
    }
    if let Some(secs) =
        parse_env::<u64>("SUMOLOGIC_METRICS_CACHE_TTL", "must be a number of seconds")?
    {
        loader.set_metrics_cache_ttl(Some(Duration::from_secs(secs)));
    }
    if let Some(disabled) = parse_flag("SUMOLOGIC_CACHE_DISABLED")? {
        loader.set_cache_enabled(Some(!disabled));
    }

    Ok(())
}
