//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.json` (or `.toml`), applying credential
//! overrides from the environment, validating all parameters, and
//! providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Env var names that override the file's credentials.
pub const ENV_API_KEY: &str = "GFAPI_KEY";
pub const ENV_API_SECRET: &str = "GFAPI_SECRET";

/// Upper bounds keeping every derived duration and timestamp in range.
const MAX_RETRIES: u32 = 10;
const MAX_RETRY_BASE_DELAY_MS: u64 = 60_000;
const MAX_EXPIRY_HOURS: i64 = 24 * 365 * 10;
const MAX_BACKOFF_BASE_SECONDS: i64 = 86_400;

/// Load and validate configuration from a JSON or TOML file.
///
/// The format is picked from the file extension: `.toml` is parsed as
/// TOML, anything else as JSON. `GFAPI_KEY` / `GFAPI_SECRET` in the
/// process environment take precedence over the file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - Parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let mut config = parse_config(path, &content)?;
  apply_env_overrides(&mut config, |name| std::env::var(name).ok());
  validate_config(&config)?;

  info!(
    path = %path.display(),
    base_url = %config.api.base_url,
    interval_s = config.schedule.post_interval_seconds,
    expiry_h = config.schedule.expiry_hours,
    append_quantity = config.post.append_quantity,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse config text, choosing the format from `path`'s extension.
pub fn parse_config(path: &Path, content: &str) -> Result<AppConfig> {
  let is_toml = path
    .extension()
    .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

  if is_toml {
    toml::from_str(content)
      .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
  } else {
    serde_json::from_str(content)
      .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
  }
}

/// Replace credentials with non-empty values from `lookup`.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
  F: Fn(&str) -> Option<String>,
{
  if let Some(key) = lookup(ENV_API_KEY).filter(|v| !v.is_empty()) {
    config.api_key = key;
  }
  if let Some(secret) = lookup(ENV_API_SECRET).filter(|v| !v.is_empty()) {
    config.api_secret = secret;
  }
}

/// Validate all configuration parameters.
fn validate_config(config: &AppConfig) -> Result<()> {
  // Credentials
  anyhow::ensure!(
    !config.api_key.is_empty(),
    "GFAPI_KEY must be set in the config file or environment"
  );
  anyhow::ensure!(
    !config.api_secret.is_empty(),
    "GFAPI_SECRET must be set in the config file or environment"
  );

  // Listing defaults
  anyhow::ensure!(
    !config.post.expiry.is_empty(),
    "post.expiry must not be empty"
  );

  // API
  anyhow::ensure!(
    !config.api.base_url.is_empty(),
    "api.baseUrl must not be empty"
  );
  anyhow::ensure!(
    config.api.timeout_seconds > 0,
    "api.timeoutSeconds must be positive"
  );
  anyhow::ensure!(
    config.api.max_retries <= MAX_RETRIES,
    "api.maxRetries must be at most {MAX_RETRIES}, got {}",
    config.api.max_retries
  );
  anyhow::ensure!(
    config.api.retry_base_delay_ms <= MAX_RETRY_BASE_DELAY_MS,
    "api.retryBaseDelayMs must be at most {MAX_RETRY_BASE_DELAY_MS}, got {}",
    config.api.retry_base_delay_ms
  );

  // Schedule
  anyhow::ensure!(
    config.schedule.post_interval_seconds > 0,
    "schedule.postIntervalSeconds must be positive"
  );
  anyhow::ensure!(
    config.schedule.expiry_hours > 0,
    "schedule.expiryHours must be positive, got {}",
    config.schedule.expiry_hours
  );
  anyhow::ensure!(
    config.schedule.expiry_hours <= MAX_EXPIRY_HOURS,
    "schedule.expiryHours must be at most {MAX_EXPIRY_HOURS}, got {}",
    config.schedule.expiry_hours
  );

  // Purge
  anyhow::ensure!(
    config.purge.max_delete_attempts > 0,
    "purge.maxDeleteAttempts must be at least 1"
  );
  anyhow::ensure!(
    config.purge.backoff_base_seconds >= 0,
    "purge.backoffBaseSeconds must not be negative"
  );
  anyhow::ensure!(
    config.purge.backoff_base_seconds <= MAX_BACKOFF_BASE_SECONDS,
    "purge.backoffBaseSeconds must be at most {MAX_BACKOFF_BASE_SECONDS}, got {}",
    config.purge.backoff_base_seconds
  );

  Ok(())
}
