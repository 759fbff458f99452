//! Configuration Module - JSON/TOML Lister Configuration
//!
//! Loads and validates configuration from `config.json` (or a TOML
//! file) with API credential overrides from the environment / `.env`.
//! Only `GFAPI_KEY`, `GFAPI_SECRET` and the `post` section are
//! required; everything else falls back to defaults.

pub mod loader;

use std::time::Duration;

use chrono::TimeDelta;
use serde::Deserialize;

use crate::domain::ListingDefaults;

/// Top-level lister configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Gameflip API key.
  #[serde(rename = "GFAPI_KEY", default)]
  pub api_key: String,
  /// Gameflip API secret (HMAC key, never sent on the wire).
  #[serde(rename = "GFAPI_SECRET", default)]
  pub api_secret: String,
  /// Listing defaults.
  pub post: PostConfig,
  /// Marketplace API endpoint and transport settings.
  #[serde(default)]
  pub api: ApiConfig,
  /// Posting cadence and listing lifetime.
  #[serde(default)]
  pub schedule: ScheduleConfig,
  /// Failed-delete retry policy.
  #[serde(default)]
  pub purge: PurgeConfig,
  /// Input, state and dead-letter file locations.
  #[serde(default)]
  pub files: FilesConfig,
  /// Log output.
  #[serde(default)]
  pub logging: LoggingConfig,
}

/// Listing defaults applied to every row.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostConfig {
  /// Append ` x{quantity}` to titles when quantity > 1.
  #[serde(default)]
  pub append_quantity: bool,
  /// Gameflip `expire_in` code.
  pub expiry: String,
  /// Days to deliver.
  pub delivery_time: u32,
  /// Seller account id included in the payload when set.
  #[serde(default)]
  pub seller_id: Option<String>,
}

/// Marketplace API settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
  /// REST API base URL.
  #[serde(default = "default_base_url")]
  pub base_url: String,
  /// Request timeout in seconds.
  #[serde(default = "default_timeout")]
  pub timeout_seconds: u64,
  /// Retries for a DELETE on transient errors.
  #[serde(default = "default_max_retries")]
  pub max_retries: u32,
  /// Base delay between retries (doubles each attempt).
  #[serde(default = "default_retry_base_delay")]
  pub retry_base_delay_ms: u64,
}

/// Posting cadence.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConfig {
  /// Sleep between loop iterations.
  #[serde(default = "default_post_interval")]
  pub post_interval_seconds: u64,
  /// Age after which a posted listing is deleted.
  #[serde(default = "default_expiry_hours")]
  pub expiry_hours: i64,
}

/// Failed-delete policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeConfig {
  /// Failed sweeps before a listing is dead-lettered.
  #[serde(default = "default_max_delete_attempts")]
  pub max_delete_attempts: u32,
  /// Wait after the first failed sweep (doubles per failure).
  #[serde(default = "default_purge_backoff")]
  pub backoff_base_seconds: i64,
}

/// File locations.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilesConfig {
  /// Input CSV.
  #[serde(default = "default_listings_file")]
  pub listings: String,
  /// Posted listings state file.
  #[serde(default = "default_state_file")]
  pub state: String,
  /// JSONL log of listings that could not be deleted.
  #[serde(default = "default_dead_letter_file")]
  pub dead_letter: String,
}

/// Log output.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub level: String,
  /// Emit JSON lines instead of human-readable output.
  #[serde(default)]
  pub json: bool,
}

impl AppConfig {
  /// Listing defaults for the builder.
  pub fn listing_defaults(&self) -> ListingDefaults {
    ListingDefaults {
      append_quantity: self.post.append_quantity,
      expiry: self.post.expiry.clone(),
      delivery_days: self.post.delivery_time,
      seller_id: self.post.seller_id.clone(),
    }
  }
}

impl ApiConfig {
  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_seconds)
  }

  pub fn retry_base_delay(&self) -> Duration {
    Duration::from_millis(self.retry_base_delay_ms)
  }
}

impl ScheduleConfig {
  pub fn post_interval(&self) -> Duration {
    Duration::from_secs(self.post_interval_seconds)
  }

  /// Listing lifetime. Out-of-range values saturate; the loader
  /// rejects them before this is called.
  pub fn expiry_window(&self) -> TimeDelta {
    TimeDelta::try_hours(self.expiry_hours).unwrap_or(TimeDelta::MAX)
  }
}

impl PurgeConfig {
  pub fn backoff_base(&self) -> TimeDelta {
    TimeDelta::try_seconds(self.backoff_base_seconds).unwrap_or(TimeDelta::MAX)
  }
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: default_base_url(),
      timeout_seconds: default_timeout(),
      max_retries: default_max_retries(),
      retry_base_delay_ms: default_retry_base_delay(),
    }
  }
}

impl Default for ScheduleConfig {
  fn default() -> Self {
    Self {
      post_interval_seconds: default_post_interval(),
      expiry_hours: default_expiry_hours(),
    }
  }
}

impl Default for PurgeConfig {
  fn default() -> Self {
    Self {
      max_delete_attempts: default_max_delete_attempts(),
      backoff_base_seconds: default_purge_backoff(),
    }
  }
}

impl Default for FilesConfig {
  fn default() -> Self {
    Self {
      listings: default_listings_file(),
      state: default_state_file(),
      dead_letter: default_dead_letter_file(),
    }
  }
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      level: default_log_level(),
      json: false,
    }
  }
}

// Default value functions for serde

fn default_base_url() -> String {
  "https://api.gameflip.com".to_string()
}

fn default_timeout() -> u64 {
  30
}

fn default_max_retries() -> u32 {
  3
}

fn default_retry_base_delay() -> u64 {
  500
}

fn default_post_interval() -> u64 {
  120
}

fn default_expiry_hours() -> i64 {
  36
}

fn default_max_delete_attempts() -> u32 {
  5
}

fn default_purge_backoff() -> i64 {
  120
}

fn default_listings_file() -> String {
  "listings.csv".to_string()
}

fn default_state_file() -> String {
  "posted.json".to_string()
}

fn default_dead_letter_file() -> String {
  "dead_letters.jsonl".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}
