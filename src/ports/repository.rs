//! Repository Port - Listing State Persistence Interface
//!
//! Defines the trait for persisting the posted-listings map and the
//! dead-letter log of listings that could not be deleted. File-based:
//! an atomically replaced JSON snapshot plus an append-only JSONL log.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ListingId, PostedAt, PostedListings};

/// A listing the purge sweep gave up deleting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadLetter {
  /// Marketplace listing id.
  pub listing_id: ListingId,
  /// When the listing was originally posted.
  pub posted_at: PostedAt,
  /// Failed delete sweeps.
  pub attempts: u32,
  /// Last failure (status + body, or transport error).
  pub last_error: String,
  /// When the listing was dropped from state.
  pub abandoned_at: DateTime<Utc>,
}

/// Trait for listing state persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingRepository: Send + Sync + 'static {
  /// Load posted listings. A missing store yields an empty map.
  async fn load_posted(&self) -> anyhow::Result<PostedListings>;

  /// Replace the stored posted listings with `posted`.
  async fn save_posted(&self, posted: &PostedListings) -> anyhow::Result<()>;

  /// Append a dead-letter record.
  async fn record_dead_letter(&self, letter: &DeadLetter) -> anyhow::Result<()>;

  /// Load all dead-letter records, oldest first.
  async fn load_dead_letters(&self) -> anyhow::Result<Vec<DeadLetter>>;
}
