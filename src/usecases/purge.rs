//! Purge Use Case - Delete Listings Past the Expiry Window
//!
//! Runs once per loop iteration, before posting. Every tracked listing
//! older than the window is deleted, one request at a time.
//!
//! Failed deletes are retried on later sweeps with exponential backoff:
//! after `n` failures a listing waits `backoff_base * 2^(n-1)` before
//! the next attempt. Once `max_attempts` sweeps have failed the listing
//! is dropped from state and handed back as a dead letter.
//!
//! Failure counts live in memory only. After a restart every listing
//! still in `posted.json` starts again at zero attempts, so the
//! dead-letter cap counts failures within one process lifetime.

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::domain::{ListingId, PostedListings};
use crate::ports::marketplace::{DeleteOutcome, Marketplace};
use crate::ports::repository::DeadLetter;

/// Cap on the backoff exponent.
const MAX_BACKOFF_EXPONENT: u32 = 16;

/// Expiry window and failed-delete policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgePolicy {
    /// Age after which a listing is deleted.
    pub window: TimeDelta,
    /// Failed sweeps before a listing is dead-lettered.
    pub max_attempts: u32,
    /// Wait after the first failure; doubles with each further failure.
    pub backoff_base: TimeDelta,
}

impl PurgePolicy {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            window: config.schedule.expiry_window(),
            max_attempts: config.purge.max_delete_attempts,
            backoff_base: config.purge.backoff_base(),
        }
    }
}

impl Default for PurgePolicy {
    fn default() -> Self {
        Self {
            window: TimeDelta::hours(36),
            max_attempts: 5,
            backoff_base: TimeDelta::minutes(2),
        }
    }
}

#[derive(Debug, Clone)]
struct FailureRecord {
    attempts: u32,
    last_failure: DateTime<Utc>,
}

impl FailureRecord {
    fn next_attempt_at(&self, base: TimeDelta) -> DateTime<Utc> {
        let exponent = self.attempts.saturating_sub(1).min(MAX_BACKOFF_EXPONENT);
        base.checked_mul(2i32.pow(exponent))
            .and_then(|wait| self.last_failure.checked_add_signed(wait))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// What one sweep did.
#[derive(Debug, Clone, Default)]
pub struct PurgeReport {
    /// Ids deleted from the marketplace and state.
    pub deleted: Vec<ListingId>,
    /// Ids whose delete failed and will be retried.
    pub failed: Vec<ListingId>,
    /// Expired ids skipped because their backoff has not elapsed.
    pub deferred: Vec<ListingId>,
    /// Listings given up on and dropped from state.
    pub dead_letters: Vec<DeadLetter>,
}

impl PurgeReport {
    /// Whether the sweep attempted no deletes at all.
    pub fn is_noop(&self) -> bool {
        self.deleted.is_empty() && self.failed.is_empty() && self.dead_letters.is_empty()
    }
}

/// Purge sweep with per-listing failure tracking across sweeps.
#[derive(Debug)]
pub struct PurgeSweep {
    policy: PurgePolicy,
    failures: HashMap<ListingId, FailureRecord>,
}

impl PurgeSweep {
    pub fn new(policy: PurgePolicy) -> Self {
        Self {
            policy,
            failures: HashMap::new(),
        }
    }

    /// Failed delete attempts so far for `id`.
    pub fn attempts(&self, id: &str) -> u32 {
        self.failures.get(id).map_or(0, |r| r.attempts)
    }

    /// Delete every expired listing in `posted`.
    pub async fn run<M: Marketplace + ?Sized>(
        &mut self,
        market: &M,
        posted: &mut PostedListings,
        now: DateTime<Utc>,
    ) -> PurgeReport {
        self.failures.retain(|id, _| posted.contains(id));

        let mut report = PurgeReport::default();

        for id in posted.expired(now, self.policy.window) {
            if let Some(record) = self.failures.get(&id) {
                if now < record.next_attempt_at(self.policy.backoff_base) {
                    report.deferred.push(id);
                    continue;
                }
            }

            let last_error = match market.delete_listing(&id).await {
                Ok(DeleteOutcome::Deleted) => {
                    info!(listing_id = %id, "[-] Deleted listing");
                    posted.remove(&id);
                    self.failures.remove(&id);
                    report.deleted.push(id);
                    continue;
                }
                Ok(DeleteOutcome::Rejected { status, body }) => format!("HTTP {status}: {body}"),
                Err(e) => format!("{e:#}"),
            };

            let record = self.failures.entry(id.clone()).or_insert(FailureRecord {
                attempts: 0,
                last_failure: now,
            });
            record.attempts += 1;
            record.last_failure = now;
            let attempts = record.attempts;

            if attempts < self.policy.max_attempts {
                warn!(listing_id = %id, attempts, error = %last_error, "[!] Failed to delete");
                report.failed.push(id);
                continue;
            }

            self.failures.remove(&id);
            if let Some(posted_at) = posted.remove(&id) {
                error!(
                    listing_id = %id,
                    attempts,
                    error = %last_error,
                    "Giving up on delete, moving listing to dead letters"
                );
                report.dead_letters.push(DeadLetter {
                    listing_id: id,
                    posted_at,
                    attempts,
                    last_error,
                    abandoned_at: now,
                });
            }
        }

        report
    }
}
