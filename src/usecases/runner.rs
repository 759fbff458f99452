//! Runner Use Case - The Endless Post/Purge Loop
//!
//! Each iteration, strictly in order:
//! 1. Read the row under the cursor
//! 2. Purge expired listings
//! 3. Build and post the row's listing
//! 4. Persist the posted-listings state
//! 5. Advance the cursor (wrapping to row 0) and sleep
//!
//! The runner owns the posted-listings state and lends it to the
//! purge sweep and poster. There is no terminal state; `run` only
//! returns on a fatal error or when the shutdown future completes.

use std::future::Future;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{DateTime, TimeDelta, Utc};
use tokio::time::sleep;
use tracing::{info, instrument};

use super::poster::post_listing;
use super::purge::{PurgePolicy, PurgeReport, PurgeSweep};
use crate::config::AppConfig;
use crate::domain::{build_listing, ListingDefaults, ListingId, PostedListings, Row, RowCursor};
use crate::ports::marketplace::Marketplace;
use crate::ports::repository::ListingRepository;

/// Loop settings derived from config.
#[derive(Debug, Clone)]
pub struct RunnerSettings {
    /// Listing defaults for the builder.
    pub defaults: ListingDefaults,
    /// Sleep between iterations.
    pub interval: Duration,
    /// Expiry window and failed-delete policy.
    pub purge: PurgePolicy,
}

impl RunnerSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            defaults: config.listing_defaults(),
            interval: config.schedule.post_interval(),
            purge: PurgePolicy::from_config(config),
        }
    }
}

/// What one iteration did.
#[derive(Debug, Clone)]
pub struct IterationReport {
    /// Row posted this iteration.
    pub row_index: usize,
    /// Purge sweep results.
    pub purge: PurgeReport,
    /// Id of the created listing, if the post succeeded.
    pub posted: Option<ListingId>,
    /// Listings tracked after the iteration.
    pub tracked: usize,
}

/// Sequential post/purge loop over a fixed row list.
pub struct Runner<M: Marketplace, R: ListingRepository> {
    market: M,
    repo: R,
    rows: Vec<Row>,
    cursor: RowCursor,
    posted: PostedListings,
    purge: PurgeSweep,
    settings: RunnerSettings,
}

impl<M: Marketplace, R: ListingRepository> Runner<M, R> {
    /// Validate the rows and load the persisted state.
    ///
    /// # Errors
    /// Fails if there are no rows, if any row cannot be built into a
    /// listing, or if the state cannot be loaded.
    pub async fn start(market: M, repo: R, rows: Vec<Row>, settings: RunnerSettings) -> Result<Self> {
        let cursor = RowCursor::new(rows.len()).context("Listings file contains no rows")?;

        for (i, row) in rows.iter().enumerate() {
            build_listing(row, &settings.defaults)
                .with_context(|| format!("Invalid listing row {}", i + 1))?;
        }

        let posted = repo
            .load_posted()
            .await
            .context("Failed to load posted listings")?;

        info!(
            rows = rows.len(),
            tracked = posted.len(),
            interval_s = settings.interval.as_secs(),
            "Runner ready"
        );

        Ok(Self {
            market,
            repo,
            rows,
            cursor,
            posted,
            purge: PurgeSweep::new(settings.purge.clone()),
            settings,
        })
    }

    pub fn posted(&self) -> &PostedListings {
        &self.posted
    }

    pub fn cursor(&self) -> RowCursor {
        self.cursor
    }

    /// Run one purge → post → persist step starting at time `now`.
    ///
    /// The new listing is stamped with `now` plus the time the purge
    /// took, so a slow purge does not age it prematurely.
    ///
    /// # Errors
    /// Fails on a row that cannot be built or on a persistence error.
    /// Marketplace failures are logged, never returned.
    #[instrument(skip(self))]
    pub async fn run_iteration(&mut self, now: DateTime<Utc>) -> Result<IterationReport> {
        let started = Instant::now();
        let row_index = self.cursor.index();
        let row = &self.rows[row_index];

        let purge = self.purge.run(&self.market, &mut self.posted, now).await;
        for letter in &purge.dead_letters {
            self.repo
                .record_dead_letter(letter)
                .await
                .context("Failed to write dead letter")?;
        }

        let payload = build_listing(row, &self.settings.defaults)
            .with_context(|| format!("Invalid listing row {}", row_index + 1))?;
        let posted_at = TimeDelta::from_std(started.elapsed())
            .ok()
            .and_then(|elapsed| now.checked_add_signed(elapsed))
            .unwrap_or(now);
        let posted = post_listing(&self.market, &mut self.posted, &payload, posted_at).await;

        self.repo
            .save_posted(&self.posted)
            .await
            .context("Failed to persist posted listings")?;

        self.cursor.advance();

        Ok(IterationReport {
            row_index,
            purge,
            posted,
            tracked: self.posted.len(),
        })
    }

    /// Loop forever, sleeping `interval` between iterations.
    ///
    /// Returns `Ok(())` once `shutdown` completes; the state of the last
    /// finished iteration is already on disk at that point.
    pub async fn run<F: Future>(mut self, shutdown: F) -> Result<()> {
        tokio::pin!(shutdown);

        loop {
            let report = self.run_iteration(Utc::now()).await?;
            info!(
                row = report.row_index,
                posted = report.posted.is_some(),
                deleted = report.purge.deleted.len(),
                failed_deletes = report.purge.failed.len(),
                dead_letters = report.purge.dead_letters.len(),
                tracked = report.tracked,
                "Iteration complete"
            );

            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping");
                    return Ok(());
                }
                () = sleep(self.settings.interval) => {}
            }
        }
    }
}
