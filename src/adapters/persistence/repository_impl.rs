//! Repository Implementation - Concrete Adapter for the Repository Port
//!
//! Wraps `StateStore` (atomic JSON snapshot of posted listings) and
//! `DeadLetterLog` (JSONL append-only) into a single struct that
//! implements the `ListingRepository` trait.

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;

use super::dead_letter::DeadLetterLog;
use super::state::StateStore;
use crate::domain::PostedListings;
use crate::ports::repository::{DeadLetter, ListingRepository};

/// File-backed repository combining state and dead-letter persistence.
pub struct FileRepository {
    /// Atomic JSON state store.
    state_store: StateStore,
    /// JSONL dead-letter log.
    dead_letters: DeadLetterLog,
}

impl FileRepository {
    /// Create a new repository from existing store and log instances.
    pub fn new(state_store: StateStore, dead_letters: DeadLetterLog) -> Self {
        Self {
            state_store,
            dead_letters,
        }
    }

    /// Create a repository from the two file paths.
    pub async fn from_paths(
        state_path: impl AsRef<Path>,
        dead_letter_path: impl AsRef<Path>,
    ) -> Result<Self> {
        let state_store = StateStore::new(state_path).await?;
        let dead_letters = DeadLetterLog::new(dead_letter_path).await?;
        Ok(Self::new(state_store, dead_letters))
    }
}

#[async_trait]
impl ListingRepository for FileRepository {
    async fn load_posted(&self) -> Result<PostedListings> {
        self.state_store.load().await
    }

    async fn save_posted(&self, posted: &PostedListings) -> Result<()> {
        self.state_store.save(posted).await
    }

    async fn record_dead_letter(&self, letter: &DeadLetter) -> Result<()> {
        self.dead_letters.append(letter).await
    }

    async fn load_dead_letters(&self) -> Result<Vec<DeadLetter>> {
        self.dead_letters.load_all().await
    }
}
