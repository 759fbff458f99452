//! State Store - Atomic JSON Posted-Listings Persistence
//!
//! Saves the posted-listings map to `posted.json` using atomic writes
//! (write to tmp file, then rename). The file is always either the
//! old or the new version, never a partial write.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{debug, info, instrument};

use crate::domain::PostedListings;

/// Atomic JSON store for the posted-listings map.
pub struct StateStore {
    /// Path to the state file.
    state_path: PathBuf,
    /// Temporary path for atomic writes.
    tmp_path: PathBuf,
}

impl StateStore {
    /// Create a store for `path`, creating its parent directory if needed.
    pub async fn new(path: impl AsRef<Path>) -> Result<Self> {
        let state_path = path.as_ref().to_path_buf();

        if let Some(dir) = state_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .await
                .context("Failed to create state directory")?;
        }

        let mut tmp_name = state_path.as_os_str().to_owned();
        tmp_name.push(".tmp");

        Ok(Self {
            state_path,
            tmp_path: PathBuf::from(tmp_name),
        })
    }

    /// Save the posted listings atomically (tmp → rename).
    #[instrument(skip(self, posted), fields(count = posted.len()))]
    pub async fn save(&self, posted: &PostedListings) -> Result<()> {
        let json = serde_json::to_string_pretty(posted)
            .context("Failed to serialize posted listings")?;

        fs::write(&self.tmp_path, &json)
            .await
            .context("Failed to write tmp state file")?;

        fs::rename(&self.tmp_path, &self.state_path)
            .await
            .context("Failed to rename state file")?;

        debug!(path = %self.state_path.display(), "Posted listings saved");
        Ok(())
    }

    /// Load the posted listings. A missing file is an empty map.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<PostedListings> {
        if !self.state_path.exists() {
            info!(path = %self.state_path.display(), "No state file found, starting fresh");
            return Ok(PostedListings::new());
        }

        let json = fs::read_to_string(&self.state_path)
            .await
            .context("Failed to read state file")?;

        let posted: PostedListings =
            serde_json::from_str(&json).context("Failed to parse state JSON")?;

        info!(
            path = %self.state_path.display(),
            tracked = posted.len(),
            "Posted listings loaded"
        );

        Ok(posted)
    }
}
