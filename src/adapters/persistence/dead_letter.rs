//! Dead-Letter Log - Append-only JSONL Records of Abandoned Deletes
//!
//! Each line is one self-contained `DeadLetter` JSON object naming a
//! listing the purge sweep stopped trying to delete. Operators clean
//! these up by hand.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{instrument, warn};

use crate::ports::repository::DeadLetter;

/// Append-only JSONL dead-letter log.
pub struct DeadLetterLog {
    path: PathBuf,
}

impl DeadLetterLog {
    /// Create a log at `path`, creating its parent directory if needed.
    pub async fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .await
                .context("Failed to create dead-letter directory")?;
        }

        Ok(Self { path })
    }

    /// Append one record.
    #[instrument(skip(self, letter), fields(listing_id = %letter.listing_id))]
    pub async fn append(&self, letter: &DeadLetter) -> Result<()> {
        let mut json = serde_json::to_string(letter).context("Failed to serialize dead letter")?;
        json.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .context("Failed to open dead-letter log")?;

        file.write_all(json.as_bytes())
            .await
            .context("Failed to write dead letter")?;

        file.flush().await.context("Failed to flush dead-letter log")?;

        Ok(())
    }

    /// Load every record, skipping malformed lines.
    pub async fn load_all(&self) -> Result<Vec<DeadLetter>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).await?;
        let mut letters = Vec::new();

        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<DeadLetter>(line) {
                Ok(letter) => letters.push(letter),
                Err(e) => {
                    warn!(
                        file = %self.path.display(),
                        error = %e,
                        "Skipping malformed dead-letter record"
                    );
                }
            }
        }

        Ok(letters)
    }
}
