use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
};

use alloy::primitives::{Address, BlockNumber};
use serde::{Deserialize, Serialize};
use tokio::{fs, io::AsyncWriteExt};

use crate::error::ScannerError;

/// Durable snapshot of the scanner state.
///
/// Field names are the on-disk schema and must stay stable across versions.
/// `backlog` serializes sorted (ordered set) for deterministic diffs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub forward_frontier: BlockNumber,
    pub backfill_frontier: Option<BlockNumber>,
    pub seen_height: BTreeMap<Address, BlockNumber>,
    pub backlog: BTreeSet<Address>,
}

/// Atomic file persistence for [`Checkpoint`] documents.
///
/// Writes go to a sibling temporary path first and are renamed into place,
/// so a crash mid-write never corrupts the previous valid file.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut staged = self.path.as_os_str().to_owned();
        staged.push(".tmp");
        PathBuf::from(staged)
    }

    /// Persist `checkpoint`, replacing any previous file atomically.
    ///
    /// # Errors
    ///
    /// Returns [`ScannerError::CheckpointEncode`] if serialization fails and
    /// [`ScannerError::CheckpointIo`] on filesystem errors. The previous
    /// checkpoint file, if any, is left intact on failure.
    pub async fn save(&self, checkpoint: &Checkpoint) -> Result<(), ScannerError> {
        let encoded = serde_json::to_vec_pretty(checkpoint)?;

        let staged = self.staging_path();
        let mut file = fs::File::create(&staged).await?;
        file.write_all(&encoded).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&staged, &self.path).await?;

        debug!(path = ?self.path, "checkpoint saved");
        Ok(())
    }

    /// Load the persisted checkpoint, if a valid one exists.
    ///
    /// A missing file is a normal fresh start. Any other read or parse
    /// failure is logged and also treated as absent: losing a checkpoint
    /// degrades to a cold start, it never takes the scanner down.
    pub async fn load(&self) -> Option<Checkpoint> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = ?self.path, "no checkpoint file, starting fresh");
                return None;
            }
            Err(err) => {
                warn!(path = ?self.path, error = %err, "checkpoint unreadable, starting fresh");
                return None;
            }
        };

        match serde_json::from_slice(&raw) {
            Ok(checkpoint) => Some(checkpoint),
            Err(err) => {
                warn!(path = ?self.path, error = %err, "checkpoint unparsable, starting fresh");
                None
            }
        }
    }
}
