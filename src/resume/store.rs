//! Checkpoint file persistence
//!
//! Atomic writes through a temp file in the target directory, with an
//! exclusive advisory lock on a sibling `.lock` file so two harvest
//! processes sharing a state file cannot interleave writes.

use fd_lock::RwLock;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{Checkpoint, ResumeError};

/// Loads and saves the checkpoint file.
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    /// Create a store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the checkpoint file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted checkpoint. `None` when no checkpoint file exists
    /// (fresh harvest); parse failures are surfaced, not swallowed.
    pub fn load(&self) -> Result<Option<Checkpoint>, ResumeError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no checkpoint file; starting fresh");
            return Ok(None);
        }

        let lock = RwLock::new(self.lock_file()?);
        let _guard = lock
            .read()
            .map_err(|e| ResumeError::Lock(format!("failed to acquire read lock: {e}")))?;

        let contents =
            std::fs::read_to_string(&self.path).map_err(|e| ResumeError::Io(e.to_string()))?;
        let checkpoint: Checkpoint = serde_json::from_str(&contents)?;

        info!(
            cursor_prefix = checkpoint.cursor_prefix(),
            chunk_counter = checkpoint.chunk_counter,
            "checkpoint loaded"
        );
        Ok(Some(checkpoint))
    }

    /// Overwrite the checkpoint file. Called exactly once per run, after the
    /// final flush.
    pub fn save(&self, checkpoint: &Checkpoint) -> Result<(), ResumeError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| ResumeError::Io(e.to_string()))?;
            }
        }

        let json = serde_json::to_string_pretty(checkpoint)?;

        let lock_file = self.lock_file()?;
        let mut lock = RwLock::new(lock_file);
        let _guard = lock
            .write()
            .map_err(|e| ResumeError::Lock(format!("failed to acquire write lock: {e}")))?;

        let parent_dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut temp_file = tempfile::NamedTempFile::new_in(parent_dir)
            .map_err(|e| ResumeError::Io(format!("failed to create temp file: {e}")))?;

        temp_file
            .write_all(json.as_bytes())
            .map_err(|e| ResumeError::Io(format!("failed to write temp file: {e}")))?;
        temp_file
            .flush()
            .map_err(|e| ResumeError::Io(format!("failed to flush temp file: {e}")))?;
        temp_file
            .as_file()
            .sync_all()
            .map_err(|e| ResumeError::Io(format!("failed to sync temp file: {e}")))?;

        temp_file
            .persist(&self.path)
            .map_err(|e| ResumeError::Io(format!("failed to persist checkpoint: {e}")))?;

        // Make the rename itself durable.
        if let Ok(dir) = std::fs::File::open(parent_dir) {
            let _ = dir.sync_all();
        }

        info!(
            path = %self.path.display(),
            cursor_prefix = checkpoint.cursor_prefix(),
            chunk_counter = checkpoint.chunk_counter,
            "checkpoint saved"
        );
        Ok(())
    }

    fn lock_file(&self) -> Result<std::fs::File, ResumeError> {
        let lock_path = self.path.with_extension("lock");
        OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| ResumeError::Lock(format!("failed to open lock file: {e}")))
    }
}
