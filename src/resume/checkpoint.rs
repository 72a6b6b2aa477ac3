//! Checkpoint type
//!
//! The minimal durable state of a harvest: where pagination stands and how
//! many chunk files exist. Written once at the end of every run, read once
//! at startup.

use serde::{Deserialize, Serialize};

use crate::client::query::CURSOR_START;

/// Persisted harvest position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Opaque pagination cursor; the next request is issued with this value.
    pub cursor: String,
    /// Number of chunk files successfully written across all runs.
    pub chunk_counter: u64,
}

impl Checkpoint {
    /// State of a harvest that has not started: start cursor, no chunks.
    pub fn fresh() -> Self {
        Self {
            cursor: CURSOR_START.to_string(),
            chunk_counter: 0,
        }
    }

    /// Cursor prefix safe for logging (cursors can run to hundreds of bytes).
    pub fn cursor_prefix(&self) -> &str {
        let mut end = self.cursor.len().min(20);
        while !self.cursor.is_char_boundary(end) {
            end -= 1;
        }
        &self.cursor[..end]
    }
}
