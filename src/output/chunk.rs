//! Chunk writer for raw harvest batches
//!
//! Buffers fetched records and flushes them as gzip-compressed JSON Lines
//! files. Filenames embed the zero-padded chunk counter and the current UTC
//! date, so operators can tie every file back to a checkpointed run and the
//! strictly increasing counter rules out collisions within a run.

use chrono::{DateTime, Utc};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use super::OutputResult;
use crate::Record;

/// Build the output path for a chunk: `scopus_raw_{counter:06}_{YYYYMMDD}.jsonl.gz`.
pub fn chunk_path(out_dir: &Path, counter: u64, date: DateTime<Utc>) -> PathBuf {
    out_dir.join(format!(
        "scopus_raw_{counter:06}_{}.jsonl.gz",
        date.format("%Y%m%d")
    ))
}

/// Buffering writer for compressed record batches.
///
/// Owns the record buffer exclusively; the paginator appends pages and
/// decides when to flush. The buffer is cleared only after a flush fully
/// succeeds, so a failed flush leaves the records available for the caller
/// to surface the error with nothing silently dropped.
pub struct ChunkWriter {
    out_dir: PathBuf,
    buffer: Vec<Record>,
}

impl ChunkWriter {
    /// Create a writer targeting `out_dir`. The directory must exist.
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            buffer: Vec::new(),
        }
    }

    /// Append one page of records to the buffer, preserving API order.
    pub fn append(&mut self, records: Vec<Record>) {
        self.buffer.extend(records);
    }

    /// Whether the buffer holds any unflushed records.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Write the buffer as one compressed chunk file and clear it.
    ///
    /// One record per line, newline-delimited, UTF-8. A half-written file
    /// from a crash mid-flush is an accepted risk; there is no partial-file
    /// recovery.
    pub fn flush(&mut self, counter: u64) -> OutputResult<PathBuf> {
        let path = chunk_path(&self.out_dir, counter, Utc::now());
        let file = File::create(&path)?;
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());

        for record in &self.buffer {
            serde_json::to_writer(&mut encoder, record)?;
            encoder.write_all(b"\n")?;
        }
        encoder.finish()?.flush()?;

        info!(
            chunk = counter,
            docs = self.buffer.len(),
            path = %path.display(),
            "chunk flushed"
        );

        self.buffer.clear();
        Ok(path)
    }
}
