//! Pagination engine
//!
//! Drives the page-by-page walk through the search results: each iteration
//! fetches one page through the rate-limited client, buffers its entries,
//! advances the cursor, and periodically flushes a chunk. Every way a run
//! can end funnels through the same shutdown sequence, a final flush of any
//! buffered records followed by exactly one checkpoint write, so the next
//! run resumes instead of restarting.

use tracing::{info, warn};

use crate::client::query::SearchQuery;
use crate::client::SearchClient;
use crate::config::HarvestConfig;
use crate::output::{ChunkWriter, OutputError};
use crate::resume::{Checkpoint, CheckpointStore, ResumeError};

pub mod progress;

use progress::ProgressState;

/// Why a run stopped.
///
/// `Exhausted` and `EndOfResults` converge on identical handling but stay
/// distinct so logs and reports can tell an empty page from a page that
/// simply carried no next cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The API returned a page with no entries.
    Exhausted,
    /// The last page carried entries but no next cursor.
    EndOfResults,
    /// The per-run request quota was reached.
    QuotaReached,
    /// Network retries exhausted or a non-success status was returned.
    TransportFailure,
}

impl StopReason {
    /// Stable label for logs and reports.
    pub fn as_str(self) -> &'static str {
        match self {
            StopReason::Exhausted => "exhausted",
            StopReason::EndOfResults => "end-of-results",
            StopReason::QuotaReached => "quota-reached",
            StopReason::TransportFailure => "transport-failure",
        }
    }
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-run counters, reset each run. Only `chunk_counter` survives a run,
/// and that lives in the checkpoint.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunCounters {
    /// Successful page requests this run.
    pub requests_done: u32,
    /// Documents buffered this run.
    pub total_docs: u64,
}

/// Summary of a finished run.
#[derive(Debug)]
pub struct HarvestReport {
    /// Why the run stopped.
    pub reason: StopReason,
    /// Per-run counters at stop time.
    pub counters: RunCounters,
    /// Chunk files written this run.
    pub chunks_written: u64,
    /// Cover date of the last buffered entry, for operator visibility when
    /// a run stops on quota.
    pub last_cover_date: Option<String>,
    /// Wall-clock duration of the run.
    pub elapsed: std::time::Duration,
}

/// Errors that abort the shutdown sequence itself. Transport problems never
/// appear here; they become a [`StopReason`] and the run still checkpoints.
#[derive(Debug, thiserror::Error)]
pub enum HarvestError {
    /// Chunk flush failed.
    #[error("output error: {0}")]
    Output(#[from] OutputError),

    /// Checkpoint persistence failed.
    #[error("resume error: {0}")]
    Resume(#[from] ResumeError),
}

enum Phase {
    Running,
    FlushPending(StopReason),
}

/// Cursor-driven paginator over the search API.
///
/// Owns the run state: the cursor, the per-run counters, and (through the
/// writer) the record buffer. Single logical thread of control; the only
/// suspension points are the limiter's wait and the network call.
pub struct Paginator {
    client: SearchClient,
    writer: ChunkWriter,
    store: CheckpointStore,
    query: SearchQuery,
    chunk_counter: u64,
    counters: RunCounters,
    chunk_size_requests: u32,
    max_requests_per_run: u32,
    last_cover_date: Option<String>,
}

impl Paginator {
    /// Assemble a paginator from its collaborators and the resume state.
    ///
    /// `query.cursor` is overwritten with the checkpointed cursor; a `None`
    /// checkpoint starts a fresh harvest from `"*"`.
    pub fn new(
        config: &HarvestConfig,
        client: SearchClient,
        writer: ChunkWriter,
        store: CheckpointStore,
        mut query: SearchQuery,
        checkpoint: Option<Checkpoint>,
    ) -> Self {
        let checkpoint = match checkpoint {
            Some(checkpoint) => {
                info!(
                    chunk_counter = checkpoint.chunk_counter,
                    cursor_prefix = checkpoint.cursor_prefix(),
                    "resuming harvest"
                );
                checkpoint
            }
            None => {
                info!("starting fresh harvest");
                Checkpoint::fresh()
            }
        };

        query.cursor = checkpoint.cursor;
        Self {
            client,
            writer,
            store,
            query,
            chunk_counter: checkpoint.chunk_counter,
            counters: RunCounters::default(),
            chunk_size_requests: config.chunk_size_requests.max(1),
            max_requests_per_run: config.max_requests_per_run,
            last_cover_date: None,
        }
    }

    /// Run the harvest to one of its terminal conditions.
    ///
    /// Always flushes leftover buffered records and writes the checkpoint
    /// before returning, whatever the stop reason.
    pub async fn run(mut self) -> Result<HarvestReport, HarvestError> {
        info!(
            max_requests = self.max_requests_per_run,
            chunk_size = self.chunk_size_requests,
            "starting run"
        );
        let mut progress = ProgressState::new(self.max_requests_per_run);
        let chunks_before = self.chunk_counter;

        let mut phase = Phase::Running;
        let reason = loop {
            if let Phase::FlushPending(reason) = phase {
                break reason;
            }
            phase = self.step(&mut progress).await?;
        };

        // Shutdown sequence: flush leftovers, then checkpoint, in that order.
        if !self.writer.is_empty() {
            self.chunk_counter += 1;
            self.writer.flush(self.chunk_counter)?;
        }
        self.store.save(&Checkpoint {
            cursor: self.query.cursor.clone(),
            chunk_counter: self.chunk_counter,
        })?;

        let report = HarvestReport {
            reason,
            counters: self.counters,
            chunks_written: self.chunk_counter - chunks_before,
            last_cover_date: self.last_cover_date,
            elapsed: progress.elapsed(),
        };
        info!(
            reason = %report.reason,
            requests = report.counters.requests_done,
            docs = report.counters.total_docs,
            chunks = report.chunks_written,
            elapsed_secs = report.elapsed.as_secs(),
            "run finished"
        );
        Ok(report)
    }

    /// One pagination iteration. Returns the next phase; flush errors
    /// propagate because without a successful flush there is nothing left
    /// to make durable.
    async fn step(&mut self, progress: &mut ProgressState) -> Result<Phase, HarvestError> {
        let page = match self.client.fetch_page(&self.query).await {
            Ok(page) => page,
            Err(err) => {
                warn!(error = %err, "transport failure; ending run");
                return Ok(Phase::FlushPending(StopReason::TransportFailure));
            }
        };

        if page.entries.is_empty() {
            info!("no more entries; dataset complete");
            return Ok(Phase::FlushPending(StopReason::Exhausted));
        }

        self.counters.requests_done += 1;
        self.counters.total_docs += page.entries.len() as u64;
        if let Some(date) = page.last_cover_date() {
            self.last_cover_date = Some(date);
        }
        let next_cursor = page.next_cursor;
        self.writer.append(page.entries);

        progress.record_request(self.counters.requests_done, self.counters.total_docs);

        match next_cursor {
            Some(cursor) => self.query.cursor = cursor,
            None => {
                info!("reached end of results; no next cursor");
                return Ok(Phase::FlushPending(StopReason::EndOfResults));
            }
        }

        if self.counters.requests_done % self.chunk_size_requests == 0 {
            self.chunk_counter += 1;
            self.writer.flush(self.chunk_counter)?;
        }

        if self.counters.requests_done >= self.max_requests_per_run {
            info!(
                quota = self.max_requests_per_run,
                last_cover_date = self.last_cover_date.as_deref().unwrap_or("unknown"),
                "request quota reached"
            );
            return Ok(Phase::FlushPending(StopReason::QuotaReached));
        }

        Ok(Phase::Running)
    }
}
