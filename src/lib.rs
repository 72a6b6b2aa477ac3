//! # Scopus Harvester Library
//!
//! Incremental, resumable harvester for the Elsevier Scopus Search API.
//! Walks a cursor-paginated result set under a request-rate cap, buffers raw
//! records, and flushes them to gzip-compressed JSON Lines chunk files. A
//! two-field checkpoint (cursor + chunk counter) written at the end of every
//! run lets an interrupted harvest pick up where it left off.
//!
//! ## Features
//!
//! - **Resume Capability**: durable cursor checkpointing across process restarts
//! - **Rate Limiting**: sliding-window limiter bounding requests per second
//! - **Bounded Retry**: linear-backoff retries on transient network failure
//! - **Chunked Output**: date-stamped, counter-named `.jsonl.gz` batch files
//! - **Opaque Records**: payloads pass through verbatim, no schema imposed
//!
//! ## Architecture
//!
//! - [`client`] - rate-limited HTTP transport with bounded retry
//! - [`harvester`] - the pagination engine and its stop-reason state machine
//! - [`output`] - buffered, compressed chunk writing
//! - [`resume`] - checkpoint persistence with atomic writes
//! - [`config`] - run configuration and retry timing
//! - [`cli`] - command implementations

#![warn(missing_docs)]
#![warn(clippy::all)]

/// CLI command implementations
pub mod cli;

/// Rate-limited search API transport
pub mod client;

/// Harvest configuration
pub mod config;

/// Pagination engine
pub mod harvester;

/// Compressed chunk output
pub mod output;

/// Checkpoint persistence
pub mod resume;

/// One raw search result: an opaque JSON object passed through verbatim.
pub type Record = serde_json::Map<String, serde_json::Value>;

pub use config::HarvestConfig;
pub use harvester::{HarvestReport, Paginator, StopReason};
