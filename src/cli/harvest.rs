//! Harvest command implementation
//!
//! Peripheral glue around the engine: credential loading, directory setup,
//! component wiring, and the end-of-run summary.

use clap::Args;
use std::path::PathBuf;
use tracing::info;

use super::CliError;
use crate::client::query::SearchQuery;
use crate::client::SearchClient;
use crate::config::HarvestConfig;
use crate::harvester::Paginator;
use crate::output::ChunkWriter;
use crate::resume::CheckpointStore;

/// Environment variable holding the API credential.
const API_KEY_VAR: &str = "SCOPUS_API_KEY";

/// Arguments for the `harvest` command
#[derive(Args, Debug)]
pub struct HarvestArgs {
    /// Search expression, e.g. "AFFIL('Example University')"
    #[arg(long)]
    pub query: String,

    /// Publication date range
    #[arg(long, default_value = "2023-2026")]
    pub date_range: String,

    /// Documents per page
    #[arg(long, default_value_t = 25)]
    pub page_size: u32,

    /// Per-run request quota
    #[arg(long, default_value_t = crate::config::MAX_REQS_PER_RUN)]
    pub max_requests: u32,

    /// Requests per chunk flush
    #[arg(long, default_value_t = crate::config::CHUNK_SIZE_REQS)]
    pub chunk_size: u32,

    /// Requests allowed per second
    #[arg(long, default_value_t = crate::config::MAX_RPS)]
    pub max_rps: usize,

    /// Output directory for chunk files
    #[arg(long, default_value = "Data/raw")]
    pub out_dir: PathBuf,

    /// Checkpoint file path
    #[arg(long, default_value = "cursor_state.json")]
    pub state_file: PathBuf,

    /// Search endpoint base URL
    #[arg(long, default_value = crate::config::DEFAULT_BASE_URL)]
    pub base_url: String,
}

impl HarvestArgs {
    /// Run one harvest to a terminal condition.
    pub async fn execute(&self) -> Result<(), CliError> {
        let api_key = std::env::var(API_KEY_VAR).map_err(|_| {
            CliError::Configuration(format!(
                "{API_KEY_VAR} not set. Export it or add it to a .env file."
            ))
        })?;

        let config = self.to_config();
        std::fs::create_dir_all(&config.out_dir)?;

        let client = SearchClient::new(&config, api_key)?;
        let writer = ChunkWriter::new(&config.out_dir);
        let store = CheckpointStore::new(&config.state_file);
        let checkpoint = store.load()?;

        let mut query = SearchQuery::new(&self.query);
        query.date_range = self.date_range.clone();
        query.page_size = self.page_size;

        let paginator = Paginator::new(&config, client, writer, store, query, checkpoint);
        let report = paginator.run().await?;

        let elapsed = report.elapsed.as_secs_f64();
        info!(
            reason = %report.reason,
            requests = report.counters.requests_done,
            docs = report.counters.total_docs,
            chunks = report.chunks_written,
            last_cover_date = report.last_cover_date.as_deref().unwrap_or("n/a"),
            elapsed = format_args!("{elapsed:.1}s ({:.1}m)", elapsed / 60.0),
            "harvest complete"
        );
        Ok(())
    }

    fn to_config(&self) -> HarvestConfig {
        HarvestConfig {
            base_url: self.base_url.clone(),
            max_requests_per_run: self.max_requests,
            chunk_size_requests: self.chunk_size,
            max_requests_per_window: self.max_rps,
            out_dir: self.out_dir.clone(),
            state_file: self.state_file.clone(),
            ..HarvestConfig::default()
        }
    }
}
