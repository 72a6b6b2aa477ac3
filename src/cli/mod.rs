//! CLI command implementations

use clap::{Parser, Subcommand};

pub mod harvest;
pub mod status;

pub use harvest::HarvestArgs;
pub use status::StatusArgs;

use crate::harvester::HarvestError;
use crate::resume::ResumeError;

/// Scopus Harvester CLI
#[derive(Parser, Debug)]
#[command(name = "scopus-harvester")]
#[command(about = "Incrementally harvest raw records from the Scopus Search API", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run (or resume) a harvest
    Harvest(HarvestArgs),
    /// Show the persisted checkpoint
    Status(StatusArgs),
}

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Harvest run error
    #[error("harvest error: {0}")]
    Harvest(#[from] HarvestError),

    /// Checkpoint access error
    #[error("resume error: {0}")]
    Resume(#[from] ResumeError),

    /// HTTP client construction error
    #[error("client error: {0}")]
    Client(#[from] reqwest::Error),

    /// Missing or invalid startup configuration
    #[error("configuration error: {0}")]
    Configuration(String),

    /// IO error during setup
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
