//! Checkpoint persistence for resumable harvests

pub mod checkpoint;
pub mod store;

pub use checkpoint::Checkpoint;
pub use store::CheckpointStore;

/// Errors related to checkpoint persistence
#[derive(Debug, thiserror::Error)]
pub enum ResumeError {
    /// IO error
    #[error("IO error: {0}")]
    Io(String),

    /// Checkpoint (de)serialization error
    #[error("checkpoint serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Lock error
    #[error("lock error: {0}")]
    Lock(String),
}
