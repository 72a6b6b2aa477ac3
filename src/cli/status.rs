//! Status command implementation

use clap::Args;
use std::path::PathBuf;

use super::CliError;
use crate::resume::CheckpointStore;

/// Arguments for the `status` command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Checkpoint file path
    #[arg(long, default_value = "cursor_state.json")]
    pub state_file: PathBuf,
}

impl StatusArgs {
    /// Print the persisted checkpoint, if any.
    pub fn execute(&self) -> Result<(), CliError> {
        let store = CheckpointStore::new(&self.state_file);
        match store.load()? {
            Some(checkpoint) => {
                println!(
                    "checkpoint: {} chunks written, cursor starts with {:?}",
                    checkpoint.chunk_counter,
                    checkpoint.cursor_prefix()
                );
            }
            None => {
                println!(
                    "no checkpoint at {}; next harvest starts fresh",
                    self.state_file.display()
                );
            }
        }
        Ok(())
    }
}
