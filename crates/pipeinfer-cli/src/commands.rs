//! Main commands enum.

use clap::Subcommand;
use std::path::PathBuf;

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one or more image or video files through the worker
    Infer {
        /// Input files, processed in order by a single worker
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Print one JSON object per file instead of a text report
        #[arg(long)]
        json: bool,
    },

    /// Start the worker, wait until it is ready, then stop it
    Check,

    /// Print the effective settings as JSON
    Settings,
}
