//! Command line interface for upload_or_check.
//!
//! Argument parsing, colored output, retry configuration and the command
//! executor that ties them to the upload batch.

mod args;
pub mod commands;
mod output;
mod retry_config;

pub use args::{Args, RuntimeConfig};
pub use commands::execute_command;
pub use commands::retry::retry_with_backoff;
pub use output::OutputManager;
pub use retry_config::{DEFAULT_MAX_ATTEMPTS, MAX_ATTEMPTS_LIMIT, RetryPolicy};

use crate::error::Result;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    execute_command(args).await
}
