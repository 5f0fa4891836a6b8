//! Command execution.

pub mod retry;
mod upload;

use crate::cli::{Args, RuntimeConfig};
use crate::config::EnvConfig;
use crate::error::Result;

use upload::execute_upload;

/// Exit status for arguments that fail validation
const EXIT_INVALID_ARGS: i32 = 2;

/// Execute the command described by parsed arguments
pub async fn execute_command(args: Args) -> Result<i32> {
    if let Err(validation_error) = args.validate() {
        let output = super::OutputManager::new(false);
        output.error(&format!("Invalid arguments: {validation_error}"));
        return Ok(EXIT_INVALID_ARGS);
    }

    let config = RuntimeConfig::new();
    let env = EnvConfig::from_env();

    match execute_upload(&args, &config, &env).await {
        Ok(exit_code) => Ok(exit_code),
        Err(e) => {
            config.error_println(&format!("Upload failed: {e}"));

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                // Best effort: the error itself has already reached stderr
                let _ = config.println("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    let _ = config.indent(&format!("• {suggestion}"));
                }
            }

            Ok(1)
        }
    }
}
