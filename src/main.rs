//! upload_or_check - upload built conda distributions that anaconda.org does not have yet.
//!
//! Whether uploads actually happen is decided by the BINSTAR_TOKEN
//! environment variable; without it the run only reports.

use std::process;
use upload_or_check::cli;
use upload_or_check::cli::OutputManager;

#[tokio::main]
async fn main() {
    env_logger::init();

    match cli::run().await {
        Ok(exit_code) => {
            process::exit(exit_code);
        }
        Err(e) => {
            // Never quiet for fatal errors
            let output = OutputManager::new(false);
            output.error(&format!("Fatal error: {e}"));

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                let _ = output.println("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    let _ = output.indent(&suggestion);
                }
            }

            process::exit(1);
        }
    }
}
