//! Error types for upload_or_check operations.
//!
//! Each concern gets its own enum with actionable messages; everything folds
//! into [`UploadError`], which also decides what the retry loop may retry.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Result type alias for upload_or_check operations
pub type Result<T> = std::result::Result<T, UploadError>;

/// Main error type for all upload_or_check operations
#[derive(Error, Debug)]
pub enum UploadError {
    /// Built distribution could not be interpreted
    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    /// Remote package index errors
    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    /// Upload client errors
    #[error("Upload error: {0}")]
    Upload(#[from] UploadCommandError),

    /// CLI argument and configuration errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Every batch attempt failed
    #[error("Did not manage to upload package after {attempts} attempt(s). Failing. Last error: {last}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Message of the final failure
        last: String,
    },
}

/// Artifact filename parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArtifactError {
    /// Filename lacks the archive suffix
    #[error("Can only process packages that end in .tar.bz2: {path}")]
    UnsupportedSuffix {
        /// Offending path
        path: String,
    },

    /// Path is not `<platform>/<filename>`
    #[error("Expected '<platform>/<filename>', got '{path}'")]
    InvalidLayout {
        /// Offending path
        path: String,
    },

    /// Stem is not `name-version-build`
    #[error("Expected '<name>-<version>-<build>' in '{path}'")]
    InvalidName {
        /// Offending path
        path: String,
    },

    /// Path on disk is not valid UTF-8
    #[error("Non UTF-8 artifact path: {path}")]
    NonUtf8Path {
        /// Offending path
        path: PathBuf,
    },
}

/// Remote index lookup errors
#[derive(Error, Debug)]
pub enum IndexError {
    /// Transport failure
    #[error("Request to {url} failed: {source}")]
    Request {
        /// URL requested
        url: String,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// Non-success, non-404 status
    #[error("{url} returned HTTP {status}")]
    Status {
        /// URL requested
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// Body could not be decoded
    #[error("Malformed response from {url}: {reason}")]
    MalformedResponse {
        /// URL requested
        url: String,
        /// Reason for the error
        reason: String,
    },

    /// Base URL cannot carry path segments
    #[error("Invalid base URL '{url}'")]
    InvalidBaseUrl {
        /// Configured URL
        url: String,
    },
}

/// Upload client errors
#[derive(Error, Debug)]
pub enum UploadCommandError {
    /// Upload client not found on PATH
    #[error("Upload client '{program}' not found: {reason}")]
    ClientNotFound {
        /// Program name
        program: String,
        /// Reason for the error
        reason: String,
    },

    /// Upload client could not be started
    #[error("Failed to run '{program}': {source}")]
    SpawnFailed {
        /// Program path
        program: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Upload client exited unsuccessfully
    #[error("Upload of {artifact} exited with {status}")]
    NonZeroExit {
        /// Artifact being uploaded
        artifact: PathBuf,
        /// Exit status
        status: ExitStatus,
    },
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Missing required argument
    #[error("Missing required argument: {argument}")]
    MissingArgument {
        /// Argument name
        argument: String,
    },
}

impl UploadError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            UploadError::Artifact(_) => vec![
                "Remove stray files from the build output directories".to_string(),
                "Built packages must be named <name>-<version>-<build>.tar.bz2".to_string(),
            ],
            UploadError::Upload(UploadCommandError::ClientNotFound { .. }) => vec![
                "Install the anaconda client: conda install anaconda-client".to_string(),
                "Or point ANACONDA_BIN at the anaconda executable".to_string(),
            ],
            UploadError::Index(IndexError::Status { status: 401 | 403, .. }) => vec![
                "Check that BINSTAR_TOKEN is valid and can read the owner's packages".to_string(),
            ],
            UploadError::Cli(CliError::MissingArgument { argument }) if argument == "--build-root" => vec![
                "Pass --build-root or set CONDA_BLD_PATH".to_string(),
                "Or run inside an activated conda environment (CONDA_PREFIX)".to_string(),
            ],
            UploadError::RetriesExhausted { .. } => vec![
                "Check anaconda.org status and network connectivity".to_string(),
                "Re-run the job; distributions already uploaded will be skipped".to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            UploadError::Artifact(_)
                | UploadError::Cli(_)
                | UploadError::RetriesExhausted { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_errors_are_fatal() {
        let err = UploadError::from(ArtifactError::UnsupportedSuffix {
            path: "linux-64/foo-1.0-0.conda".to_string(),
        });
        assert!(!err.is_recoverable());
    }

    #[test]
    fn remote_failures_are_retryable() {
        let err = UploadError::from(IndexError::Status {
            url: "https://api.anaconda.org/dist/x".to_string(),
            status: 502,
        });
        assert!(err.is_recoverable());

        let io = UploadError::from(std::io::Error::other("disk"));
        assert!(io.is_recoverable());
    }

    #[test]
    fn exhausted_message_names_attempts() {
        let err = UploadError::RetriesExhausted {
            attempts: 9,
            last: "boom".to_string(),
        };
        assert!(err.to_string().contains("9 attempt(s)"));
        assert!(!err.recovery_suggestions().is_empty());
    }
}
