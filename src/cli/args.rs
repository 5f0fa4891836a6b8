//! Command line argument parsing and validation.

use std::path::PathBuf;

use clap::Parser;

use super::retry_config::DEFAULT_MAX_ATTEMPTS;
use crate::index::{DEFAULT_API_URL, DEFAULT_CHANNEL_URL};

/// Upload or check consistency of built conda distributions with anaconda.org
#[derive(Parser, Debug, Clone)]
#[command(
    name = "upload_or_check",
    version,
    about = "Upload or check consistency of built conda distributions with anaconda.org",
    long_about = "Upload or check consistency of a built version of a conda recipe with anaconda.org.

Distributions already published for OWNER are reported and skipped; new ones
are uploaded with the anaconda client. Whether uploads actually take place is
decided by the BINSTAR_TOKEN environment variable: without it the run only
reports which distributions would be uploaded.

Usage:
  upload_or_check ./recipe conda-forge
  upload_or_check ./recipe my-org --channel dev -m .ci_support/linux_64_.yaml"
)]
pub struct Args {
    /// The conda recipe directory
    #[arg(index = 1, value_name = "RECIPE_DIR")]
    pub recipe_dir: PathBuf,

    /// The anaconda.org owner/user
    #[arg(index = 2, value_name = "OWNER")]
    pub owner: String,

    /// The anaconda label channel
    #[arg(long, default_value = "main")]
    pub channel: String,

    /// After the pass, warn about existing distributions missing from the channel label
    #[arg(long)]
    pub check_channel: bool,

    /// Path to conda_build_config.yaml defining your base matrix
    #[arg(long, short = 'm', value_name = "PATH")]
    pub variant: Vec<PathBuf>,

    /// conda-build output root containing noarch/ and the platform subdir
    #[arg(long, env = "CONDA_BLD_PATH", value_name = "DIR")]
    pub build_root: Option<PathBuf>,

    /// Platform subdir to scan besides noarch (defaults to the host platform)
    #[arg(long, env = "CONDA_SUBDIR")]
    pub subdir: Option<String>,

    /// anaconda.org API base URL
    #[arg(long, env = "BINSTAR_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Conda channel host used for channel label listings
    #[arg(long, env = "CONDA_CHANNEL_URL", default_value = DEFAULT_CHANNEL_URL)]
    pub channel_url: String,

    /// Number of attempts before giving up
    #[arg(long, env = "UPLOAD_MAX_ATTEMPTS", default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    /// anaconda client executable (defaults to `anaconda` on PATH)
    #[arg(long, env = "ANACONDA_BIN", value_name = "PATH")]
    pub anaconda_bin: Option<PathBuf>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if !self.recipe_dir.is_dir() {
            return Err(format!(
                "Recipe directory '{}' does not exist or is not a directory",
                self.recipe_dir.display()
            ));
        }

        if self.owner.trim().is_empty() {
            return Err("Owner must not be empty".to_string());
        }

        if self.channel.trim().is_empty() {
            return Err("Channel must not be empty".to_string());
        }

        if let Some(missing) = self.variant.iter().find(|path| !path.is_file()) {
            return Err(format!(
                "Variant config '{}' does not exist or is not a file",
                missing.display()
            ));
        }

        Ok(())
    }
}

/// Runtime state shared by command executors
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl RuntimeConfig {
    /// Create runtime configuration
    pub fn new() -> Self {
        Self {
            output: super::OutputManager::new(false),
        }
    }

    /// Runtime configuration that prints nothing but errors
    pub fn quiet() -> Self {
        Self {
            output: super::OutputManager::new(true),
        }
    }

    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print message
    pub fn println(&self, message: &str) -> std::io::Result<()> {
        self.output.println(message)
    }

    /// Print error message (always shown)
    pub fn error_println(&self, message: &str) {
        self.output.error(message);
    }

    /// Print warning message
    pub fn warning_println(&self, message: &str) -> std::io::Result<()> {
        self.output.warn(message)
    }

    /// Print success message
    pub fn success_println(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print a section header
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        self.output.section(title)
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.output.indent(message)
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.output.is_quiet()
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).expect("valid arguments")
    }

    #[test]
    fn defaults() {
        let args = parse(&["upload_or_check", "recipe", "conda-forge"]);
        assert_eq!(args.recipe_dir, PathBuf::from("recipe"));
        assert_eq!(args.owner, "conda-forge");
        assert_eq!(args.channel, "main");
        assert!(args.variant.is_empty());
        assert!(!args.check_channel);
    }

    #[test]
    fn channel_check_is_opt_in() {
        let args = parse(&["upload_or_check", "recipe", "me", "--check-channel"]);
        assert!(args.check_channel);
    }

    #[test]
    fn variant_is_repeatable() {
        let args = parse(&[
            "upload_or_check",
            "recipe",
            "me",
            "--channel",
            "dev",
            "-m",
            "a.yaml",
            "--variant",
            "b.yaml",
        ]);
        assert_eq!(args.channel, "dev");
        assert_eq!(args.variant, [PathBuf::from("a.yaml"), PathBuf::from("b.yaml")]);
    }

    #[test]
    fn owner_is_required() {
        assert!(Args::try_parse_from(["upload_or_check", "recipe"]).is_err());
    }

    #[test]
    fn validate_checks_paths() {
        let recipe = tempfile::tempdir().expect("tempdir");
        let recipe_arg = recipe.path().to_str().expect("utf-8 tempdir");

        let args = parse(&["upload_or_check", recipe_arg, "me"]);
        assert!(args.validate().is_ok());

        let args = parse(&["upload_or_check", recipe_arg, "me", "-m", "/definitely/missing.yaml"]);
        assert!(args.validate().is_err());

        let args = parse(&["upload_or_check", "/definitely/missing", "me"]);
        assert!(args.validate().is_err());
    }
}
