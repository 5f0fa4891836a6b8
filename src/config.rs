//! Environment-derived configuration.
//!
//! The process environment is snapshotted once into [`EnvConfig`] so that
//! credential resolution and default discovery can be exercised in tests
//! without touching the real environment.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use crate::error::{CliError, Result};

/// Environment variable holding the anaconda.org token
pub const TOKEN_ENV: &str = "BINSTAR_TOKEN";

/// Prefix of an unexpanded CI secret, e.g. Azure's `$(BINSTAR_TOKEN)` on PR builds
const UNRESOLVED_SECRET_PREFIX: &str = "$(";

/// Snapshot of environment variables
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    vars: HashMap<String, String>,
}

impl EnvConfig {
    /// Capture the current process environment
    pub fn from_env() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Build from explicit pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Look up a variable
    pub fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    /// Resolve the upload credential.
    ///
    /// Returns `None` when `BINSTAR_TOKEN` is unset, empty, or still holds an
    /// unexpanded `$(...)` secret reference.
    pub fn token(&self) -> Option<Token> {
        let raw = self.get(TOKEN_ENV)?;
        if raw.is_empty() || raw.starts_with(UNRESOLVED_SECRET_PREFIX) {
            log::debug!("{TOKEN_ENV} is empty or an unresolved placeholder; ignoring it");
            return None;
        }
        Some(Token(raw))
    }

    /// Resolve the conda-build output root.
    ///
    /// An explicit value wins, then `CONDA_BLD_PATH`, then `$CONDA_PREFIX/conda-bld`.
    pub fn build_root(&self, explicit: Option<PathBuf>) -> Result<PathBuf> {
        explicit
            .or_else(|| self.get("CONDA_BLD_PATH").map(PathBuf::from))
            .or_else(|| {
                self.get("CONDA_PREFIX")
                    .map(|prefix| PathBuf::from(prefix).join("conda-bld"))
            })
            .ok_or_else(|| {
                CliError::MissingArgument {
                    argument: "--build-root".to_string(),
                }
                .into()
            })
    }

    /// Resolve the platform subdir, falling back to the host platform
    pub fn subdir(&self, explicit: Option<String>) -> Result<String> {
        if let Some(subdir) = explicit.or_else(|| self.get("CONDA_SUBDIR")) {
            return Ok(subdir);
        }
        host_subdir(std::env::consts::OS, std::env::consts::ARCH)
            .map(str::to_string)
            .ok_or_else(|| {
                CliError::InvalidArguments {
                    reason: format!(
                        "No conda subdir known for {}/{}; pass --subdir",
                        std::env::consts::OS,
                        std::env::consts::ARCH
                    ),
                }
                .into()
            })
    }
}

/// Map a Rust OS/arch pair onto the conda subdir naming
pub fn host_subdir(os: &str, arch: &str) -> Option<&'static str> {
    host_subdir_for(os, arch, cfg!(target_endian = "little"))
}

/// conda only publishes little-endian ppc64
fn host_subdir_for(os: &str, arch: &str, little_endian: bool) -> Option<&'static str> {
    let subdir = match (os, arch) {
        ("linux", "x86_64") => "linux-64",
        ("linux", "x86") => "linux-32",
        ("linux", "aarch64") => "linux-aarch64",
        ("linux", "powerpc64") if little_endian => "linux-ppc64le",
        ("linux", "s390x") => "linux-s390x",
        ("macos", "x86_64") => "osx-64",
        ("macos", "aarch64") => "osx-arm64",
        ("windows", "x86_64") => "win-64",
        ("windows", "x86") => "win-32",
        ("windows", "aarch64") => "win-arm64",
        _ => return None,
    };
    Some(subdir)
}

/// An anaconda.org API token.
///
/// `Debug` and `Display` never print the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    /// Wrap a raw token
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw secret
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}
