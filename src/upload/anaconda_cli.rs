//! Upload through the `anaconda` command line client.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::Uploader;
use crate::error::{Result, UploadCommandError};

/// Default executable name of the anaconda client
const ANACONDA_PROGRAM: &str = "anaconda";

/// Runs `anaconda upload` for each distribution
#[derive(Debug, Clone, Default)]
pub struct AnacondaCli {
    program: Option<PathBuf>,
}

impl AnacondaCli {
    /// Use `program` instead of looking `anaconda` up on `PATH`
    pub fn new(program: Option<PathBuf>) -> Self {
        Self { program }
    }

    /// Resolve the executable, searching `PATH` unless overridden
    pub fn resolve_program(&self) -> Result<PathBuf> {
        if let Some(program) = &self.program {
            return Ok(program.clone());
        }
        which::which(ANACONDA_PROGRAM).map_err(|e| {
            UploadCommandError::ClientNotFound {
                program: ANACONDA_PROGRAM.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Arguments passed to the client for one upload
    pub fn upload_args(
        token_file: &Path,
        artifact: &Path,
        owner: &str,
        channel: &str,
    ) -> Vec<OsString> {
        vec![
            "--quiet".into(),
            "-t".into(),
            token_file.as_os_str().to_owned(),
            "upload".into(),
            artifact.as_os_str().to_owned(),
            format!("--user={owner}").into(),
            format!("--channel={channel}").into(),
        ]
    }
}

impl Uploader for AnacondaCli {
    async fn upload(
        &self,
        token_file: &Path,
        artifact: &Path,
        owner: &str,
        channel: &str,
    ) -> Result<()> {
        let program = self.resolve_program()?;
        let args = Self::upload_args(token_file, artifact, owner, channel);
        log::debug!(
            "Running {} upload {} --user={owner} --channel={channel}",
            program.display(),
            artifact.display()
        );

        let status = tokio::process::Command::new(&program)
            .args(&args)
            .status()
            .await
            .map_err(|source| UploadCommandError::SpawnFailed {
                program: program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(UploadCommandError::NonZeroExit {
                artifact: artifact.to_path_buf(),
                status,
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_args_match_client_flags() {
        let args = AnacondaCli::upload_args(
            Path::new("/tmp/x/binstar.token"),
            Path::new("/bld/linux-64/bar-2.0-0.tar.bz2"),
            "conda-forge",
            "main",
        );
        let args: Vec<String> = args
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            [
                "--quiet",
                "-t",
                "/tmp/x/binstar.token",
                "upload",
                "/bld/linux-64/bar-2.0-0.tar.bz2",
                "--user=conda-forge",
                "--channel=main",
            ]
        );
    }

    #[test]
    fn explicit_program_skips_path_lookup() {
        let cli = AnacondaCli::new(Some(PathBuf::from("/opt/bin/anaconda")));
        assert_eq!(
            cli.resolve_program().expect("program"),
            PathBuf::from("/opt/bin/anaconda")
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_is_an_error() {
        let cli = AnacondaCli::new(Some(PathBuf::from("false")));
        let err = cli
            .upload(
                Path::new("token"),
                Path::new("noarch/foo-1.0-0.tar.bz2"),
                "me",
                "main",
            )
            .await
            .expect_err("false exits non-zero");
        assert!(matches!(
            err,
            crate::error::UploadError::Upload(UploadCommandError::NonZeroExit { .. })
        ));
        assert!(err.is_recoverable());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn zero_exit_is_success() {
        let cli = AnacondaCli::new(Some(PathBuf::from("true")));
        cli.upload(
            Path::new("token"),
            Path::new("noarch/foo-1.0-0.tar.bz2"),
            "me",
            "main",
        )
        .await
        .expect("true exits zero");
    }
}
