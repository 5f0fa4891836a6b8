//! Uploading distributions and handling the credential they need.

mod anaconda_cli;

pub use anaconda_cli::AnacondaCli;

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::config::Token;
use crate::error::Result;

/// File name the upload client reads the token from
const TOKEN_FILE_NAME: &str = "binstar.token";

/// Pushes a single distribution to the remote host
#[allow(async_fn_in_trait)]
pub trait Uploader {
    /// Upload `artifact` for `owner` onto `channel`, authenticating with `token_file`.
    ///
    /// Returns once the upload has finished; a failed upload is an error.
    async fn upload(
        &self,
        token_file: &Path,
        artifact: &Path,
        owner: &str,
        channel: &str,
    ) -> Result<()>;
}

/// A token written to a private temporary directory.
///
/// The directory and the file inside it are removed when this guard drops,
/// whether the uploads that used it succeeded or not.
#[derive(Debug)]
pub struct TokenFile {
    dir: TempDir,
    path: PathBuf,
}

impl TokenFile {
    /// Write `token` to a fresh temporary directory
    pub fn create(token: &Token) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("upload-or-check-")
            .tempdir()?;
        let path = dir.path().join(TOKEN_FILE_NAME);
        std::fs::write(&path, token.expose())?;
        log::debug!("Wrote upload credential to {}", path.display());
        Ok(Self { dir, path })
    }

    /// Path of the token file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the token file
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_file_is_removed_on_drop() {
        let token = Token::new("s3cret");
        let file = TokenFile::create(&token).expect("token file");
        let dir = file.dir().to_path_buf();

        assert_eq!(std::fs::read_to_string(file.path()).expect("read"), "s3cret");
        assert_eq!(file.path().file_name().and_then(|f| f.to_str()), Some("binstar.token"));

        drop(file);
        assert!(!dir.exists());
    }
}
