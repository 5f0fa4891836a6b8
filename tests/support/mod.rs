//! In-process stand-ins for anaconda.org and the anaconda client.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use upload_or_check::error::{IndexError, Result, UploadCommandError};
use upload_or_check::{ArtifactRef, ChannelListing, PackageIndex, Uploader};

/// Index answering from fixed sets
#[derive(Default)]
pub struct FakeIndex {
    /// `<platform>/<filename>` keys the owner already has
    pub existing: HashSet<String>,
    /// platform -> (filename, subdir) pairs on the channel label
    pub labels: HashMap<String, Vec<(String, String)>>,
    /// Number of lookups that fail before answers are given
    pub failures_before_success: Cell<u32>,
    /// Every channel listing request fails
    pub listing_unavailable: bool,
    pub lookups: Cell<u32>,
    pub listing_requests: RefCell<Vec<String>>,
}

impl FakeIndex {
    pub fn with_existing(keys: &[&str]) -> Self {
        Self {
            existing: keys.iter().map(|k| (*k).to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn label(mut self, platform: &str, files: &[&str]) -> Self {
        self.labels.insert(
            platform.to_string(),
            files
                .iter()
                .map(|f| ((*f).to_string(), platform.to_string()))
                .collect(),
        );
        self
    }

    pub fn without_listings(mut self) -> Self {
        self.listing_unavailable = true;
        self
    }
}

impl PackageIndex for FakeIndex {
    async fn distribution_exists(&self, _owner: &str, artifact: &ArtifactRef) -> Result<bool> {
        self.lookups.set(self.lookups.get() + 1);
        let remaining = self.failures_before_success.get();
        if remaining > 0 {
            self.failures_before_success.set(remaining - 1);
            return Err(IndexError::Status {
                url: format!("fake://dist/{}", artifact.relative),
                status: 503,
            }
            .into());
        }
        Ok(self.existing.contains(&artifact.relative))
    }

    async fn channel_listing(
        &self,
        _owner: &str,
        _channel: &str,
        platform: &str,
    ) -> Result<ChannelListing> {
        self.listing_requests.borrow_mut().push(platform.to_string());
        if self.listing_unavailable {
            return Err(IndexError::Status {
                url: format!("fake://label/{platform}/repodata.json"),
                status: 503,
            }
            .into());
        }
        Ok(self
            .labels
            .get(platform)
            .map(|files| ChannelListing::new(files.clone()))
            .unwrap_or_default())
    }
}

/// What the uploader saw for one call
#[derive(Debug, Clone)]
pub struct UploadCall {
    pub token_file: PathBuf,
    pub token_contents: Option<String>,
    pub artifact: PathBuf,
    pub owner: String,
    pub channel: String,
}

/// Uploader recording its calls, optionally failing on a file name
#[derive(Default)]
pub struct RecordingUploader {
    pub calls: RefCell<Vec<UploadCall>>,
    pub fail_on: Option<String>,
}

impl RecordingUploader {
    pub fn failing_on(file_name: &str) -> Self {
        Self {
            fail_on: Some(file_name.to_string()),
            ..Self::default()
        }
    }

    pub fn uploaded_names(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| c.artifact.file_name().and_then(|f| f.to_str()).map(str::to_string))
            .collect()
    }
}

impl Uploader for RecordingUploader {
    async fn upload(
        &self,
        token_file: &Path,
        artifact: &Path,
        owner: &str,
        channel: &str,
    ) -> Result<()> {
        self.calls.borrow_mut().push(UploadCall {
            token_file: token_file.to_path_buf(),
            token_contents: std::fs::read_to_string(token_file).ok(),
            artifact: artifact.to_path_buf(),
            owner: owner.to_string(),
            channel: channel.to_string(),
        });

        let failing = self
            .fail_on
            .as_deref()
            .is_some_and(|name| artifact.file_name().and_then(|f| f.to_str()) == Some(name));
        if failing {
            return Err(UploadCommandError::SpawnFailed {
                program: PathBuf::from("anaconda"),
                source: std::io::Error::other("simulated upload failure"),
            }
            .into());
        }
        Ok(())
    }
}

/// Create empty files under `root`, e.g. `linux-64/foo-1.0-0.tar.bz2`
pub fn touch_all(root: &Path, relative: &[&str]) {
    for rel in relative {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create build dir");
        }
        std::fs::write(&path, b"").expect("write artifact");
    }
}
