//! Remote package index queries.
//!
//! The orchestrator only needs two questions answered: does this exact
//! distribution exist for an owner, and which files carry a given channel
//! label. [`PackageIndex`] captures both so tests can substitute an
//! in-process index for anaconda.org.

mod anaconda;

pub use anaconda::{AnacondaApi, DEFAULT_API_URL, DEFAULT_CHANNEL_URL};

use std::collections::HashMap;

use crate::artifact::ArtifactRef;
use crate::error::Result;

/// Read access to a remote package index
#[allow(async_fn_in_trait)]
pub trait PackageIndex {
    /// Whether `artifact` is already published under `owner`.
    ///
    /// A "not found" answer is `Ok(false)`; every other failure is an error.
    async fn distribution_exists(&self, owner: &str, artifact: &ArtifactRef) -> Result<bool>;

    /// Files labelled `channel` for `owner` in the `platform` subdir.
    ///
    /// A label or subdir that does not exist yields an empty listing.
    async fn channel_listing(
        &self,
        owner: &str,
        channel: &str,
        platform: &str,
    ) -> Result<ChannelListing>;
}

/// Filenames on a channel label, with the subdir each record declares
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelListing {
    packages: HashMap<String, String>,
}

impl ChannelListing {
    /// Build from `(filename, subdir)` pairs
    pub fn new<I, K, V>(packages: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            packages: packages
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Whether the label carries this exact file for the artifact's platform
    pub fn contains(&self, artifact: &ArtifactRef) -> bool {
        self.packages
            .get(artifact.filename())
            .is_some_and(|subdir| *subdir == artifact.platform)
    }

    /// Number of files on the label
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Whether the label is empty
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}
