//! One upload-or-check pass over the local build output.
//!
//! A pass enumerates built distributions, asks the index which of them the
//! owner already has, and uploads the rest when a token is available. It
//! holds no state between passes; the retry loop simply runs it again.

use std::collections::HashMap;
use std::path::Path;

use crate::artifact::{ArtifactRef, built_distributions};
use crate::cli::RuntimeConfig;
use crate::config::{TOKEN_ENV, Token};
use crate::error::Result;
use crate::index::{ChannelListing, PackageIndex};
use crate::upload::{TokenFile, Uploader};

/// Everything one pass needs
pub struct BatchContext<'a, I, U> {
    /// conda-build output root
    pub build_root: &'a Path,
    /// Platform subdir scanned besides noarch
    pub subdir: &'a str,
    /// anaconda.org owner/user
    pub owner: &'a str,
    /// Label the uploads go to
    pub channel: &'a str,
    /// Warn about existing distributions missing from `channel`
    pub check_channel: bool,
    /// Upload credential; `None` means check only
    pub token: Option<&'a Token>,
    /// Remote index
    pub index: &'a I,
    /// Upload client
    pub uploader: &'a U,
    /// User-facing output
    pub config: &'a RuntimeConfig,
}

/// What a pass found and did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Distributions the owner already has
    pub existing: Vec<ArtifactRef>,
    /// Existing distributions missing from the requested channel label
    pub off_channel: Vec<ArtifactRef>,
    /// New distributions that were uploaded
    pub uploaded: Vec<ArtifactRef>,
    /// New distributions left alone because no token was available
    pub skipped: Vec<ArtifactRef>,
    /// Whether a token was available and uploads were attempted
    pub upload_performed: bool,
}

impl BatchOutcome {
    /// Number of distributions examined
    pub fn total(&self) -> usize {
        self.existing.len() + self.uploaded.len() + self.skipped.len()
    }
}

/// Run one pass: partition the built distributions and upload the new ones
pub async fn upload_or_check<I, U>(ctx: &BatchContext<'_, I, U>) -> Result<BatchOutcome>
where
    I: PackageIndex,
    U: Uploader,
{
    let built = built_distributions(ctx.build_root, ctx.subdir)?;
    log::info!(
        "Found {} built distribution(s) under {}",
        built.len(),
        ctx.build_root.display()
    );

    let mut existing = Vec::new();
    let mut new = Vec::new();
    for artifact in built {
        if ctx.index.distribution_exists(ctx.owner, &artifact).await? {
            existing.push(artifact);
        } else {
            new.push(artifact);
        }
    }

    for artifact in &existing {
        ctx.config.println(&format!(
            "Distribution {} already exists for {}",
            artifact.relative, ctx.owner
        ))?;
    }

    let mut outcome = BatchOutcome {
        existing,
        ..BatchOutcome::default()
    };

    match ctx.token {
        Some(token) => {
            let token_file = TokenFile::create(token)?;
            for artifact in new {
                ctx.uploader
                    .upload(token_file.path(), &artifact.path, ctx.owner, ctx.channel)
                    .await?;
                ctx.config
                    .success_println(&format!("Uploaded {}", artifact.relative))?;
                outcome.uploaded.push(artifact);
            }
            outcome.upload_performed = true;
        }
        None => {
            for artifact in new {
                ctx.config.warning_println(&format!(
                    "Distribution {} is new for {}, but no upload is taking place \
                     because the {TOKEN_ENV} is missing.",
                    artifact.relative, ctx.owner
                ))?;
                outcome.skipped.push(artifact);
            }
        }
    }

    if ctx.check_channel {
        outcome.off_channel = off_channel(ctx, &outcome.existing).await;
    }

    Ok(outcome)
}

/// Existing distributions that the channel label does not carry.
///
/// Each platform's listing is fetched once per pass. The check only warns:
/// a platform whose listing cannot be fetched is logged and skipped.
async fn off_channel<I, U>(
    ctx: &BatchContext<'_, I, U>,
    existing: &[ArtifactRef],
) -> Vec<ArtifactRef>
where
    I: PackageIndex,
{
    let mut listings: HashMap<&str, Option<ChannelListing>> = HashMap::new();
    let mut missing = Vec::new();

    for artifact in existing {
        let platform = artifact.platform.as_str();
        if !listings.contains_key(platform) {
            let listing = match ctx
                .index
                .channel_listing(ctx.owner, ctx.channel, platform)
                .await
            {
                Ok(listing) => Some(listing),
                Err(e) => {
                    log::warn!(
                        "Skipping channel check for {}/{platform}: {e}",
                        ctx.owner
                    );
                    None
                }
            };
            listings.insert(platform, listing);
        }

        let Some(Some(listing)) = listings.get(platform) else {
            continue;
        };
        if !listing.contains(artifact) {
            let _ = ctx.config.warning_println(&format!(
                "Distribution {} exists for {} but is not on channel '{}'",
                artifact.relative, ctx.owner, ctx.channel
            ));
            missing.push(artifact.clone());
        }
    }

    missing
}
