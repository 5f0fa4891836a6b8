//! The upload-or-check command.

use crate::batch::{BatchContext, BatchOutcome, upload_or_check};
use crate::cli::{Args, RetryPolicy, RuntimeConfig};
use crate::config::{EnvConfig, TOKEN_ENV};
use crate::error::Result;
use crate::index::AnacondaApi;
use crate::upload::AnacondaCli;

use super::retry::retry_with_backoff;

/// Resolve configuration, then run upload passes until one succeeds
pub(super) async fn execute_upload(
    args: &Args,
    config: &RuntimeConfig,
    env: &EnvConfig,
) -> Result<i32> {
    let build_root = env.build_root(args.build_root.clone())?;
    let subdir = env.subdir(args.subdir.clone())?;
    let token = env.token();
    let policy = RetryPolicy::with_max_attempts(args.max_attempts);

    if !args.variant.is_empty() {
        log::debug!(
            "{} variant config(s) accepted; they do not affect which distributions are checked",
            args.variant.len()
        );
    }
    log::debug!("Recipe directory: {}", args.recipe_dir.display());

    config.section(&format!("{} / {}", args.owner, args.channel))?;
    config.indent(&format!("Build output: {} (noarch, {subdir})", build_root.display()))?;
    if token.is_none() {
        config.indent(&format!("{TOKEN_ENV} not set: checking only"))?;
    }

    let index = AnacondaApi::new(&args.api_url, &args.channel_url, token.clone())?;
    let uploader = AnacondaCli::new(args.anaconda_bin.clone());

    let ctx = BatchContext {
        build_root: &build_root,
        subdir: &subdir,
        owner: &args.owner,
        channel: &args.channel,
        check_channel: args.check_channel,
        token: token.as_ref(),
        index: &index,
        uploader: &uploader,
        config,
    };

    let outcome = retry_with_backoff(|| upload_or_check(&ctx), &policy, "Upload", config).await?;
    report(&outcome, config)?;
    Ok(0)
}

fn report(outcome: &BatchOutcome, config: &RuntimeConfig) -> Result<()> {
    if outcome.total() == 0 {
        config.warning_println("No built distributions found")?;
        return Ok(());
    }

    let summary = format!(
        "{} distribution(s): {} already present, {} uploaded, {} skipped",
        outcome.total(),
        outcome.existing.len(),
        outcome.uploaded.len(),
        outcome.skipped.len()
    );
    if outcome.upload_performed {
        config.success_println(&summary)?;
    } else {
        config.println(&summary)?;
    }
    Ok(())
}
