//! anaconda.org implementation of [`PackageIndex`].

use std::collections::HashMap;

use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use super::{ChannelListing, PackageIndex};
use crate::artifact::ArtifactRef;
use crate::config::Token;
use crate::error::{IndexError, Result};

/// anaconda.org REST API
pub const DEFAULT_API_URL: &str = "https://api.anaconda.org";

/// anaconda.org conda channel host
pub const DEFAULT_CHANNEL_URL: &str = "https://conda.anaconda.org";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Client for the anaconda.org API and channel host
#[derive(Debug, Clone)]
pub struct AnacondaApi {
    client: reqwest::Client,
    api_url: Url,
    channel_url: Url,
    token: Option<Token>,
}

#[derive(Debug, Deserialize)]
struct RepoData {
    #[serde(default)]
    info: Option<RepoInfo>,
    #[serde(default)]
    packages: HashMap<String, PackageRecord>,
}

#[derive(Debug, Deserialize)]
struct RepoInfo {
    subdir: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PackageRecord {
    subdir: Option<String>,
}

impl AnacondaApi {
    /// Create a client; `token` is sent with API requests when present
    pub fn new(api_url: &str, channel_url: &str, token: Option<Token>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| IndexError::Request {
                url: api_url.to_string(),
                source,
            })?;
        Self::with_client(client, api_url, channel_url, token)
    }

    /// Use a preconfigured HTTP client
    pub fn with_client(
        client: reqwest::Client,
        api_url: &str,
        channel_url: &str,
        token: Option<Token>,
    ) -> Result<Self> {
        Ok(Self {
            client,
            api_url: parse_base(api_url)?,
            channel_url: parse_base(channel_url)?,
            token,
        })
    }

    /// `{api}/dist/{owner}/{name}/{version}/{platform}/{filename}`
    pub fn dist_url(&self, owner: &str, artifact: &ArtifactRef) -> Result<Url> {
        join_segments(
            &self.api_url,
            &[
                "dist",
                owner,
                &artifact.name,
                &artifact.version,
                &artifact.platform,
                artifact.filename(),
            ],
        )
    }

    /// `{channel}/{owner}/label/{channel}/{platform}/repodata.json`
    pub fn repodata_url(&self, owner: &str, channel: &str, platform: &str) -> Result<Url> {
        join_segments(
            &self.channel_url,
            &[owner, "label", channel, platform, "repodata.json"],
        )
    }

    async fn get(&self, url: &Url, authenticated: bool) -> Result<Option<reqwest::Response>> {
        log::debug!("GET {url}");
        let mut request = self.client.get(url.clone());
        if authenticated && let Some(token) = &self.token {
            request = request.header(
                reqwest::header::AUTHORIZATION,
                format!("token {}", token.expose()),
            );
        }

        let response = request.send().await.map_err(|source| IndexError::Request {
            url: url.to_string(),
            source,
        })?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response)),
            status => Err(IndexError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into()),
        }
    }
}

impl PackageIndex for AnacondaApi {
    async fn distribution_exists(&self, owner: &str, artifact: &ArtifactRef) -> Result<bool> {
        let url = self.dist_url(owner, artifact)?;
        let Some(response) = self.get(&url, true).await? else {
            return Ok(false);
        };

        let malformed = |reason: String| IndexError::MalformedResponse {
            url: url.to_string(),
            reason,
        };
        let body = response.bytes().await.map_err(|e| malformed(e.to_string()))?;
        if body.trim_ascii().is_empty() {
            return Ok(false);
        }
        let record: serde_json::Value =
            serde_json::from_slice(&body).map_err(|e| malformed(e.to_string()))?;
        Ok(is_present(&record))
    }

    async fn channel_listing(
        &self,
        owner: &str,
        channel: &str,
        platform: &str,
    ) -> Result<ChannelListing> {
        let url = self.repodata_url(owner, channel, platform)?;
        let Some(response) = self.get(&url, false).await? else {
            log::debug!("No {channel} label for {owner}/{platform}");
            return Ok(ChannelListing::default());
        };

        let repodata: RepoData =
            response
                .json()
                .await
                .map_err(|e| IndexError::MalformedResponse {
                    url: url.to_string(),
                    reason: e.to_string(),
                })?;
        Ok(listing_from_repodata(repodata, platform))
    }
}

/// A distribution record counts as present unless it is empty
fn is_present(body: &serde_json::Value) -> bool {
    use serde_json::Value;
    match body {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(_) => true,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// Records without their own subdir inherit the repodata's, then the requested one
fn listing_from_repodata(repodata: RepoData, platform: &str) -> ChannelListing {
    let default_subdir = repodata
        .info
        .and_then(|info| info.subdir)
        .unwrap_or_else(|| platform.to_string());

    ChannelListing::new(repodata.packages.into_iter().map(|(file, record)| {
        let subdir = record.subdir.unwrap_or_else(|| default_subdir.clone());
        (file, subdir)
    }))
}

fn parse_base(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|_| IndexError::InvalidBaseUrl {
        url: raw.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(IndexError::InvalidBaseUrl {
            url: raw.to_string(),
        }
        .into());
    }
    Ok(url)
}

fn join_segments(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| IndexError::InvalidBaseUrl {
            url: base.to_string(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
