//! Latest-release lookup and checksum artifact fetch against GitHub.

use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::config::ReleaseConfig;
use crate::error::UpdateError;
use crate::http;

/// The only part of the `releases/latest` payload we need.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub tag_name: String,
}

/// Client for one repository's releases.
#[derive(Debug, Clone)]
pub struct GitHubReleases {
    cfg: ReleaseConfig,
    timeout: Duration,
    token: Option<String>,
}

impl GitHubReleases {
    pub fn new(cfg: ReleaseConfig, timeout: Duration) -> Self {
        Self {
            cfg,
            timeout,
            token: None,
        }
    }

    /// Authenticate API requests (raises the GitHub rate limit).
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// `{api_base}/repos/{owner}/{repo}/releases/latest`
    pub fn latest_release_url(&self) -> Result<Url, UpdateError> {
        build_url(
            &self.cfg.api_base,
            &[
                "repos",
                self.cfg.owner.as_str(),
                self.cfg.repo.as_str(),
                "releases",
                "latest",
            ],
        )
    }

    /// `{download_base}/{owner}/{repo}/releases/download/{tag}/{asset}`
    pub fn checksum_url(&self, version: &str) -> Result<Url, UpdateError> {
        let tag = format!("{}{}", self.cfg.tag_prefix, version);
        let asset = format!(
            "{}-{}-{}.tar.xz.sha256",
            self.cfg.asset_prefix, version, self.cfg.arch
        );
        build_url(
            &self.cfg.download_base,
            &[
                self.cfg.owner.as_str(),
                self.cfg.repo.as_str(),
                "releases",
                "download",
                tag.as_str(),
                asset.as_str(),
            ],
        )
    }

    /// Fetch the newest published release and return its version (tag prefix stripped).
    pub fn latest_version(&self) -> Result<String, UpdateError> {
        let url = self.latest_release_url()?;
        let mut headers = vec![("Accept", "application/vnd.github+json".to_string())];
        if let Some(token) = &self.token {
            headers.push(("Authorization", format!("Bearer {}", token)));
        }
        let body = self.fetch(&url, &headers)?;
        let release: Release =
            serde_json::from_slice(&body).map_err(|source| UpdateError::Decode {
                url: url.to_string(),
                source,
            })?;
        tracing::debug!(tag = %release.tag_name, "latest release");
        version_from_tag(&release.tag_name, &self.cfg.tag_prefix)
    }

    /// Download the published `.sha256` artifact for `version`.
    pub fn checksum(&self, version: &str) -> Result<String, UpdateError> {
        let url = self.checksum_url(version)?;
        let body = self.fetch(&url, &[])?;
        parse_checksum(&String::from_utf8_lossy(&body)).ok_or_else(|| {
            UpdateError::InvalidChecksum {
                url: url.to_string(),
                content: String::from_utf8_lossy(&body).trim().to_string(),
            }
        })
    }

    fn fetch(&self, url: &Url, headers: &[(&str, String)]) -> Result<Vec<u8>, UpdateError> {
        tracing::info!("GET {}", url);
        let resp = http::get(url.as_str(), headers, self.timeout).map_err(|source| {
            tracing::info!("GET {} failed: {}", url, http::describe_curl_error(&source));
            UpdateError::Network {
                url: url.to_string(),
                source,
            }
        })?;
        if resp.code != 200 {
            return Err(UpdateError::HttpStatus {
                url: url.to_string(),
                code: resp.code,
            });
        }
        Ok(resp.body)
    }
}

fn build_url(base: &str, segments: &[&str]) -> Result<Url, UpdateError> {
    let mut url = Url::parse(base).map_err(|e| UpdateError::Url(format!("{}: {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| UpdateError::Url(format!("{}: cannot be a base", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Strip one leading `prefix` from `tag` and check the rest is safe to splice
/// into a URL and a quoted file field.
pub fn version_from_tag(tag: &str, prefix: &str) -> Result<String, UpdateError> {
    let version = tag.strip_prefix(prefix).unwrap_or(tag);
    let valid = !version.is_empty()
        && version
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+' | '_'));
    if !valid {
        return Err(UpdateError::InvalidTag(tag.to_string()));
    }
    Ok(version.to_string())
}

/// Extract a SHA-256 hex digest from an artifact body.
///
/// Accepts a bare digest or `sha256sum` output (`<digest>  <file>`).
pub fn parse_checksum(body: &str) -> Option<String> {
    let digest = body.split_whitespace().next()?;
    match hex::decode(digest) {
        Ok(bytes) if bytes.len() == 32 => Some(digest.to_ascii_lowercase()),
        _ => None,
    }
}
