//! The update pipeline: read pinned version, look up latest release, and
//! rewrite the flake file when they differ.
//!
//! Order is fixed (API, then checksum, then file) so the file is only touched
//! after both remote fetches succeeded.

use crate::config::UpdaterConfig;
use crate::error::UpdateError;
use crate::release::GitHubReleases;
use crate::version_file::{self, Field};

/// Per-run switches that are not part of the config file.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Fetch everything but leave the file untouched.
    pub dry_run: bool,
    /// Bearer token for the releases API.
    pub github_token: Option<String>,
}

impl RunOptions {
    /// Options with the token taken from `GITHUB_TOKEN`, if set.
    pub fn from_env(dry_run: bool) -> Self {
        Self {
            dry_run,
            github_token: std::env::var("GITHUB_TOKEN").ok(),
        }
    }
}

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Pinned version already equals the latest release.
    UpToDate { version: String },
    /// File rewritten with the new version and checksum.
    Updated {
        from: String,
        to: String,
        checksum: String,
    },
    /// Dry run: an update is available but nothing was written.
    WouldUpdate {
        from: String,
        to: String,
        checksum: String,
    },
}

impl Outcome {
    pub fn current(&self) -> &str {
        match self {
            Outcome::UpToDate { version } => version,
            Outcome::Updated { from, .. } | Outcome::WouldUpdate { from, .. } => from,
        }
    }

    pub fn latest(&self) -> &str {
        match self {
            Outcome::UpToDate { version } => version,
            Outcome::Updated { to, .. } | Outcome::WouldUpdate { to, .. } => to,
        }
    }
}

/// Runs one pass of the pipeline against `cfg.flake_file`.
pub fn run(cfg: &UpdaterConfig, opts: &RunOptions) -> Result<Outcome, UpdateError> {
    let path = cfg.flake_file.as_path();
    if !path.is_file() {
        return Err(UpdateError::FileNotFound(path.to_path_buf()));
    }

    let current = version_file::read_version(path, &cfg.version_key)?;
    tracing::info!(%current, file = %path.display(), "pinned version");

    let releases = GitHubReleases::new(cfg.release.clone(), cfg.timeout())
        .with_token(opts.github_token.clone());
    let latest = releases.latest_version()?;
    tracing::info!(%current, %latest, "latest release");

    if current == latest {
        return Ok(Outcome::UpToDate { version: latest });
    }

    let checksum = releases.checksum(&latest)?;
    tracing::info!(%latest, %checksum, "fetched checksum");

    if opts.dry_run {
        return Ok(Outcome::WouldUpdate {
            from: current,
            to: latest,
            checksum,
        });
    }

    version_file::update_file(
        path,
        &[
            Field {
                key: &cfg.version_key,
                value: &latest,
            },
            Field {
                key: &cfg.checksum_key,
                value: &checksum,
            },
        ],
    )?;
    tracing::info!(from = %current, to = %latest, "updated {}", path.display());

    Ok(Outcome::Updated {
        from: current,
        to: latest,
        checksum,
    })
}
