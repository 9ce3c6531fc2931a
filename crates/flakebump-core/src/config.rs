use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where releases are published and how the checksum asset is named.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
    /// GitHub repository owner.
    pub owner: String,
    /// GitHub repository name.
    pub repo: String,
    /// Architecture segment of the asset name (e.g. `x64`).
    pub arch: String,
    /// Leading part of the asset name: `{asset_prefix}-{version}-{arch}.tar.xz.sha256`.
    pub asset_prefix: String,
    /// Prefix stripped from the tag name to get the version (and re-added in download URLs).
    pub tag_prefix: String,
    /// Base URL of the releases API.
    pub api_base: String,
    /// Base URL release assets are downloaded from.
    pub download_base: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            owner: "Voxelum".to_string(),
            repo: "x-minecraft-launcher".to_string(),
            arch: "x64".to_string(),
            asset_prefix: "xmcl".to_string(),
            tag_prefix: "v".to_string(),
            api_base: "https://api.github.com".to_string(),
            download_base: "https://github.com".to_string(),
        }
    }
}

/// Global configuration loaded from `~/.config/flakebump/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdaterConfig {
    /// File holding the pinned version and checksum.
    pub flake_file: PathBuf,
    /// Key of the pinned version assignment.
    pub version_key: String,
    /// Key of the pinned checksum assignment.
    pub checksum_key: String,
    /// Timeout in seconds for each HTTP request.
    pub timeout_secs: u64,
    pub release: ReleaseConfig,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            flake_file: PathBuf::from("flake.nix"),
            version_key: "xmclVersion".to_string(),
            checksum_key: "sha256".to_string(),
            timeout_secs: 15,
            release: ReleaseConfig::default(),
        }
    }
}

impl UpdaterConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Reject values that would produce a meaningless pattern or URL.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("version_key", &self.version_key),
            ("checksum_key", &self.checksum_key),
            ("release.owner", &self.release.owner),
            ("release.repo", &self.release.repo),
            ("release.arch", &self.release.arch),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                anyhow::bail!("config: {} must not be empty", name);
            }
        }
        if self.version_key == self.checksum_key {
            anyhow::bail!("config: version_key and checksum_key must differ");
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("config: timeout_secs must be greater than zero");
        }
        Ok(())
    }
}

/// Default config location, if one exists under the XDG config dirs.
pub fn find_config_file() -> Result<Option<PathBuf>> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("flakebump")?;
    Ok(xdg_dirs.find_config_file("config.toml"))
}

/// Load configuration.
///
/// An explicit `path` must exist. Without one, the XDG config file is used if
/// present, otherwise the built-in defaults.
pub fn load(path: Option<&Path>) -> Result<UpdaterConfig> {
    let path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config_file()?,
    };
    let cfg = match path {
        Some(p) => load_from(&p)?,
        None => {
            tracing::debug!("no config file found, using defaults");
            UpdaterConfig::default()
        }
    };
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_from(path: &Path) -> Result<UpdaterConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: UpdaterConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    tracing::info!("loaded config from {}", path.display());
    Ok(cfg)
}
