//! Error type for the update pipeline.
//!
//! Every failure propagates straight to the CLI; nothing here is retried.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpdateError {
    /// The target file does not exist.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// No `key = "value"` line for the version key.
    #[error("version key `{key}` not found in {}", path.display())]
    VersionNotFound { key: String, path: PathBuf },

    /// A key that must be rewritten has no match in the file.
    #[error("field `{key}` not found in {}; file left unchanged", path.display())]
    FieldNotFound { key: String, path: PathBuf },

    /// Transport failure (connect, DNS, TLS, timeout).
    #[error("network error fetching {url}")]
    Network {
        url: String,
        #[source]
        source: curl::Error,
    },

    /// Response status other than 200.
    #[error("GET {url} returned HTTP {code}{}", status_hint(*code))]
    HttpStatus { url: String, code: u32 },

    /// Release metadata was not the JSON we expect.
    #[error("failed to decode release JSON from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("release tag `{0}` is not a usable version")]
    InvalidTag(String),

    #[error("checksum artifact at {url} does not contain a SHA-256 hex digest: {content:?}")]
    InvalidChecksum { url: String, content: String },

    #[error("invalid release URL {0}")]
    Url(String),

    /// Read or write failure on the target file.
    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl UpdateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        UpdateError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Extra context for status codes with a well-known cause on GitHub.
fn status_hint(code: u32) -> &'static str {
    match code {
        403 | 429 => " (API rate limit likely exceeded; set GITHUB_TOKEN or wait)",
        404 => " (repository, release or asset not found)",
        _ => "",
    }
}
