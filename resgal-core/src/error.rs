//! Error types for resgal-core.

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by the content platform: reading the tree, reading
/// rights, looking up a gallery or committing an assignment.
///
/// A gallery that does not exist is not an error; lookups return `Ok(None)`.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Underlying I/O failure (file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error (commit path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse site at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The site file did not exist at the expected path.
    #[error("site not found at {path}")]
    SiteNotFound { path: PathBuf },

    /// A write targeted a channel that is not part of the loaded tree.
    #[error("channel not found: {path}")]
    ChannelNotFound { path: String },

    /// Two channels in the tree share one path.
    #[error("duplicate channel path: {path}")]
    DuplicateChannel { path: String },

    /// A write was attempted on a store opened read-only.
    #[error("site at {path} is open read-only")]
    ReadOnly { path: PathBuf },

    /// The platform could not serve the request (connectivity, corrupt data).
    #[error("platform unavailable: {0}")]
    Unavailable(String),
}

/// Errors from loading or saving `~/.resgal/config.yaml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
