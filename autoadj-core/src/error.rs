//! Error types for autoadj-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::ProfileName;

/// All errors that can arise while loading the daemon configuration.
///
/// Every variant is fatal at startup: the daemon refuses to run without
/// a valid config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (permission denied, unreadable file, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file did not exist at the expected path.
    #[error("config not found at {path}")]
    NotFound { path: PathBuf },

    /// TOML parse error on load — includes file path and line context.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// `main.default` does not name a `[profiles]` entry.
    #[error("default profile '{name}' is not defined in [profiles]")]
    UnknownDefaultProfile { name: ProfileName },
}
