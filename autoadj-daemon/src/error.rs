//! Error types for the daemon runtime and control protocol.

use std::path::PathBuf;

use thiserror::Error;

/// Error surface for the daemon runtime, codec, and control clients.
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {0}")]
    Config(#[from] autoadj_core::ConfigError),

    /// Switch target does not exist. The Display text is exactly the
    /// message clients see after the wire-level `ERR - ` marker.
    #[error("Profile '{name}' not available!")]
    ProfileNotAvailable { name: String },

    #[error("control protocol error: {0}")]
    Protocol(String),

    #[error("daemon is not running (socket missing: {socket})")]
    DaemonNotRunning { socket: PathBuf },

    #[error("control socket already in use: {socket}")]
    SocketInUse { socket: PathBuf },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DaemonError {
    DaemonError::Io {
        path: path.into(),
        source,
    }
}
