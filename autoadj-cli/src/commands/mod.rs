pub mod daemon;
pub mod profiles;
pub mod set;
pub mod status;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use autoadj_daemon::paths::DEFAULT_SOCKET_PATH;
use autoadj_daemon::ControlReply;

/// Control socket location, shared by every client subcommand.
#[derive(Args, Debug)]
pub struct SocketOpts {
    /// Unix socket path of the running daemon.
    #[arg(short, long, default_value = DEFAULT_SOCKET_PATH)]
    pub socket: PathBuf,
}

/// Unwrap a reply payload, turning a daemon-side `ERR` into a non-zero
/// exit.
pub(crate) fn expect_ok(reply: ControlReply) -> Result<String> {
    match reply {
        ControlReply::Ok(payload) => Ok(payload),
        ControlReply::Err(message) => bail!("daemon returned an error: {message}"),
    }
}
