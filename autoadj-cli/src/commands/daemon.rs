//! `autoadj daemon` — run the profile daemon in the foreground.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use autoadj_daemon::paths::{DEFAULT_CONFIG_PATH, DEFAULT_SOCKET_PATH};
use autoadj_daemon::{start_blocking, DaemonOptions};

#[derive(Args, Debug)]
pub struct DaemonArgs {
    /// Config file path.
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Unix socket path for the control channel.
    #[arg(short, long, default_value = DEFAULT_SOCKET_PATH)]
    pub socket: PathBuf,

    /// Log file; overrides `logging.file` from the config. Supports
    /// `%date%`/`%time%` tokens, `-` logs to stdout.
    #[arg(short, long)]
    pub logfile: Option<String>,
}

impl DaemonArgs {
    pub fn run(self) -> Result<()> {
        start_blocking(DaemonOptions {
            config_path: self.config,
            socket_path: self.socket,
            logfile: self.logfile,
        })
        .context("daemon exited with error")
    }
}
