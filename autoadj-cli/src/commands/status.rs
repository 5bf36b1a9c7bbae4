//! `autoadj status` — query the daemon over the control socket.

use anyhow::{Context, Result};
use clap::Args;

use autoadj_daemon::request_status;

use super::{expect_ok, SocketOpts};

#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub socket: SocketOpts,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let reply = request_status(&self.socket.socket)
            .context("failed to query daemon status")?;
        println!("{}", expect_ok(reply)?);
        Ok(())
    }
}
