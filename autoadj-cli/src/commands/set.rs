//! `autoadj set-profile` / `autoadj set-timer` — mutate daemon state.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use autoadj_daemon::{request_set_profile, request_set_timer};

use super::{expect_ok, SocketOpts};

#[derive(Args, Debug)]
pub struct SetProfileArgs {
    /// Profile to activate; must be defined in the daemon's config.
    pub name: String,

    #[command(flatten)]
    pub socket: SocketOpts,
}

impl SetProfileArgs {
    pub fn run(self) -> Result<()> {
        let reply = request_set_profile(&self.socket.socket, &self.name)
            .context("failed to set profile")?;
        println!("{}", expect_ok(reply)?.green());
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct SetTimerArgs {
    /// New interval between profile applications, in seconds. `0` runs
    /// back-to-back with no pause.
    pub seconds: u32,

    #[command(flatten)]
    pub socket: SocketOpts,
}

impl SetTimerArgs {
    pub fn run(self) -> Result<()> {
        let reply = request_set_timer(&self.socket.socket, self.seconds)
            .context("failed to set timer")?;
        println!("{}", expect_ok(reply)?.green());
        Ok(())
    }
}
