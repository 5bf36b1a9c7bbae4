//! autoadj — automatic ryzenadj profile daemon and control client.
//!
//! # Usage
//!
//! ```text
//! autoadj daemon [--config <path>] [--socket <path>] [--logfile <path>]
//! autoadj status [--socket <path>]
//! autoadj profiles [<name>] [--socket <path>]
//! autoadj set-profile <name> [--socket <path>]
//! autoadj set-timer <seconds> [--socket <path>]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    daemon::DaemonArgs,
    profiles::ProfilesArgs,
    set::{SetProfileArgs, SetTimerArgs},
    status::StatusArgs,
};

#[derive(Parser, Debug)]
#[command(
    name = "autoadj",
    version,
    about = "Periodically re-apply ryzenadj power profiles",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the daemon in the foreground (profile runner + control socket).
    Daemon(DaemonArgs),

    /// Show the active profile and timer interval.
    Status(StatusArgs),

    /// List configured profiles, optionally filtered by name.
    Profiles(ProfilesArgs),

    /// Switch the active profile.
    SetProfile(SetProfileArgs),

    /// Change the timer interval.
    SetTimer(SetTimerArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Daemon(args) => args.run(),
        Commands::Status(args) => args.run(),
        Commands::Profiles(args) => args.run(),
        Commands::SetProfile(args) => args.run(),
        Commands::SetTimer(args) => args.run(),
    }
}
