//! `autoadj profiles` — list configured profiles, optionally filtered.

use anyhow::{bail, Context, Result};
use clap::Args;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use autoadj_daemon::request_profiles;

use super::{expect_ok, SocketOpts};

#[derive(Args, Debug)]
pub struct ProfilesArgs {
    /// Show only the profile with this exact name.
    pub name: Option<String>,

    #[command(flatten)]
    pub socket: SocketOpts,
}

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "Profile")]
    name: String,
    #[tabled(rename = "Arguments")]
    args: String,
}

impl ProfilesArgs {
    pub fn run(self) -> Result<()> {
        let reply = request_profiles(&self.socket.socket)
            .context("failed to list profiles")?;
        let listing = expect_ok(reply)?;

        let rows: Vec<ProfileRow> = listing
            .lines()
            .filter_map(|line| line.split_once(':'))
            .map(|(name, args)| ProfileRow {
                name: name.to_owned(),
                args: args.to_owned(),
            })
            .collect();

        match self.name {
            Some(name) => {
                let Some(row) = rows.into_iter().find(|row| row.name == name) else {
                    bail!("Profile '{name}' not found!");
                };
                println!("{}:{}", row.name, row.args);
            }
            None => {
                println!("{}", Table::new(rows).with(Style::sharp()));
            }
        }
        Ok(())
    }
}
