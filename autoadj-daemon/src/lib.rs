//! Daemon runtime: profile runner + control socket server.

mod error;
pub mod paths;
pub mod protocol;
mod runner;
mod runtime;
mod server;
mod store;

pub use error::DaemonError;
pub use protocol::{
    request_profiles, request_set_profile, request_set_timer, request_status, send_request,
    ControlReply, ControlRequest,
};
pub use runner::runner_task;
pub use runtime::{run, start_blocking, DaemonOptions};
pub use server::server_task;
pub use store::{ProfileStore, RunSnapshot};
