//! Daemon runtime: profile runner + control server + signal handling.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::broadcast;

use autoadj_core::{config, Config};

use crate::error::{io_err, DaemonError};
use crate::{runner, server};
use crate::store::ProfileStore;

/// Filesystem inputs for one daemon run.
#[derive(Debug, Clone)]
pub struct DaemonOptions {
    pub config_path: PathBuf,
    pub socket_path: PathBuf,
    /// Overrides `logging.file` from the config when set; `-` forces
    /// stdout. Supports the same `%date%`/`%time%` tokens.
    pub logfile: Option<String>,
}

/// Start the daemon and block the current thread until it exits.
///
/// Config problems are fatal here, before either loop starts.
pub fn start_blocking(options: DaemonOptions) -> Result<(), DaemonError> {
    let config = Config::load(&options.config_path)?;

    let raw_logfile = options.logfile.or_else(|| config.logging.file.clone());
    let log_path = raw_logfile.as_deref().and_then(config::resolve_log_file);
    init_tracing(log_path.as_deref())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| io_err("tokio-runtime", e))?;
    runtime.block_on(run(config, options.socket_path))
}

/// Run the daemon: the two long-lived loops share the profile store,
/// and a signal task triggers the cooperative shutdown. Every task
/// broadcasts shutdown when it exits, and the runtime returns only
/// after all of them have unwound.
pub async fn run(config: Config, socket_path: PathBuf) -> Result<(), DaemonError> {
    let store = Arc::new(ProfileStore::from_config(&config));
    let (shutdown_tx, _) = broadcast::channel::<()>(16);

    tracing::info!(
        profile = %config.main.default,
        timer = config.main.timer,
        executable = %config.main.executable,
        "starting profile runner",
    );

    let runner_handle = {
        let shutdown = shutdown_tx.clone();
        let store = store.clone();
        tokio::spawn(async move {
            runner::runner_task(store, shutdown.subscribe()).await;
            let _ = shutdown.send(());
        })
    };

    let server_handle = {
        let shutdown = shutdown_tx.clone();
        let store = store.clone();
        tokio::spawn(async move {
            let result = server::server_task(socket_path, store, shutdown.subscribe()).await;
            let _ = shutdown.send(());
            result
        })
    };

    let signal_handle = {
        let shutdown = shutdown_tx.clone();
        tokio::spawn(async move {
            let mut shutdown_rx = shutdown.subscribe();
            tokio::select! {
                _ = shutdown_rx.recv() => Ok(()),
                signal = wait_for_signal() => {
                    match signal {
                        Ok(name) => {
                            tracing::info!(signal = name, "received shutdown signal");
                            let _ = shutdown.send(());
                            Ok(())
                        }
                        Err(err) => {
                            Err(DaemonError::Protocol(format!("signal handler failed: {err}")))
                        }
                    }
                }
            }
        })
    };

    let (runner_result, server_result, signal_result) =
        tokio::join!(runner_handle, server_handle, signal_handle);

    runner_result
        .map_err(|err| DaemonError::Protocol(format!("runner task join failure: {err}")))?;
    handle_join("control server", server_result)?;
    handle_join("signal handler", signal_result)?;
    Ok(())
}

async fn wait_for_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result.map(|()| "SIGINT"),
        _ = term.recv() => Ok("SIGTERM"),
    }
}

fn handle_join(
    task: &str,
    result: Result<Result<(), DaemonError>, tokio::task::JoinError>,
) -> Result<(), DaemonError> {
    match result {
        Ok(inner) => inner,
        Err(err) => Err(DaemonError::Protocol(format!(
            "{task} task join failure: {err}"
        ))),
    }
}

/// Install the global subscriber: stdout when no log file is
/// configured, otherwise append-only writes to the resolved path.
fn init_tracing(log_path: Option<&Path>) -> Result<(), DaemonError> {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match log_path {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| io_err(path, e))?;
            let _ = fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .try_init();
        }
        None => {
            let _ = fmt().with_env_filter(filter).with_target(false).try_init();
        }
    }
    Ok(())
}
