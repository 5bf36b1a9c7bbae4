//! Background loop that keeps the hardware aligned with the active profile.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::broadcast;

use crate::store::{ProfileStore, RunSnapshot};

/// Re-apply the active profile until shutdown is signalled.
///
/// Each iteration takes a snapshot, runs the executable, then sleeps
/// for the snapshot's interval. The store lock is released before the
/// process starts, so control requests land mid-run and take effect on
/// the next cycle. Execution failures are logged and the loop
/// continues at the next scheduled interval.
pub async fn runner_task(store: Arc<ProfileStore>, mut shutdown_rx: broadcast::Receiver<()>) {
    loop {
        let snapshot = store.snapshot().await;
        if let Err(err) = apply_profile(&snapshot).await {
            tracing::warn!(
                profile = %snapshot.profile,
                executable = %snapshot.executable,
                error = %err,
                "applying profile failed",
            );
        }

        tokio::select! {
            _ = shutdown_rx.recv() => break,
            _ = tokio::time::sleep(Duration::from_secs(u64::from(snapshot.timer_secs))) => {}
        }
    }
    tracing::info!("profile runner stopped");
}

/// Run the tuning executable once, forwarding its combined output to
/// the log line by line.
async fn apply_profile(snapshot: &RunSnapshot) -> std::io::Result<()> {
    tracing::info!(command = %format_command(snapshot), "applying profile");

    let mut child = Command::new(&snapshot.executable)
        .args(&snapshot.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    // Drain both pipes concurrently so neither can fill up and stall
    // the child.
    let stdout_task = child.stdout.take().map(|out| tokio::spawn(forward_lines(out)));
    let stderr_task = child.stderr.take().map(|err| tokio::spawn(forward_lines(err)));

    let status = child.wait().await?;
    if let Some(task) = stdout_task {
        let _ = task.await;
    }
    if let Some(task) = stderr_task {
        let _ = task.await;
    }

    if !status.success() {
        return Err(std::io::Error::other(format!(
            "executable exited with {status}"
        )));
    }
    Ok(())
}

async fn forward_lines<R>(stream: R)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let mut lines = BufReader::new(stream).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        tracing::info!("{line}");
    }
}

fn format_command(snapshot: &RunSnapshot) -> String {
    let mut command = snapshot.executable.clone();
    for arg in &snapshot.args {
        command.push(' ');
        command.push_str(arg);
    }
    command
}

#[cfg(test)]
mod tests {
    use std::os::unix::fs::PermissionsExt;
    use std::time::Duration;

    use autoadj_core::types::{MainSection, ProfileTable};
    use autoadj_core::{Config, ProfileName};
    use tempfile::TempDir;
    use tokio::sync::broadcast;

    use super::*;

    fn script_store(dir: &TempDir, timer: u32) -> (Arc<ProfileStore>, std::path::PathBuf) {
        let marker = dir.path().join("applied.txt");
        let script = dir.path().join("fake-ryzenadj.sh");
        std::fs::write(
            &script,
            format!("#!/bin/sh\necho \"$@\" >> {}\n", marker.display()),
        )
        .expect("write script");
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))
            .expect("chmod script");

        let mut profiles = ProfileTable::new();
        profiles.insert(ProfileName::from("eco"), vec!["-a".into(), "5".into()]);
        let store = ProfileStore::from_config(&Config {
            main: MainSection {
                timer,
                default: ProfileName::from("eco"),
                executable: script.display().to_string(),
            },
            profiles,
            logging: Default::default(),
        });
        (Arc::new(store), marker)
    }

    #[tokio::test]
    async fn runner_executes_active_profile_and_stops_on_shutdown() {
        let dir = TempDir::new().expect("tempdir");
        let (store, marker) = script_store(&dir, 3600);
        let (shutdown_tx, _) = broadcast::channel::<()>(1);

        let handle = tokio::spawn(runner_task(store, shutdown_tx.subscribe()));

        // First cycle runs immediately; wait for the script's marker.
        tokio::time::timeout(Duration::from_secs(5), async {
            while !marker.exists() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("executable should run within the timeout");

        let output = std::fs::read_to_string(&marker).expect("marker readable");
        assert_eq!(output.lines().next(), Some("-a 5"));

        shutdown_tx.send(()).expect("runner is subscribed");
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("runner should stop after shutdown")
            .expect("runner task join");
    }

    #[tokio::test]
    async fn missing_executable_is_nonfatal() {
        let dir = TempDir::new().expect("tempdir");
        let mut profiles = ProfileTable::new();
        profiles.insert(ProfileName::from("eco"), vec![]);
        let store = Arc::new(ProfileStore::from_config(&Config {
            main: MainSection {
                timer: 3600,
                default: ProfileName::from("eco"),
                executable: dir.path().join("does-not-exist").display().to_string(),
            },
            profiles,
            logging: Default::default(),
        }));
        let (shutdown_tx, _) = broadcast::channel::<()>(1);

        let handle = tokio::spawn(runner_task(store, shutdown_tx.subscribe()));

        // Give the loop a moment to fail its first spawn, then make
        // sure it is still alive and responsive to shutdown.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!handle.is_finished(), "spawn failure must not kill the loop");

        shutdown_tx.send(()).expect("runner is subscribed");
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("runner should stop after shutdown")
            .expect("runner task join");
    }
}
