//! CLI argument handling and daemon round-trip tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread::sleep;
use std::time::{Duration, Instant};

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn autoadj_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("autoadj"))
}

// ---------------------------------------------------------------------------
// 1. Argument and startup failures
// ---------------------------------------------------------------------------

#[test]
fn status_against_missing_socket_exits_nonzero() {
    let dir = TempDir::new().expect("tempdir");
    autoadj_cmd()
        .args(["status", "--socket"])
        .arg(dir.path().join("no-daemon.socket"))
        .assert()
        .failure()
        .stderr(contains("not running"));
}

#[test]
fn set_timer_rejects_non_numeric_seconds() {
    autoadj_cmd()
        .args(["set-timer", "soon"])
        .assert()
        .failure()
        .stderr(contains("invalid value"));
}

#[test]
fn daemon_with_missing_config_exits_nonzero() {
    let dir = TempDir::new().expect("tempdir");
    autoadj_cmd()
        .args(["daemon", "--config"])
        .arg(dir.path().join("missing.conf"))
        .arg("--socket")
        .arg(dir.path().join("autoadj.socket"))
        .assert()
        .failure()
        .stderr(contains("config not found"));
}

#[test]
fn daemon_with_unknown_default_profile_exits_nonzero() {
    let dir = TempDir::new().expect("tempdir");
    let config = dir.path().join("auto-ryzenadj.conf");
    fs::write(
        &config,
        r#"
[main]
timer = 10
default = "missing"

[profiles]
quiet = ["-a", "5"]
"#,
    )
    .expect("write config");

    autoadj_cmd()
        .args(["daemon", "--config"])
        .arg(&config)
        .arg("--socket")
        .arg(dir.path().join("autoadj.socket"))
        .assert()
        .failure()
        .stderr(contains("not defined in [profiles]"));
}

// ---------------------------------------------------------------------------
// 2. Round trip against a live daemon
// ---------------------------------------------------------------------------

struct DaemonProcess {
    child: Child,
}

impl DaemonProcess {
    fn start(config: &Path, socket: &Path) -> Self {
        let child = Command::new(assert_cmd::cargo::cargo_bin!("autoadj"))
            .args(["daemon", "--logfile", "-", "--config"])
            .arg(config)
            .arg("--socket")
            .arg(socket)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("spawn daemon");
        Self { child }
    }

    fn wait_for_socket(&self, socket: &Path) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while Instant::now() < deadline {
            if socket.exists() {
                return;
            }
            sleep(Duration::from_millis(25));
        }
        panic!("daemon did not bind {} in time", socket.display());
    }
}

impl Drop for DaemonProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn write_test_config(dir: &TempDir) -> PathBuf {
    let config = dir.path().join("auto-ryzenadj.conf");
    // `true` stands in for ryzenadj; the hour-long timer keeps the
    // runner quiet after its first cycle.
    fs::write(
        &config,
        r#"
[main]
timer = 3600
default = "quiet"
executable = "true"

[profiles]
quiet = ["-a", "5"]
turbo = ["-a", "15"]
"#,
    )
    .expect("write config");
    config
}

#[test]
fn client_commands_round_trip_through_a_live_daemon() {
    let dir = TempDir::new().expect("tempdir");
    let config = write_test_config(&dir);
    let socket = dir.path().join("autoadj.socket");

    let daemon = DaemonProcess::start(&config, &socket);
    daemon.wait_for_socket(&socket);
    let socket_arg = socket.display().to_string();

    autoadj_cmd()
        .args(["status", "--socket", &socket_arg])
        .assert()
        .success()
        .stdout(contains("profile:quiet").and(contains("timer:3600")));

    autoadj_cmd()
        .args(["set-profile", "turbo", "--socket", &socket_arg])
        .assert()
        .success()
        .stdout(contains("OK"));

    autoadj_cmd()
        .args(["status", "--socket", &socket_arg])
        .assert()
        .success()
        .stdout(contains("profile:turbo"));

    autoadj_cmd()
        .args(["set-profile", "bogus", "--socket", &socket_arg])
        .assert()
        .failure()
        .stderr(contains("Profile 'bogus' not available!"));

    autoadj_cmd()
        .args(["profiles", "--socket", &socket_arg])
        .assert()
        .success()
        .stdout(contains("quiet").and(contains("-a,5")));

    autoadj_cmd()
        .args(["profiles", "turbo", "--socket", &socket_arg])
        .assert()
        .success()
        .stdout(contains("turbo:-a,15"));

    autoadj_cmd()
        .args(["profiles", "nope", "--socket", &socket_arg])
        .assert()
        .failure()
        .stderr(contains("Profile 'nope' not found!"));
}
