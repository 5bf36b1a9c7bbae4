//! Well-known filesystem defaults shared by the daemon and its clients.

/// Config file read once at startup.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/auto-ryzenadj.conf";

/// Control channel endpoint; stale files at this path are removed
/// before the daemon binds.
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/auto-ryzenadj.socket";
