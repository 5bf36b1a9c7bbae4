//! Shared daemon state behind a single mutex.

use autoadj_core::types::{ProfileName, ProfileTable};
use autoadj_core::Config;
use tokio::sync::Mutex;

use crate::error::DaemonError;

/// Point-in-time copy of everything one runner cycle needs.
///
/// Safe to use without further locking; a concurrent profile or timer
/// change is observed at the next snapshot, not this one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSnapshot {
    pub executable: String,
    pub profile: ProfileName,
    pub args: Vec<String>,
    pub timer_secs: u32,
}

#[derive(Debug)]
struct StoreInner {
    profiles: ProfileTable,
    active: ProfileName,
    timer_secs: u32,
    executable: String,
}

/// The only holder of the daemon-state mutex.
///
/// Every accessor locks for the duration of the in-memory read/write
/// and nothing else; process execution and socket I/O happen outside
/// the critical section. The guard never escapes this module.
#[derive(Debug)]
pub struct ProfileStore {
    inner: Mutex<StoreInner>,
}

impl ProfileStore {
    /// Build the store from a validated config. `config.main.default`
    /// is already known to be a `[profiles]` key.
    pub fn from_config(config: &Config) -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                profiles: config.profiles.clone(),
                active: config.main.default.clone(),
                timer_secs: config.main.timer,
                executable: config.main.executable.clone(),
            }),
        }
    }

    /// Consistent copy of the fields driving one runner cycle.
    pub async fn snapshot(&self) -> RunSnapshot {
        let inner = self.inner.lock().await;
        let args = inner.profiles.get(&inner.active).cloned().unwrap_or_default();
        RunSnapshot {
            executable: inner.executable.clone(),
            profile: inner.active.clone(),
            args,
            timer_secs: inner.timer_secs,
        }
    }

    /// Switch the active profile. The existence check and the
    /// assignment share one critical section; an unknown name fails
    /// without side effects.
    pub async fn set_active_profile(&self, name: &ProfileName) -> Result<(), DaemonError> {
        let mut inner = self.inner.lock().await;
        if !inner.profiles.contains_key(name) {
            return Err(DaemonError::ProfileNotAvailable {
                name: name.to_string(),
            });
        }
        let previous = std::mem::replace(&mut inner.active, name.clone());
        tracing::info!(from = %previous, to = %name, "switched active profile");
        Ok(())
    }

    /// Update the runner interval. Any value is accepted; `0` means
    /// back-to-back runs with no pause.
    pub async fn set_timer(&self, seconds: u32) {
        let mut inner = self.inner.lock().await;
        inner.timer_secs = seconds;
        tracing::info!(seconds, "changed timer interval");
    }

    /// `(name, args)` pairs in lexicographic name order, stable across
    /// calls for an unchanged profile table.
    pub async fn list_profiles(&self) -> Vec<(ProfileName, Vec<String>)> {
        let inner = self.inner.lock().await;
        inner
            .profiles
            .iter()
            .map(|(name, args)| (name.clone(), args.clone()))
            .collect()
    }

    /// `(active profile, timer seconds)`.
    pub async fn status(&self) -> (ProfileName, u32) {
        let inner = self.inner.lock().await;
        (inner.active.clone(), inner.timer_secs)
    }
}
