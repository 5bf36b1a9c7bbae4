//! Daemon configuration: one-shot TOML parse at startup.
//!
//! # File format
//!
//! ```toml
//! [main]
//! timer = 10
//! default = "quiet"
//! executable = "ryzenadj"        # optional
//!
//! [profiles]
//! quiet = ["-a", "5"]
//! turbo = ["-a", "15"]
//!
//! [logging]
//! file = "/var/log/auto-ryzenadj-%date%.log"   # optional, "-" = stdout
//! ```
//!
//! # API pattern
//!
//! Time-dependent functions have two forms:
//! - `fn_at(…, now)` — explicit timestamp; used in tests
//! - `fn(…)` — uses `Local::now()`, delegates to `_at`

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::{LoggingSection, MainSection, ProfileTable};

/// Parsed and validated daemon configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub main: MainSection,
    pub profiles: ProfileTable,
    #[serde(default)]
    pub logging: LoggingSection,
}

impl Config {
    /// Load a config file, returning it only if it parses and upholds
    /// the default-profile invariant.
    ///
    /// Returns `ConfigError::NotFound` if absent, `ConfigError::Parse`
    /// (with path + line context) if malformed TOML, and
    /// `ConfigError::UnknownDefaultProfile` if `main.default` names no
    /// `[profiles]` entry.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.profiles.contains_key(&self.main.default) {
            return Err(ConfigError::UnknownDefaultProfile {
                name: self.main.default.clone(),
            });
        }
        Ok(())
    }
}

/// Resolve a raw log-file value into a concrete path.
///
/// `%date%` becomes `YYYY-MM-DD` and `%time%` becomes `HH-MM-SS` in
/// local time. Returns `None` for an empty value or `-`, which select
/// stdout logging.
pub fn resolve_log_file_at(raw: &str, now: DateTime<Local>) -> Option<PathBuf> {
    if raw.is_empty() || raw == "-" {
        return None;
    }
    let resolved = raw
        .replace("%date%", &now.format("%Y-%m-%d").to_string())
        .replace("%time%", &now.format("%H-%M-%S").to_string());
    Some(PathBuf::from(resolved))
}

/// `resolve_log_file_at` convenience wrapper using the current time.
pub fn resolve_log_file(raw: &str) -> Option<PathBuf> {
    resolve_log_file_at(raw, Local::now())
}
