//! Domain types for the autoadj configuration.
//!
//! Profile tables are `BTreeMap`s so that enumeration order is stable
//! across calls for an unchanged config.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed name for a tuning profile.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProfileName(pub String);

impl fmt::Display for ProfileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ProfileName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProfileName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Profile table: name → ordered ryzenadj argument list.
pub type ProfileTable = BTreeMap<ProfileName, Vec<String>>;

// ---------------------------------------------------------------------------
// Config sections
// ---------------------------------------------------------------------------

/// The tuning binary invoked when `main.executable` is not configured.
pub const DEFAULT_EXECUTABLE: &str = "ryzenadj";

/// `[main]` section of the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct MainSection {
    /// Interval between profile applications, in seconds. `0` means
    /// back-to-back runs with no pause.
    pub timer: u32,

    /// Profile selected at startup; must name a `[profiles]` entry.
    pub default: ProfileName,

    /// Path or name of the external tuning binary.
    #[serde(default = "default_executable")]
    pub executable: String,
}

fn default_executable() -> String {
    DEFAULT_EXECUTABLE.to_owned()
}

/// `[logging]` section of the config file.
///
/// `file` supports `%date%` and `%time%` substitution tokens; an empty
/// value or `-` selects stdout.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingSection {
    pub file: Option<String>,
}
