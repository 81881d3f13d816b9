//! Configuration model.
//!
//! Every section rejects unknown keys so a typo in `whatsapper.toml` fails
//! loudly instead of being ignored.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::adb::DEFAULT_ADB_PROGRAM;
use crate::dispatch::WHATSAPP_PACKAGES;
use crate::models::DispatchStrategy;
use crate::reader::Permissions;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WhatsapperConfig {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub reader: ReaderConfig,

    /// Access granted to the call log and contacts.
    #[serde(default)]
    pub permissions: Permissions,

    #[serde(default)]
    pub dispatch: DispatchConfig,

    #[serde(default)]
    pub adb: AdbConfig,
}

/// Where call history and contacts come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// Live device over adb
    #[default]
    Adb,
    /// JSON Lines export files
    Jsonl,
    /// Saved `content query` output
    ContentQuery,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    #[serde(default)]
    pub kind: SourceKind,

    /// Call-log file for the `jsonl` and `content-query` kinds.
    #[serde(default)]
    pub call_log_path: Option<PathBuf>,

    /// Contacts file for the `jsonl` and `content-query` kinds; no file means no lookups.
    #[serde(default)]
    pub contacts_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReaderConfig {
    /// Keep only the most recent call per number.
    #[serde(default = "default_true")]
    pub deduplicate: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self { deduplicate: true }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LauncherKind {
    /// Intents on the adb device
    #[default]
    Adb,
    /// The desktop's URL opener
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    #[serde(default)]
    pub strategy: DispatchStrategy,

    #[serde(default)]
    pub launcher: LauncherKind,

    /// Candidate apps, tried in order.
    #[serde(default = "default_packages")]
    pub packages: Vec<String>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            strategy: DispatchStrategy::default(),
            launcher: LauncherKind::default(),
            packages: default_packages(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AdbConfig {
    /// adb executable.
    #[serde(default = "default_adb_path")]
    pub path: PathBuf,

    /// Device serial, for when more than one device is attached.
    #[serde(default)]
    pub serial: Option<String>,
}

impl Default for AdbConfig {
    fn default() -> Self {
        Self { path: default_adb_path(), serial: None }
    }
}

fn default_true() -> bool {
    true
}

fn default_packages() -> Vec<String> {
    WHATSAPP_PACKAGES.iter().map(|p| p.to_string()).collect()
}

fn default_adb_path() -> PathBuf {
    PathBuf::from(DEFAULT_ADB_PROGRAM)
}
