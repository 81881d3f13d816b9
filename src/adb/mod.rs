//! Thin wrapper around the `adb` command-line tool.
//!
//! Every call is a blocking child process: `adb [-s <serial>] shell <args...>`.
//! adb joins the arguments with spaces and hands them to the device shell, so
//! callers must quote anything the remote `sh` would interpret.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use tracing::debug;

pub const DEFAULT_ADB_PROGRAM: &str = "adb";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdbShell {
    program: PathBuf,
    serial: Option<String>,
}

impl Default for AdbShell {
    fn default() -> Self {
        Self::new(DEFAULT_ADB_PROGRAM, None)
    }
}

impl AdbShell {
    pub fn new(program: impl Into<PathBuf>, serial: Option<String>) -> Self {
        Self { program: program.into(), serial: serial.filter(|s| !s.is_empty()) }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn serial(&self) -> Option<&str> {
        self.serial.as_deref()
    }

    /// Run a device shell command and return its stdout.
    ///
    /// A non-zero exit status is an error carrying the tool's stderr.
    pub fn shell(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new(&self.program);
        if let Some(serial) = &self.serial {
            cmd.arg("-s").arg(serial);
        }
        cmd.arg("shell").args(args);

        debug!(program = %self.program.display(), ?args, "running adb shell");
        let output = cmd
            .output()
            .with_context(|| format!("Failed to run {}", self.program.display()))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "adb shell {} failed ({}): {}",
                args.first().copied().unwrap_or_default(),
                output.status,
                stderr.trim()
            );
        }

        Ok(stdout)
    }
}

/// Wrap a value in single quotes for the device shell
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
