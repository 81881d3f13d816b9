use std::process::Command;

use anyhow::{Context, Result, bail};
use tracing::debug;

use super::Launcher;
use crate::adb::{AdbShell, shell_quote};
use crate::models::LaunchRequest;

const VIEW_ACTION: &str = "android.intent.action.VIEW";

/// Launches intents on a device connected over adb
#[derive(Debug, Clone, Default)]
pub struct AdbLauncher {
    adb: AdbShell,
}

impl AdbLauncher {
    pub fn new(adb: AdbShell) -> Self {
        Self { adb }
    }
}

/// `pm list packages <filter>` matches substrings, so look for the exact line
fn lists_package(output: &str, package: &str) -> bool {
    output.lines().any(|line| line.trim().strip_prefix("package:") == Some(package))
}

/// `am start` reports most failures on stdout with a zero exit status
fn start_failed(output: &str) -> bool {
    output.lines().any(|line| line.trim_start().starts_with("Error"))
}

impl Launcher for AdbLauncher {
    fn is_installed(&self, package: &str) -> bool {
        match self.adb.shell(&["pm", "list", "packages", &shell_quote(package)]) {
            Ok(output) => lists_package(&output, package),
            Err(e) => {
                debug!(package, "package check failed: {:#}", e);
                false
            }
        }
    }

    fn launch(&self, request: &LaunchRequest) -> Result<()> {
        let url = shell_quote(&request.url);
        let package = request.package.as_deref().map(shell_quote);
        let mut args = vec!["am", "start", "-a", VIEW_ACTION, "-d", url.as_str()];
        if let Some(package) = &package {
            args.extend(["-p", package.as_str()]);
        }

        let output = self.adb.shell(&args)?;
        if start_failed(&output) {
            bail!("am start refused {}: {}", request.url, output.trim());
        }
        Ok(())
    }
}

/// Hands URLs to the desktop's default opener.
///
/// There are no Android packages on a desktop, so package checks are always
/// negative and package-scoped requests are refused.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl SystemLauncher {
    fn opener(url: &str) -> Command {
        let mut cmd = if cfg!(target_os = "macos") {
            Command::new("open")
        } else if cfg!(target_os = "windows") {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", ""]);
            cmd
        } else {
            Command::new("xdg-open")
        };
        cmd.arg(url);
        cmd
    }
}

impl Launcher for SystemLauncher {
    fn is_installed(&self, _package: &str) -> bool {
        false
    }

    fn launch(&self, request: &LaunchRequest) -> Result<()> {
        if let Some(package) = &request.package {
            bail!("cannot open {} on this system: it is an Android package", package);
        }

        let mut cmd = Self::opener(&request.url);
        cmd.spawn().with_context(|| format!("Failed to open {}", request.url))?;
        Ok(())
    }
}
