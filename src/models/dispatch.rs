use std::fmt;

use serde::{Deserialize, Serialize};

/// Deep-link request handed to the platform.
///
/// `package` scopes the request to one installed application; `None` lets the
/// platform pick any handler (browser).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub url: String,
    pub package: Option<String>,
}

impl LaunchRequest {
    pub fn scoped(url: impl Into<String>, package: impl Into<String>) -> Self {
        Self { url: url.into(), package: Some(package.into()) }
    }

    pub fn unscoped(url: impl Into<String>) -> Self {
        Self { url: url.into(), package: None }
    }
}

/// Which fallback chain a dispatch walks through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DispatchStrategy {
    /// Installed-app check, then each installed package, then the web URL
    #[default]
    NativeFirst,
    /// Web URL only
    WebOnly,
}

/// Result of a single dispatch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    OpenedNativeApp { package: String },
    OpenedWebFallback,
    ReportedInvalid,
    ReportedUnavailable,
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DispatchOutcome::OpenedNativeApp { .. } | DispatchOutcome::OpenedWebFallback)
    }

    /// User-facing message for this outcome
    pub fn message(&self) -> String {
        match self {
            DispatchOutcome::OpenedNativeApp { package } => format!("Opened WhatsApp ({})", package),
            DispatchOutcome::OpenedWebFallback => "Opened WhatsApp Web".to_string(),
            DispatchOutcome::ReportedInvalid => "Invalid phone number".to_string(),
            DispatchOutcome::ReportedUnavailable => "Unable to open WhatsApp".to_string(),
        }
    }
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}
