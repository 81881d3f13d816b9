//! Phone number cleanup and WhatsApp chat dispatch
//!
//! [`normalize`] and [`is_valid`] turn free-form input into an E.164-like
//! number. [`PhoneDispatcher`] hands that number to WhatsApp through a
//! [`Launcher`], walking a fallback chain:
//!
//! - **native-first**: check which candidate packages are installed, try the
//!   `api.whatsapp.com` deep link scoped to each of them in order, then the
//!   unscoped `web.whatsapp.com` link
//! - **web-only**: the unscoped `web.whatsapp.com` link and nothing else
//!
//! Every attempt is one-shot; nothing is retried.

pub mod launchers;

use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use tracing::{debug, info, warn};

pub use launchers::{AdbLauncher, SystemLauncher};

use crate::models::{DispatchOutcome, DispatchStrategy, LaunchRequest};

/// Candidate apps, in the order they are tried
pub const WHATSAPP_PACKAGES: [&str; 2] = ["com.whatsapp", "com.whatsapp.w4b"];
pub const NATIVE_SEND_URL: &str = "https://api.whatsapp.com/send?phone=";
pub const WEB_SEND_URL: &str = "https://web.whatsapp.com/send?phone=";

static VALID_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?\d{10,15}$").expect("valid phone number regex"));

/// Platform hook that resolves deep links to applications.
pub trait Launcher {
    /// Whether the application `package` is installed
    fn is_installed(&self, package: &str) -> bool;

    /// Hand the request to the platform. `Ok` means the platform accepted it;
    /// nothing is observed after that.
    fn launch(&self, request: &LaunchRequest) -> Result<()>;
}

/// Strip everything but digits and a leading `+`; prefix `+` to numbers of
/// ten or more digits that lack one.
///
/// ```
/// use whatsapper::dispatch::normalize;
///
/// assert_eq!(normalize("(123) 456-7890"), "+1234567890");
/// assert_eq!(normalize("123"), "123");
/// ```
pub fn normalize(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len() + 1);
    for ch in raw.chars() {
        if ch.is_ascii_digit() || (ch == '+' && cleaned.is_empty()) {
            cleaned.push(ch);
        }
    }

    if !cleaned.starts_with('+') && cleaned.len() >= 10 {
        cleaned.insert(0, '+');
    }
    cleaned
}

/// Whether `raw` normalizes to 10 to 15 digits with an optional leading `+`
pub fn is_valid(raw: &str) -> bool {
    VALID_NUMBER.is_match(&normalize(raw))
}

/// `api.whatsapp.com` chat link for an already normalized number
pub fn native_link(number: &str) -> String {
    format!("{}{}", NATIVE_SEND_URL, number)
}

/// `web.whatsapp.com` chat link for an already normalized number
pub fn web_link(number: &str) -> String {
    format!("{}{}", WEB_SEND_URL, number)
}

pub struct PhoneDispatcher<'a> {
    launcher: &'a dyn Launcher,
    strategy: DispatchStrategy,
    packages: Vec<String>,
}

impl<'a> PhoneDispatcher<'a> {
    pub fn new(launcher: &'a dyn Launcher) -> Self {
        Self {
            launcher,
            strategy: DispatchStrategy::default(),
            packages: WHATSAPP_PACKAGES.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn with_strategy(mut self, strategy: DispatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Replace the candidate package list (tried in the given order)
    pub fn with_packages(mut self, packages: Vec<String>) -> Self {
        self.packages = packages;
        self
    }

    /// Open a chat with `raw`. Invalid input never reaches the launcher.
    pub fn dispatch(&self, raw: &str) -> DispatchOutcome {
        let number = normalize(raw);
        if !VALID_NUMBER.is_match(&number) {
            info!("Rejected invalid phone number {:?}", raw);
            return DispatchOutcome::ReportedInvalid;
        }

        match self.strategy {
            DispatchStrategy::NativeFirst => self.dispatch_native_first(&number),
            DispatchStrategy::WebOnly => self.dispatch_web(&number),
        }
    }

    fn dispatch_native_first(&self, number: &str) -> DispatchOutcome {
        let installed: Vec<&str> = self
            .packages
            .iter()
            .map(String::as_str)
            .filter(|package| self.launcher.is_installed(package))
            .collect();

        if installed.is_empty() {
            warn!("No WhatsApp application installed (checked {:?})", self.packages);
            return DispatchOutcome::ReportedUnavailable;
        }

        let url = native_link(number);
        for package in installed {
            match self.launcher.launch(&LaunchRequest::scoped(&url, package)) {
                Ok(()) => {
                    debug!(package, "opened chat in app");
                    return DispatchOutcome::OpenedNativeApp { package: package.to_string() };
                }
                Err(e) => debug!(package, "launch failed: {:#}", e),
            }
        }

        self.dispatch_web(number)
    }

    fn dispatch_web(&self, number: &str) -> DispatchOutcome {
        match self.launcher.launch(&LaunchRequest::unscoped(web_link(number))) {
            Ok(()) => DispatchOutcome::OpenedWebFallback,
            Err(e) => {
                warn!("Unable to open WhatsApp Web: {:#}", e);
                DispatchOutcome::ReportedUnavailable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashSet;

    use anyhow::bail;

    use super::*;

    /// Launcher that records requests instead of opening anything
    #[derive(Default)]
    struct MockLauncher {
        installed: HashSet<&'static str>,
        failing: HashSet<Option<&'static str>>,
        checks: RefCell<Vec<String>>,
        launches: RefCell<Vec<LaunchRequest>>,
    }

    impl MockLauncher {
        fn with_installed(packages: &[&'static str]) -> Self {
            Self { installed: packages.iter().copied().collect(), ..Default::default() }
        }

        /// Fail launches scoped to `package`; `None` fails the unscoped web launch
        fn failing(mut self, package: Option<&'static str>) -> Self {
            self.failing.insert(package);
            self
        }

        fn touched(&self) -> bool {
            !self.checks.borrow().is_empty() || !self.launches.borrow().is_empty()
        }
    }

    impl Launcher for MockLauncher {
        fn is_installed(&self, package: &str) -> bool {
            self.checks.borrow_mut().push(package.to_string());
            self.installed.contains(package)
        }

        fn launch(&self, request: &LaunchRequest) -> Result<()> {
            self.launches.borrow_mut().push(request.clone());
            if self.failing.iter().any(|f| *f == request.package.as_deref()) {
                bail!("Mock launch error");
            }
            Ok(())
        }
    }

    #[test]
    fn test_normalize_strips_formatting() {
        assert_eq!(normalize("(123) 456-7890"), "+1234567890");
        assert_eq!(normalize("+44 20 7946 0958"), "+442079460958");
        assert_eq!(normalize("123.456.7890"), "+1234567890");
    }

    #[test]
    fn test_normalize_short_number_unchanged() {
        assert_eq!(normalize("123"), "123");
        assert_eq!(normalize("12-34"), "1234");
    }

    #[test]
    fn test_normalize_keeps_only_leading_plus() {
        assert_eq!(normalize("+1+234"), "+1234");
        assert_eq!(normalize("12+3456789012"), "+123456789012");
        assert_eq!(normalize(" (+49) 30 1234567"), "+49301234567");
    }

    #[test]
    fn test_normalize_empty_and_garbage() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("call me"), "");
    }

    #[test]
    fn test_normalize_ignores_non_ascii_digits() {
        assert_eq!(normalize("١٢٣٤٥٦٧٨٩٠"), "");
    }

    #[test]
    fn test_is_valid() {
        assert!(is_valid("+1234567890"));
        assert!(is_valid("(123) 456-7890"));
        assert!(is_valid("+123456789012345"));
        assert!(!is_valid("123"));
        assert!(!is_valid("12345678901234567"));
        assert!(!is_valid("+"));
        assert!(!is_valid(""));
    }

    #[test]
    fn test_links() {
        assert_eq!(native_link("+1234567890"), "https://api.whatsapp.com/send?phone=+1234567890");
        assert_eq!(web_link("+1234567890"), "https://web.whatsapp.com/send?phone=+1234567890");
    }

    #[test]
    fn test_invalid_number_never_launches() {
        for strategy in [DispatchStrategy::NativeFirst, DispatchStrategy::WebOnly] {
            let launcher = MockLauncher::with_installed(&WHATSAPP_PACKAGES);
            let outcome = PhoneDispatcher::new(&launcher).with_strategy(strategy).dispatch("123");

            assert_eq!(outcome, DispatchOutcome::ReportedInvalid);
            assert!(!launcher.touched());
        }
    }

    #[test]
    fn test_native_app_opened_first() {
        let launcher = MockLauncher::with_installed(&["com.whatsapp", "com.whatsapp.w4b"]);
        let outcome = PhoneDispatcher::new(&launcher).dispatch("(123) 456-7890");

        assert_eq!(outcome, DispatchOutcome::OpenedNativeApp { package: "com.whatsapp".to_string() });
        let launches = launcher.launches.borrow();
        assert_eq!(launches.len(), 1);
        assert_eq!(
            launches[0],
            LaunchRequest::scoped("https://api.whatsapp.com/send?phone=+1234567890", "com.whatsapp")
        );
    }

    #[test]
    fn test_business_app_when_only_one_installed() {
        let launcher = MockLauncher::with_installed(&["com.whatsapp.w4b"]);
        let outcome = PhoneDispatcher::new(&launcher).dispatch("+1234567890");

        assert_eq!(outcome, DispatchOutcome::OpenedNativeApp { package: "com.whatsapp.w4b".to_string() });
        assert_eq!(launcher.checks.borrow().as_slice(), ["com.whatsapp", "com.whatsapp.w4b"]);
    }

    #[test]
    fn test_falls_through_to_business_app() {
        let launcher = MockLauncher::with_installed(&WHATSAPP_PACKAGES).failing(Some("com.whatsapp"));
        let outcome = PhoneDispatcher::new(&launcher).dispatch("+1234567890");

        assert_eq!(outcome, DispatchOutcome::OpenedNativeApp { package: "com.whatsapp.w4b".to_string() });
        assert_eq!(launcher.launches.borrow().len(), 2);
    }

    #[test]
    fn test_web_fallback_after_all_apps_fail() {
        let launcher = MockLauncher::with_installed(&WHATSAPP_PACKAGES)
            .failing(Some("com.whatsapp"))
            .failing(Some("com.whatsapp.w4b"));
        let outcome = PhoneDispatcher::new(&launcher).dispatch("+1234567890");

        assert_eq!(outcome, DispatchOutcome::OpenedWebFallback);
        let launches = launcher.launches.borrow();
        assert_eq!(launches.len(), 3);
        assert_eq!(launches[2], LaunchRequest::unscoped("https://web.whatsapp.com/send?phone=+1234567890"));
    }

    #[test]
    fn test_unavailable_when_everything_fails() {
        let launcher = MockLauncher::with_installed(&["com.whatsapp"])
            .failing(Some("com.whatsapp"))
            .failing(None);
        let outcome = PhoneDispatcher::new(&launcher).dispatch("+1234567890");

        assert_eq!(outcome, DispatchOutcome::ReportedUnavailable);
    }

    #[test]
    fn test_unavailable_when_nothing_installed() {
        let launcher = MockLauncher::default();
        let outcome = PhoneDispatcher::new(&launcher).dispatch("+1234567890");

        assert_eq!(outcome, DispatchOutcome::ReportedUnavailable);
        assert!(launcher.launches.borrow().is_empty());
    }

    #[test]
    fn test_web_only_skips_installed_check() {
        let launcher = MockLauncher::with_installed(&WHATSAPP_PACKAGES);
        let outcome = PhoneDispatcher::new(&launcher)
            .with_strategy(DispatchStrategy::WebOnly)
            .dispatch("+1234567890");

        assert_eq!(outcome, DispatchOutcome::OpenedWebFallback);
        assert!(launcher.checks.borrow().is_empty());
        assert_eq!(launcher.launches.borrow()[0].package, None);
    }

    #[test]
    fn test_web_only_failure_is_unavailable() {
        let launcher = MockLauncher::default().failing(None);
        let outcome = PhoneDispatcher::new(&launcher)
            .with_strategy(DispatchStrategy::WebOnly)
            .dispatch("+1234567890");

        assert_eq!(outcome, DispatchOutcome::ReportedUnavailable);
    }

    #[test]
    fn test_custom_package_order() {
        let launcher = MockLauncher::with_installed(&WHATSAPP_PACKAGES);
        let outcome = PhoneDispatcher::new(&launcher)
            .with_packages(vec!["com.whatsapp.w4b".to_string(), "com.whatsapp".to_string()])
            .dispatch("+1234567890");

        assert_eq!(outcome, DispatchOutcome::OpenedNativeApp { package: "com.whatsapp.w4b".to_string() });
    }

    #[test]
    fn test_outcome_messages() {
        assert_eq!(DispatchOutcome::ReportedInvalid.message(), "Invalid phone number");
        assert_eq!(DispatchOutcome::ReportedUnavailable.to_string(), "Unable to open WhatsApp");
        assert!(DispatchOutcome::OpenedWebFallback.is_success());
        assert!(!DispatchOutcome::ReportedInvalid.is_success());
    }
}
