//! Layered configuration loading with Figment.
//!
//! Merge order (later overrides earlier):
//! 1. Compiled defaults
//! 2. `~/.config/whatsapper/whatsapper.toml`
//! 3. `./whatsapper.toml`
//! 4. `WHATSAPPER_*` environment variables

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};

use super::model::WhatsapperConfig;

pub const CONFIG_FILE_NAME: &str = "whatsapper.toml";

/// `~/.config/whatsapper/whatsapper.toml` (platform equivalent elsewhere)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("whatsapper").join(CONFIG_FILE_NAME))
}

pub fn load_config() -> Result<WhatsapperConfig, figment::Error> {
    let mut figment = Figment::new().merge(Serialized::defaults(WhatsapperConfig::default()));
    if let Some(user_config) = default_config_path() {
        figment = figment.merge(Toml::file(user_config));
    }
    figment.merge(Toml::file(CONFIG_FILE_NAME)).merge(env_provider()).extract()
}

/// Load an explicit config file (plus env overrides), skipping the default locations
pub fn load_config_from_path(path: &Path) -> Result<WhatsapperConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WhatsapperConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

pub fn load_config_from_str(toml_content: &str) -> Result<WhatsapperConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WhatsapperConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// `WHATSAPPER_SOURCE_CALL_LOG_PATH` must become `source.call_log_path`, so only
/// the section prefix is turned into a dot.
fn env_provider() -> Env {
    Env::prefixed("WHATSAPPER_").map(|key| {
        let key_str = key.as_str().to_ascii_lowercase();
        for section in ["source", "reader", "permissions", "dispatch", "adb"] {
            if let Some(rest) = key_str.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
                return format!("{}.{}", section, rest).into();
            }
        }
        key_str.into()
    })
}
