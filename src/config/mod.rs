//! Configuration for the whatsapper CLI
//!
//! Command-line flags are applied on top of the loaded configuration by the
//! `cli` module.

pub mod loader;
pub mod model;

pub use loader::{default_config_path, load_config, load_config_from_path, load_config_from_str};
pub use model::{
    AdbConfig, DispatchConfig, LauncherKind, ReaderConfig, SourceConfig, SourceKind,
    WhatsapperConfig,
};
