pub mod commands;

pub use commands::{Cli, Commands, execute, run};

use tracing_subscriber::EnvFilter;

/// Log to stderr; `RUST_LOG` wins unless `--verbose` is given
pub(crate) fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("whatsapper=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
