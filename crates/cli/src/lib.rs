//! gpio-pinmap CLI library.
//!
//! The binary is a thin wrapper around `pinmap-core`; command functions and
//! row rendering live here so they can be tested without spawning a process.

pub mod commands;
pub mod render;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (`RUST_LOG` syntax).
pub const LOG_ENV: &str = "GPIO_PINMAP_LOG";

/// Install the stderr log subscriber. `verbose` lowers the default level
/// from `warn` to `debug`; `GPIO_PINMAP_LOG` overrides both.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    // A subscriber may already be installed when called from tests.
    let _ = tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
