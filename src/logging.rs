//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Directive applied when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVE: &str = "tou_rates=info";

/// Installs the global `fmt` subscriber.
///
/// `RUST_LOG` overrides the default level; `verbose` raises this crate to
/// `debug`. Calling it twice is harmless: the second install is ignored.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("tou_rates=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
