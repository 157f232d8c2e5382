//! Logging setup.

use tracing_subscriber::EnvFilter;

/// Initialise logging. The default level is `info`; the `debug_logging`
/// setting raises it to `debug` and lets `RUST_LOG` override the filter.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(debug: bool) {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        // Ignore RUST_LOG so a stray variable cannot flood the console.
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
