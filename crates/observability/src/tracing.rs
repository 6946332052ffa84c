//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the process.
///
/// Output is JSON by default (structured logs for collectors); set
/// `LOG_FORMAT=pretty` for human-readable local output. The filter is
/// configurable via `RUST_LOG`.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("pretty") => {
            let _ = builder.pretty().try_init();
        }
        _ => {
            let _ = builder
                .json()
                .with_timer(tracing_subscriber::fmt::time::SystemTime)
                .try_init();
        }
    }
}
