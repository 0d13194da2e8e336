/*!
 * Logging and tracing initialization
 */

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured logging for binaries embedding the pipeline.
///
/// Respects `RUST_LOG` when set; otherwise filters to this crate at info
/// level, or debug when `verbose` is requested. Safe to call more than
/// once; later calls are no-ops.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "bytepump=debug"
    } else {
        "bytepump=info"
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .ok(); // Ignore error if already initialized
}

/// Initialize logging with a test writer, once per process
#[cfg(test)]
pub fn init_test_logging() {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bytepump=debug"));

        let fmt_layer = fmt::layer().with_test_writer().with_target(false).compact();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .ok();
    });
}
