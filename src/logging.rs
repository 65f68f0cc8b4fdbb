use tracing_subscriber::EnvFilter;

/// Initialise logging. The default level is `info`; enabling `debug_logging`
/// in the settings file raises it to `debug` and additionally allows the
/// `RUST_LOG` environment variable to override the filter.
pub fn init(debug: bool) {
    // With debug logging disabled we pin the filter to `info` so a stray
    // `RUST_LOG` in the environment cannot flood the output.
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
