use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging based on the debug/quiet flags
pub fn init_logging(debug: bool, quiet: bool) {
    let env_filter = if debug {
        EnvFilter::new("upgrade_triage=debug")
    } else if quiet {
        EnvFilter::new("upgrade_triage=error")
    } else {
        EnvFilter::new("upgrade_triage=info")
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_line_number(debug)
        .with_file(debug)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
