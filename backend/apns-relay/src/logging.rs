use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info,h2=warn,hyper=warn,a2=warn";

/// Install the global subscriber. Logs go to stderr; stdout carries only push results.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
