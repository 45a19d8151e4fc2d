use tracing_subscriber::EnvFilter;

/// Installs the global fmt subscriber. An unparseable filter falls back to `info`; a second
/// call is a no-op.
pub fn init_tracing(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init();
}
