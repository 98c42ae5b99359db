//! Logging setup for the binary.

/// Install an env-filtered (`RUST_LOG`) fmt subscriber writing to stderr,
/// unless a subscriber is already set.
pub fn init_tracing() {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}
