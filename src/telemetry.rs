//! Structured logging setup.

/// Installs a `RUST_LOG`-driven fmt subscriber unless one is already set.
///
/// Embedding applications that configure their own subscriber can skip this.
pub fn init_tracing() {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(true)
        .try_init()
    {
        tracing::warn!(error = %err, "tracing subscriber already installed");
    }
}
