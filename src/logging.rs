use tracing_subscriber::{fmt, EnvFilter};

/// Installs the fmt subscriber, honouring `RUST_LOG` on top of `info`.
/// Calling it again (tests, embedding front ends) is a no-op.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}
