//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber from `AEROLOG_LOG`
/// (falling back to `info`). Later calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_env("AEROLOG_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
