//! Solution dumps, progress reporting and tablebase export for the
//! Matrioshka solver.

pub mod config;
pub mod dump;
pub mod stats;
pub mod tablebase;
pub mod verify;

/// Install the `tracing` subscriber used by every binary: `RUST_LOG`
/// filtering, `info` by default.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}
