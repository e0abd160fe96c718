//! Logging setup for applications embedding the journal.

use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber filtered at `level` (e.g. `"info"` or
/// `"camnotes_storage=debug"`). An unparseable level falls back to `info`.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing(level: &str) -> bool {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
