//! Log subscriber setup
//!
//! Libraries in this workspace only emit `tracing` events. Binaries and
//! tests that want to see them call [`init`] once.

use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG` nor a caller default is given
pub const DEFAULT_FILTER: &str = "info";

/// Install a fmt subscriber filtered by `RUST_LOG`, falling back to
/// `default_filter`
///
/// Returns false if a global subscriber was already installed; calling it
/// twice is harmless.
pub fn init(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init("debug");
        assert!(!init("debug"));
    }
}
