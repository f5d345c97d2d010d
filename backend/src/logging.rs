//! Log output setup for hosts embedding the backend.
//!
//! Library code logs through the `log` facade; this installs a
//! `tracing-subscriber` formatter that also receives those records.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber, honouring `RUST_LOG` when set.
///
/// Returns false when a subscriber was already installed (e.g. by the host
/// or an earlier call); that is not an error.
pub fn init_logging() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

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
    fn test_second_init_is_harmless() {
        init_logging();
        assert!(!init_logging());
        log::info!("logging initialized for tests");
    }
}
