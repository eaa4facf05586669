//! Subscriber setup for binaries and tests.
//!
//! The library crates only emit `tracing` events; nothing is printed until
//! a subscriber is installed.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a stderr subscriber filtered by `RUST_LOG`, or by
/// `default_level` when it is unset (e.g. `"kas_wallet=debug,kas_rpc=info"`).
///
/// Returns `false` if a global subscriber was already installed, so repeated
/// calls from tests are harmless.
pub fn init(default_level: &str) -> bool {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_rejected() {
        init("info");
        assert!(!init("debug"));
    }
}
