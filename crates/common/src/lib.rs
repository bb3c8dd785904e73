//! Shared configuration, clock and logging setup.

mod config;
mod environment;

pub use config::{
    ApiConfig, DEFAULT_API_VERSION, DEFAULT_CONNECT_TIMEOUT, DEFAULT_RECEIVE_ATTEMPTS,
    DEFAULT_RECEIVE_TIMEOUT, DEFAULT_REQUEST_TIMEOUT, DEFAULT_WS_AUTH_PATH,
};
pub use environment::{ParseEnvironmentError, RipioEnvironment};

use std::time::{SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

/// Install the global `tracing` subscriber.
///
/// Honours `RUST_LOG`, defaulting to `info`. Calling it twice is harmless.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_ms_is_plausible() {
        // 2023-11-14 in milliseconds
        assert!(now_ms() > 1_700_000_000_000);
    }

    #[test]
    fn test_now_ms_does_not_go_backwards() {
        let first = now_ms();
        let second = now_ms();
        assert!(second >= first);
    }
}
