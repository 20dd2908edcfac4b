// src/config.rs
// =============================================================================
// Scan options: every knob the scanner reads, in one explicit value.
//
// The options are built once (by the CLI or by a test) and handed to the
// Scanner. Nothing in the library reads globals or environment variables.
// =============================================================================

use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

/// Per-attempt timeout used when the caller does not pick one
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

/// How many redirects we follow before giving up on a chain
pub const DEFAULT_MAX_REDIRECT_HOPS: usize = 5;

/// Maximum number of URLs scanned at the same time
pub const DEFAULT_CONCURRENCY_LIMIT: usize = 50;

pub const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Deadline for one request attempt (each redirect hop gets its own)
    pub timeout: Duration,
    /// Upper bound on followed redirects; chains hold at most this + 1 URLs
    pub max_redirect_hops: usize,
    /// Retry a failed direct attempt once through the relay
    pub use_relay: bool,
    /// Relay prefix, e.g. `https://relay.example/`
    pub relay_url: Option<Url>,
    /// Maximum number of in-flight URL scans
    pub concurrency_limit: usize,
    pub user_agent: String,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_redirect_hops: DEFAULT_MAX_REDIRECT_HOPS,
            use_relay: false,
            relay_url: None,
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ScanOptions {
    /// Enables the relay fallback through `relay_url`
    pub fn with_relay(mut self, relay_url: Url) -> Self {
        self.use_relay = true;
        self.relay_url = Some(relay_url);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.concurrency_limit == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.use_relay && self.relay_url.is_none() {
            return Err(ConfigError::MissingRelayUrl);
        }
        Ok(())
    }
}
