// src/error.rs
// =============================================================================
// Typed errors for the scanning library.
//
// Two kinds of failure exist:
// - TransportError: one request attempt failed. These never escape a scan,
//   the orchestrator turns them into a ScanResult status.
// - ConfigError: the scanner could not be set up (bad options, HTTP client
//   construction, unreadable blacklist file). These are returned to the
//   caller before any URL is scanned.
//
// The binary keeps using anyhow on top of these.
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Why a single request attempt did not produce an HTTP response
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The attempt did not finish before its deadline
    #[error("request timed out")]
    Timeout,
    /// Connection, DNS, TLS or protocol-level failure
    #[error("unreachable: {0}")]
    Unreachable(String),
    /// Anything we could not classify
    #[error("{0}")]
    Unknown(String),
}

/// Problems found while building a scanner
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("timeout must be greater than zero")]
    ZeroTimeout,

    #[error("concurrency limit must be at least 1")]
    ZeroConcurrency,

    #[error("relay fallback is enabled but no relay URL was given")]
    MissingRelayUrl,

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("failed to read blacklist {path}: {source}")]
    Blacklist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_display() {
        assert_eq!(TransportError::Timeout.to_string(), "request timed out");
        assert_eq!(
            TransportError::Unreachable("connection refused".to_string()).to_string(),
            "unreachable: connection refused"
        );
    }

    #[test]
    fn test_blacklist_error_mentions_path() {
        let err = ConfigError::Blacklist {
            path: PathBuf::from("/nope/list.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(
            err.to_string(),
            "failed to read blacklist /nope/list.txt: not found"
        );
    }
}
