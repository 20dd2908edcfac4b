// src/checker/result.rs
// =============================================================================
// The record produced for every scanned URL.
//
// A ScanResult is built once by the orchestrator and then only read.
// Rescanning a URL produces a brand new ScanResult.
//
// Rust concepts:
// - Enums: Status is a closed set, the compiler checks every match
// - serde attributes: control how the JSON output looks
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Health status of one URL
///
/// HTTP codes are mapped into these variants; the raw code (when known)
/// lives in `ScanResult::http_code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Input could not be turned into a URL
    Invalid,
    /// Host (or a redirect hop) is on the blacklist
    Risky,
    /// 2xx, possibly after following redirects
    Ok,
    /// Redirect chain cut short by a loop or the hop limit
    Redirect,
    /// Server answered 4xx/5xx
    Broken,
    /// Request did not finish in time
    Timeout,
    /// Connection, DNS, TLS or CORS-style failure
    Unreachable,
    /// Anything else
    Unknown,
}

impl Status {
    pub const ALL: [Status; 8] = [
        Status::Risky,
        Status::Broken,
        Status::Redirect,
        Status::Ok,
        Status::Timeout,
        Status::Unreachable,
        Status::Unknown,
        Status::Invalid,
    ];

    /// Sort rank, lowest is the most actionable
    pub fn severity(self) -> u8 {
        match self {
            Status::Risky => 0,
            Status::Broken => 1,
            Status::Redirect => 2,
            Status::Ok => 3,
            Status::Timeout => 4,
            Status::Unreachable => 5,
            Status::Unknown => 6,
            Status::Invalid => 7,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Invalid => "invalid",
            Status::Risky => "risky",
            Status::Ok => "ok",
            Status::Redirect => "redirect",
            Status::Broken => "broken",
            Status::Timeout => "timeout",
            Status::Unreachable => "unreachable",
            Status::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of scanning a single URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Normalized URL (or the trimmed raw input when it was invalid)
    pub url: String,
    pub status: Status,
    /// Last HTTP status code seen, if any response arrived
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub http_code: Option<u16>,
    /// Every URL visited, starting with `url`
    pub redirect_chain: Vec<String>,
    /// Blacklisted host, either the scanned URL itself (never contacted)
    /// or a redirect target (the hops before it were fetched, it was not)
    pub is_risky: bool,
    /// Human-readable diagnostic
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ScanResult {
    /// Starts a result for `url` whose chain is just the URL itself
    pub fn new(url: impl Into<String>, status: Status) -> Self {
        let url = url.into();
        Self {
            redirect_chain: vec![url.clone()],
            url,
            status,
            http_code: None,
            is_risky: status == Status::Risky,
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_chain(mut self, chain: Vec<String>) -> Self {
        // The chain always starts at the scanned URL.
        if chain.first() == Some(&self.url) {
            self.redirect_chain = chain;
        }
        self
    }

    pub fn with_code(mut self, code: u16) -> Self {
        self.http_code = Some(code);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Only 2xx endpoints count as healthy
    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }

    /// True when at least one redirect was followed
    pub fn was_redirected(&self) -> bool {
        self.redirect_chain.len() > 1
    }

    /// Where the chain ended up
    pub fn final_url(&self) -> &str {
        self.redirect_chain
            .last()
            .map(String::as_str)
            .unwrap_or(&self.url)
    }
}
