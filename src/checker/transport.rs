// src/checker/transport.rs
// =============================================================================
// This module performs the actual existence checks.
//
// Key functionality:
// - Transport trait: "send a HEAD to this URL and tell me what came back"
// - HttpTransport: the real thing, built on reqwest with redirects DISABLED
//   (the redirect resolver follows every hop itself)
// - RelayTransport: same request sent through a CORS-bypass style relay
// - Prober: runs one attempt under a timeout and, when enabled, retries a
//   failed attempt once through the relay
//
// Rust concepts:
// - Traits + async_trait: lets us swap the real network for a fake in tests
// - tokio::time::timeout: races a future against a deadline
// - Drop: when a timed-out future is dropped, its request is cancelled
// =============================================================================

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{header::LOCATION, redirect::Policy, Client, StatusCode};
use std::time::Duration;
use url::Url;

use crate::config::ScanOptions;
use crate::error::{ConfigError, TransportError};

/// What a single request attempt got back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    /// HTTP status code
    pub code: u16,
    /// Reason phrase, e.g. "Not Found"
    pub reason: Option<String>,
    /// Raw Location header, if the server sent one
    pub location: Option<String>,
}

impl Probe {
    pub fn new(code: u16) -> Self {
        let reason = StatusCode::from_u16(code)
            .ok()
            .and_then(|status| status.canonical_reason())
            .map(str::to_string);
        Self {
            code,
            reason,
            location: None,
        }
    }

    pub fn redirect(code: u16, location: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
            ..Self::new(code)
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }

    pub fn is_redirection(&self) -> bool {
        (300..400).contains(&self.code)
    }

    /// 4xx or 5xx
    pub fn is_error(&self) -> bool {
        (400..600).contains(&self.code)
    }

    /// "HTTP 404 Not Found"
    pub fn describe(&self) -> String {
        match &self.reason {
            Some(reason) => format!("HTTP {} {}", self.code, reason),
            None => format!("HTTP {}", self.code),
        }
    }
}

/// Something that can check whether a URL answers
///
/// Implementations must not follow redirects: a 3xx comes back as a Probe
/// with its Location header so the resolver can inspect every hop.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn head(&self, url: &Url) -> Result<Probe, TransportError>;
}

/// Direct HTTP transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(options: &ScanOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            client: build_client(options)?,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn head(&self, url: &Url) -> Result<Probe, TransportError> {
        let response = send_head(&self.client, url.as_str())
            .await
            .map_err(categorize_error)?;
        Ok(to_probe(&response))
    }
}

/// Sends requests through a relay that takes the target URL appended to
/// its own, e.g. `https://relay.example/https://target.com/page`
#[derive(Debug, Clone)]
pub struct RelayTransport {
    client: Client,
    prefix: String,
}

impl RelayTransport {
    pub fn new(relay_url: &Url, options: &ScanOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            client: build_client(options)?,
            prefix: relay_url.to_string(),
        })
    }

    fn relayed(&self, url: &Url) -> String {
        format!("{}{}", self.prefix, url)
    }
}

#[async_trait]
impl Transport for RelayTransport {
    async fn head(&self, url: &Url) -> Result<Probe, TransportError> {
        let response = send_head(&self.client, &self.relayed(url))
            .await
            .map_err(categorize_error)?;
        let mut probe = to_probe(&response);

        // Relays usually rewrite Location to point back at themselves
        let unprefixed = probe
            .location
            .as_deref()
            .and_then(|location| location.strip_prefix(self.prefix.as_str()))
            .map(str::to_string);
        if unprefixed.is_some() {
            probe.location = unprefixed;
        }
        Ok(probe)
    }
}

fn build_client(options: &ScanOptions) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(options.timeout)
        .redirect(Policy::none())
        .user_agent(options.user_agent.clone())
        .build()
}

async fn send_head(client: &Client, target: &str) -> Result<reqwest::Response, reqwest::Error> {
    let response = client.head(target).send().await?;

    // Some servers refuse HEAD outright; ask once more with GET.
    // The body is never read, dropping the response closes it.
    if matches!(
        response.status(),
        StatusCode::METHOD_NOT_ALLOWED | StatusCode::NOT_IMPLEMENTED
    ) {
        debug!("HEAD refused by {}, retrying with GET", target);
        return client.get(target).send().await;
    }

    Ok(response)
}

fn to_probe(response: &reqwest::Response) -> Probe {
    let status = response.status();
    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    Probe {
        code: status.as_u16(),
        reason: status.canonical_reason().map(str::to_string),
        location,
    }
}

// Sorts reqwest failures into our three buckets
fn categorize_error(error: reqwest::Error) -> TransportError {
    let error_string = error.to_string();

    if error.is_timeout() {
        TransportError::Timeout
    } else if error.is_connect() || error.is_request() {
        // Connect errors cover DNS failures, refused connections and TLS
        // handshake problems; request errors are protocol-level breakage
        let detail = std::error::Error::source(&error)
            .map(|source| source.to_string())
            .unwrap_or(error_string);
        TransportError::Unreachable(detail)
    } else if error_string.contains("certificate") || error_string.contains("dns") {
        TransportError::Unreachable(error_string)
    } else {
        TransportError::Unknown(error_string)
    }
}

/// One request attempt with a deadline, plus the optional relay retry
#[derive(Clone, Copy)]
pub struct Prober<'a> {
    direct: &'a dyn Transport,
    relay: Option<&'a dyn Transport>,
    timeout: Duration,
}

impl<'a> Prober<'a> {
    pub fn new(direct: &'a dyn Transport, relay: Option<&'a dyn Transport>, timeout: Duration) -> Self {
        Self {
            direct,
            relay,
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Probes `url`, falling back to the relay at most once
    pub async fn probe(&self, url: &Url) -> Result<Probe, TransportError> {
        debug!("Probing {}", url);
        let direct_error = match attempt(self.direct, url, self.timeout).await {
            Ok(probe) => return Ok(probe),
            Err(e) => e,
        };

        let Some(relay) = self.relay else {
            return Err(direct_error);
        };

        warn!("Direct check of {} failed ({}), retrying through relay", url, direct_error);
        match attempt(relay, url, self.timeout).await {
            Ok(probe) => Ok(probe),
            Err(relay_error) => {
                debug!("Relay check of {} failed too: {}", url, relay_error);
                Err(direct_error)
            }
        }
    }
}

// The timeout owns the request future: when the deadline wins, the future
// is dropped right here and the request goes with it.
async fn attempt(transport: &dyn Transport, url: &Url, timeout: Duration) -> Result<Probe, TransportError> {
    match tokio::time::timeout(timeout, transport.head(url)).await {
        Ok(result) => result,
        Err(_elapsed) => Err(TransportError::Timeout),
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a trait for the transport?
//    - The scanner only needs "send a request, get a Probe back"
//    - Tests plug in FakeTransport and never touch the network
//    - Arc<dyn Transport> lets the scanner hold either one
//
// 2. What does #[async_trait] do?
//    - Async methods in traits used through `dyn` need boxing
//    - The macro rewrites `async fn` into a method returning a boxed future
//
// 3. How does tokio::time::timeout cancel a request?
//    - It polls the request future and a timer side by side
//    - If the timer wins, the request future is dropped
//    - Dropping a reqwest future closes its connection, nothing keeps running
// -----------------------------------------------------------------------------
