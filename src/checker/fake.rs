// src/checker/fake.rs
// =============================================================================
// A scripted Transport for tests and dry runs.
//
// Each URL is given a reply up front. The fake records every call, counts
// requests that were cancelled mid-flight (dropped by a timeout) and tracks
// how many requests were running at once.
// =============================================================================

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

use super::transport::{Probe, Transport};
use crate::error::TransportError;

/// Canned answer for one URL
#[derive(Debug, Clone)]
pub enum Reply {
    /// Plain response with this status code
    Status(u16),
    /// 3xx with a Location header
    Redirect { code: u16, location: String },
    /// Transport failure
    Fail(TransportError),
    /// Never answers; only a timeout gets the caller out
    Hang,
}

impl Reply {
    pub fn redirect(location: impl Into<String>) -> Self {
        Reply::Redirect {
            code: 301,
            location: location.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct FakeTransport {
    routes: HashMap<String, Reply>,
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
    cancelled: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the reply for `url`. Unrouted URLs fail as unreachable.
    pub fn route(mut self, url: &str, reply: Reply) -> Self {
        let key = Url::parse(url)
            .map(String::from)
            .unwrap_or_else(|_| url.to_string());
        self.routes.insert(key, reply);
        self
    }

    /// Makes every request take at least `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }

    /// URLs requested so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Requests dropped before they finished
    pub fn cancelled(&self) -> usize {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Highest number of requests ever running at the same time
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, url: &Url) {
        let mut calls = self
            .calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        calls.push(url.to_string());
    }
}

// Counts a request as running until dropped
struct InFlight<'a> {
    current: &'a AtomicUsize,
}

impl<'a> InFlight<'a> {
    fn enter(current: &'a AtomicUsize, peak: &AtomicUsize) -> Self {
        let now = current.fetch_add(1, Ordering::SeqCst) + 1;
        peak.fetch_max(now, Ordering::SeqCst);
        Self { current }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }
}

// Bumps the cancel counter if the request never got to finish
struct CancelGuard<'a> {
    cancelled: &'a AtomicUsize,
    finished: bool,
}

impl Drop for CancelGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.cancelled.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn head(&self, url: &Url) -> Result<Probe, TransportError> {
        self.record(url);
        let _in_flight = InFlight::enter(&self.in_flight, &self.peak_in_flight);
        let mut guard = CancelGuard {
            cancelled: &self.cancelled,
            finished: false,
        };

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let reply = match self.routes.get(url.as_str()) {
            Some(Reply::Hang) => std::future::pending().await,
            Some(Reply::Status(code)) => Ok(Probe::new(*code)),
            Some(Reply::Redirect { code, location }) => Ok(Probe::redirect(*code, location.clone())),
            Some(Reply::Fail(error)) => Err(error.clone()),
            None => Err(TransportError::Unreachable(format!("no route to {}", url))),
        };

        guard.finished = true;
        reply
    }
}
