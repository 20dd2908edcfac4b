// src/checker/scan.rs
// =============================================================================
// The scan orchestrator: runs every URL through the pipeline
//
//   normalize -> blacklist -> transport -> redirect resolver -> classify
//
// and turns whatever happened into exactly one ScanResult.
//
// Scheduling: URLs are scanned in parallel, at most `concurrency_limit` at
// a time. Results come back in input order, and an optional callback sees
// each one as soon as it finishes.
//
// The Scanner only holds read-only state, so a rescan can run while a batch
// is still in progress.
// =============================================================================

use futures::future::{BoxFuture, FutureExt};
use futures::stream::{self, StreamExt};
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;

use super::blacklist::Blacklist;
use super::normalize::normalize;
use super::redirect::{resolve, RedirectEnd, Resolution};
use super::result::{ScanResult, Status};
use super::transport::{HttpTransport, Probe, Prober, RelayTransport, Transport};
use crate::config::ScanOptions;
use crate::error::{ConfigError, TransportError};

/// Progress event handed to the callback of `scan_with_progress`
#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    /// How many URLs have finished, including this one
    pub completed: usize,
    pub total: usize,
    pub result: &'a ScanResult,
}

pub struct Scanner {
    options: ScanOptions,
    blacklist: Arc<Blacklist>,
    direct: Arc<dyn Transport>,
    relay: Option<Arc<dyn Transport>>,
}

impl Scanner {
    /// Builds a scanner around any transport (real or fake)
    pub fn new(options: ScanOptions, blacklist: Arc<Blacklist>, direct: Arc<dyn Transport>) -> Self {
        Self {
            options,
            blacklist,
            direct,
            relay: None,
        }
    }

    /// Sets the transport used for the relay fallback
    ///
    /// It is only consulted while `options.use_relay` is true.
    pub fn with_relay(mut self, relay: Arc<dyn Transport>) -> Self {
        self.relay = Some(relay);
        self
    }

    /// Builds a scanner that talks to the network with reqwest
    pub fn from_options(options: ScanOptions, blacklist: Arc<Blacklist>) -> Result<Self, ConfigError> {
        options.validate()?;

        let direct: Arc<dyn Transport> = Arc::new(HttpTransport::new(&options)?);
        let relay = match (&options.relay_url, options.use_relay) {
            (Some(relay_url), true) => {
                Some(Arc::new(RelayTransport::new(relay_url, &options)?) as Arc<dyn Transport>)
            }
            _ => None,
        };

        Ok(Self {
            options,
            blacklist,
            direct,
            relay,
        })
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Blacklist check without any network access
    pub fn is_risky(&self, hostname: &str) -> bool {
        self.blacklist.is_risky(hostname)
    }

    /// Scans a batch; one result per non-blank input, in input order
    pub async fn scan<S: AsRef<str>>(&self, urls: &[S]) -> Vec<ScanResult> {
        self.scan_with_progress(urls, |_| {}).await
    }

    pub async fn scan_with_progress<S, F>(&self, urls: &[S], mut on_progress: F) -> Vec<ScanResult>
    where
        S: AsRef<str>,
        F: FnMut(Progress<'_>),
    {
        // Owned copies: the per-URL futures must not borrow from `urls`,
        // or the batch future could not be moved onto another task
        let inputs: Vec<String> = urls
            .iter()
            .map(AsRef::as_ref)
            .filter(|raw| !raw.trim().is_empty())
            .map(str::to_string)
            .collect();
        let total = inputs.len();
        let limit = self.options.concurrency_limit.max(1);
        info!("Scanning {} URL(s), up to {} at a time", total, limit);

        // Tag every URL with its position, then run up to `limit` at once
        let mut pending = stream::iter(inputs.into_iter().enumerate())
            .map(|(index, raw)| self.scan_indexed(index, raw))
            .buffer_unordered(limit);

        // buffer_unordered hands results back as they finish,
        // the index puts them back in input order
        let mut slots: Vec<Option<ScanResult>> = (0..total).map(|_| None).collect();
        let mut completed = 0;
        while let Some((index, result)) = pending.next().await {
            completed += 1;
            // Progress fires in completion order, not input order
            on_progress(Progress {
                completed,
                total,
                result: &result,
            });
            slots[index] = Some(result);
        }

        // Every slot is filled once the stream is drained
        let results: Vec<ScanResult> = slots.into_iter().flatten().collect();
        info!("Scan finished: {} result(s)", results.len());
        results
    }

    /// Runs one URL through the exact same pipeline as a batch scan
    pub async fn rescan(&self, url: &str) -> ScanResult {
        info!("Rescanning {}", url.trim());
        self.scan_one(url).await
    }

    // Boxed so the stream item type names a single lifetime ('_ of self)
    fn scan_indexed(&self, index: usize, raw: String) -> BoxFuture<'_, (usize, ScanResult)> {
        async move { (index, self.scan_one(&raw).await) }.boxed()
    }

    async fn scan_one(&self, raw: &str) -> ScanResult {
        let target = match normalize(raw) {
            Ok(target) => target,
            Err(invalid) => {
                debug!("{}", invalid);
                return ScanResult::new(raw.trim(), Status::Invalid).with_error(invalid.reason);
            }
        };
        let url = target.url();
        debug!("'{}' normalized to {}", target.input(), url);

        // Known-bad hosts are never contacted
        if self.blacklist.matches_url(url) {
            info!("{} is on the blacklist, skipping network check", url);
            return ScanResult::new(url.as_str(), Status::Risky).with_error("Domain is on the blacklist");
        }

        // First request: direct, then the relay if enabled
        let prober = self.prober();
        let first = match prober.probe(url).await {
            Ok(probe) => probe,
            Err(e) => return failure(url.as_str(), vec![url.to_string()], &e, prober.timeout()),
        };

        // 3xx: hand over to the resolver, it follows the rest of the hops
        if first.is_redirection() {
            let resolution = resolve(&prober, &self.blacklist, url, first, self.options.max_redirect_hops).await;
            return from_resolution(url.as_str(), resolution, &self.options);
        }

        // Anything else is a final answer for a one-entry chain
        landed(url.as_str(), vec![url.to_string()], &first)
    }

    fn prober(&self) -> Prober<'_> {
        // A configured relay stays unused until use_relay is switched on
        let relay = if self.options.use_relay {
            self.relay.as_deref()
        } else {
            None
        };
        Prober::new(self.direct.as_ref(), relay, self.options.timeout)
    }
}

// Final, non-3xx response
fn landed(url: &str, chain: Vec<String>, probe: &Probe) -> ScanResult {
    let status = if probe.is_success() {
        Status::Ok
    } else if probe.is_error() {
        Status::Broken
    } else {
        Status::Unknown
    };

    let result = ScanResult::new(url, status)
        .with_chain(chain)
        .with_code(probe.code);

    match status {
        Status::Ok => result,
        Status::Broken => result.with_error(probe.describe()),
        _ => result.with_error(format!("Unexpected response: {}", probe.describe())),
    }
}

fn failure(url: &str, chain: Vec<String>, error: &TransportError, timeout: Duration) -> ScanResult {
    // Transport errors map one-to-one onto statuses
    let (status, message) = match error {
        TransportError::Timeout => (
            Status::Timeout,
            format!("Request timed out after {} ms", timeout.as_millis()),
        ),
        TransportError::Unreachable(detail) => (Status::Unreachable, format!("Unreachable: {}", detail)),
        TransportError::Unknown(detail) => (Status::Unknown, detail.clone()),
    };
    ScanResult::new(url, status).with_chain(chain).with_error(message)
}

fn from_resolution(url: &str, resolution: Resolution, options: &ScanOptions) -> ScanResult {
    let Resolution {
        chain,
        last_code,
        end,
    } = resolution;

    // Loops and the hop budget both leave the result at "redirect":
    // the URL answers, it just never settles anywhere
    match end {
        RedirectEnd::Landed(probe) => landed(url, chain, &probe),
        RedirectEnd::Loop { target } => ScanResult::new(url, Status::Redirect)
            .with_chain(chain)
            .with_code(last_code)
            .with_error(format!("Redirect loop detected: points back to {}", target)),
        RedirectEnd::HopLimit => ScanResult::new(url, Status::Redirect)
            .with_chain(chain)
            .with_code(last_code)
            .with_error(format!("Too many redirects (limit {})", options.max_redirect_hops)),
        RedirectEnd::RiskyHop { host } => ScanResult::new(url, Status::Risky)
            .with_chain(chain)
            .with_code(last_code)
            .with_error(format!("Redirects to blacklisted domain {}", host)),
        RedirectEnd::Failed(error) => failure(url, chain, &error, options.timeout),
        RedirectEnd::BadLocation { location } => {
            let detail = match location {
                Some(location) => format!("unusable Location '{}'", location),
                None => "no Location header".to_string(),
            };
            ScanResult::new(url, Status::Unknown)
                .with_chain(chain)
                .with_code(last_code)
                .with_error(format!("Redirect (HTTP {}) with {}", last_code, detail))
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. How does buffer_unordered limit concurrency?
//    - stream::iter(...).map(...) produces futures, but does not run them
//    - buffer_unordered(n) polls at most n of them at a time
//    - A new one starts only when a running one finishes
//
// 2. Why Arc<dyn Transport> instead of a generic parameter?
//    - The real and the fake transport are different types
//    - The scanner keeps one type either way, and it clones cheaply
//
// 3. Why is the per-URL future boxed?
//    - tokio::spawn needs a future that is Send + 'static
//    - Boxing gives the stream one concrete item type, so the compiler
//      can prove the whole batch future is Send
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::fake::{FakeTransport, Reply};

    fn scanner_with(fake: Arc<FakeTransport>, blacklist: Blacklist) -> Scanner {
        let options = ScanOptions {
            timeout: Duration::from_millis(100),
            ..Default::default()
        };
        Scanner::new(options, Arc::new(blacklist), fake)
    }

    #[tokio::test]
    async fn test_one_result_per_input_in_order() {
        let fake = Arc::new(
            FakeTransport::new()
                .route("https://ok.com/", Reply::Status(200))
                .route("https://gone.com/", Reply::Status(404)),
        );
        let scanner = scanner_with(fake.clone(), Blacklist::new());

        let inputs = ["ok.com", "not a url", "https://gone.com", "ok.com", "down.com"];
        let results = scanner.scan(&inputs).await;

        assert_eq!(results.len(), inputs.len());
        let statuses: Vec<Status> = results.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![Status::Ok, Status::Invalid, Status::Broken, Status::Ok, Status::Unreachable]
        );
        assert_eq!(results[1].url, "not a url");
        assert_eq!(results[2].error.as_deref(), Some("HTTP 404 Not Found"));
        assert_eq!(results[2].http_code, Some(404));
    }

    #[tokio::test]
    async fn test_chain_starts_with_normalized_url() {
        let fake = Arc::new(
            FakeTransport::new()
                .route("https://a.com/", Reply::redirect("https://b.com/"))
                .route("https://b.com/", Reply::Status(200))
                .route("https://c.com/", Reply::Status(200)),
        );
        let scanner = scanner_with(fake, Blacklist::new());

        for result in scanner.scan(&["a.com", "c.com", "bad url here"]).await {
            assert_eq!(result.redirect_chain[0], result.url);
        }
    }

    #[tokio::test]
    async fn test_risky_skips_transport() {
        let fake = Arc::new(FakeTransport::new().route("https://sub.evil.com/", Reply::Status(200)));
        let scanner = scanner_with(fake.clone(), Blacklist::from_entries(["evil.com"]));

        let results = scanner.scan(&["sub.evil.com", "https://evil.com/login"]).await;

        for result in &results {
            assert!(result.is_risky);
            assert_eq!(result.status, Status::Risky);
            assert_eq!(result.redirect_chain.len(), 1);
        }
        assert_eq!(fake.call_count(), 0);
    }

    #[tokio::test]
    async fn test_redirect_to_success_is_ok() {
        let fake = Arc::new(
            FakeTransport::new()
                .route("http://a.com/", Reply::redirect("https://a.com/"))
                .route("https://a.com/", Reply::Status(200)),
        );
        let scanner = scanner_with(fake, Blacklist::new());

        let result = scanner.rescan("http://a.com").await;

        assert_eq!(result.status, Status::Ok);
        assert_eq!(result.http_code, Some(200));
        assert!(result.was_redirected());
        assert_eq!(result.redirect_chain, vec!["http://a.com/", "https://a.com/"]);
    }

    #[tokio::test]
    async fn test_redirect_loop_classified_as_redirect() {
        let fake = Arc::new(
            FakeTransport::new()
                .route("https://a.com/", Reply::redirect("https://b.com/"))
                .route("https://b.com/", Reply::redirect("https://a.com/")),
        );
        let scanner = scanner_with(fake, Blacklist::new());

        let result = scanner.rescan("https://a.com/").await;

        assert_eq!(result.status, Status::Redirect);
        assert!(result.redirect_chain.len() <= scanner.options().max_redirect_hops + 1);
        assert!(result.error.unwrap().contains("loop"));
    }

    #[tokio::test]
    async fn test_redirect_to_broken() {
        let fake = Arc::new(
            FakeTransport::new()
                .route("https://a.com/", Reply::redirect("/missing"))
                .route("https://a.com/missing", Reply::Status(500)),
        );
        let scanner = scanner_with(fake, Blacklist::new());

        let result = scanner.rescan("a.com").await;
        assert_eq!(result.status, Status::Broken);
        assert_eq!(result.http_code, Some(500));
        assert_eq!(result.redirect_chain.len(), 2);
    }

    #[tokio::test]
    async fn test_redirect_to_blacklisted_host() {
        let fake = Arc::new(FakeTransport::new().route("https://a.com/", Reply::redirect("https://www.evil.com/")));
        let scanner = scanner_with(fake.clone(), Blacklist::from_entries(["evil.com"]));

        let result = scanner.rescan("a.com").await;
        assert_eq!(result.status, Status::Risky);
        assert!(result.is_risky);
        assert_eq!(fake.calls(), vec!["https://a.com/"]);
    }

    #[tokio::test]
    async fn test_timeout_cancels_request() {
        let fake = Arc::new(FakeTransport::new().route("https://slow.com/", Reply::Hang));
        let scanner = scanner_with(fake.clone(), Blacklist::new());

        let result = scanner.rescan("slow.com").await;

        assert_eq!(result.status, Status::Timeout);
        assert_eq!(result.error.as_deref(), Some("Request timed out after 100 ms"));
        assert_eq!(fake.cancelled(), 1);
    }

    #[tokio::test]
    async fn test_unknown_failure_and_odd_codes() {
        let fake = Arc::new(
            FakeTransport::new()
                .route("https://weird.com/", Reply::Fail(TransportError::Unknown("boom".to_string())))
                .route("https://info.com/", Reply::Status(101))
                .route("https://noloc.com/", Reply::Status(302)),
        );
        let scanner = scanner_with(fake, Blacklist::new());

        let results = scanner.scan(&["weird.com", "info.com", "noloc.com"]).await;
        assert!(results.iter().all(|r| r.status == Status::Unknown));
        assert_eq!(results[0].error.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn test_relay_fallback_only_when_enabled() {
        let direct = Arc::new(FakeTransport::new());
        let relay = Arc::new(FakeTransport::new().route("https://cors.com/", Reply::Status(200)));

        let disabled = Scanner::new(ScanOptions::default(), Arc::new(Blacklist::new()), direct.clone())
            .with_relay(relay.clone());
        assert_eq!(disabled.rescan("cors.com").await.status, Status::Unreachable);
        assert_eq!(relay.call_count(), 0);

        let options = ScanOptions {
            use_relay: true,
            ..Default::default()
        };
        let enabled = Scanner::new(options, Arc::new(Blacklist::new()), direct).with_relay(relay.clone());
        assert_eq!(enabled.rescan("cors.com").await.status, Status::Ok);
        assert_eq!(relay.call_count(), 1);
    }

    #[tokio::test]
    async fn test_concurrency_limit_respected() {
        let mut fake = FakeTransport::new().with_delay(Duration::from_millis(20));
        let urls: Vec<String> = (0..12).map(|i| format!("https://site{}.com/", i)).collect();
        for url in &urls {
            fake = fake.route(url, Reply::Status(200));
        }
        let fake = Arc::new(fake);
        let options = ScanOptions {
            concurrency_limit: 3,
            ..Default::default()
        };
        let scanner = Scanner::new(options, Arc::new(Blacklist::new()), fake.clone());

        let mut seen = Vec::new();
        let results = scanner
            .scan_with_progress(&urls, |p| seen.push((p.completed, p.total)))
            .await;

        assert_eq!(results.len(), 12);
        assert!(fake.peak_in_flight() <= 3);
        assert_eq!(seen.len(), 12);
        assert_eq!(seen.last(), Some(&(12, 12)));
        for (result, url) in results.iter().zip(&urls) {
            assert_eq!(&result.url, url);
        }
    }

    #[tokio::test]
    async fn test_blank_inputs_dropped() {
        let fake = Arc::new(FakeTransport::new().route("https://a.com/", Reply::Status(200)));
        let scanner = scanner_with(fake, Blacklist::new());
        let results = scanner.scan(&["", "a.com", "   "]).await;
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_rescan_stable_target_is_idempotent() {
        let fake = Arc::new(FakeTransport::new().route("https://stable.com/", Reply::Status(200)));
        let scanner = scanner_with(fake.clone(), Blacklist::new());

        let mut previous = None;
        for _ in 0..5 {
            let result = scanner.rescan("stable.com").await;
            assert_eq!(result.status, Status::Ok);
            if let Some(prev) = previous.replace(result.timestamp) {
                assert!(result.timestamp >= prev);
            }
        }
        assert_eq!(fake.call_count(), 5);
    }

    #[tokio::test]
    async fn test_rescan_during_batch() {
        let mut fake = FakeTransport::new().with_delay(Duration::from_millis(10));
        let urls: Vec<String> = (0..8).map(|i| format!("https://batch{}.com/", i)).collect();
        for url in &urls {
            fake = fake.route(url, Reply::Status(200));
        }
        let fake = Arc::new(fake.route("https://other.com/", Reply::Status(404)));
        let scanner = Arc::new(scanner_with(fake, Blacklist::new()));

        let batch = {
            let scanner = scanner.clone();
            let urls = urls.clone();
            tokio::spawn(async move { scanner.scan(&urls).await })
        };
        let single = scanner.rescan("other.com").await;
        let batch = batch.await.unwrap();

        assert_eq!(single.status, Status::Broken);
        assert_eq!(batch.len(), 8);
        assert!(batch.iter().all(ScanResult::is_ok));
    }

    #[test]
    fn test_is_risky_passthrough() {
        let scanner = scanner_with(Arc::new(FakeTransport::new()), Blacklist::from_entries(["evil.com"]));
        assert!(scanner.is_risky("sub.evil.com"));
        assert!(!scanner.is_risky("notevil.com"));
    }
}
