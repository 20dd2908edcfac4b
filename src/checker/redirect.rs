// src/checker/redirect.rs
// =============================================================================
// Follows redirect chains one hop at a time.
//
// How it works:
// 1. Start with the scanned URL and the 3xx it answered with
// 2. Resolve the Location header against the current URL
// 3. Stop on a loop, on the hop budget, or on a blacklisted hop
// 4. Otherwise probe the next URL (with its own timeout) and repeat
//    until something other than a 3xx comes back
//
// Every URL we move to is appended to the chain, so the chain always starts
// at the scanned URL and never holds more than max_hops + 1 entries.
//
// Rust concepts:
// - HashSet: visited URLs, O(1) loop detection
// - Url::join: resolves relative Location headers like "/new/path"
// =============================================================================

use log::{debug, info};
use std::collections::HashSet;
use url::Url;

use super::blacklist::Blacklist;
use super::transport::{Probe, Prober};
use crate::error::TransportError;

/// Why the resolver stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectEnd {
    /// Reached a non-3xx response
    Landed(Probe),
    /// Location pointed back at a URL already in the chain
    Loop { target: String },
    /// Still redirecting after max_hops hops
    HopLimit,
    /// Next hop is blacklisted; it was never fetched
    RiskyHop { host: String },
    /// Probing a hop failed
    Failed(TransportError),
    /// 3xx without a Location we can follow
    BadLocation { location: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub chain: Vec<String>,
    /// Last HTTP status code received
    pub last_code: u16,
    pub end: RedirectEnd,
}

/// Follows the chain that starts with `start` answering `first`
///
/// `first` is normally a 3xx. Anything else is returned as `Landed`
/// right away with a one-entry chain.
pub async fn resolve(
    prober: &Prober<'_>,
    blacklist: &Blacklist,
    start: &Url,
    first: Probe,
    max_hops: usize,
) -> Resolution {
    let mut chain = vec![start.to_string()];
    let mut visited: HashSet<String> = HashSet::from([start.to_string()]);
    let mut current = start.clone();
    let mut response = first;
    let mut hops = 0;

    loop {
        let last_code = response.code;
        let finish = |chain, end| Resolution {
            chain,
            last_code,
            end,
        };

        if !response.is_redirection() {
            return finish(chain, RedirectEnd::Landed(response));
        }

        let Some(next) = next_hop(&current, response.location.as_deref()) else {
            return finish(
                chain,
                RedirectEnd::BadLocation {
                    location: response.location,
                },
            );
        };

        if visited.contains(next.as_str()) {
            debug!("Redirect loop: {} points back to {}", current, next);
            return finish(
                chain,
                RedirectEnd::Loop {
                    target: next.to_string(),
                },
            );
        }

        if hops == max_hops {
            debug!("Giving up on {} after {} redirects", start, hops);
            return finish(chain, RedirectEnd::HopLimit);
        }

        hops += 1;
        visited.insert(next.to_string());
        chain.push(next.to_string());

        if blacklist.matches_url(&next) {
            let host = next.host_str().unwrap_or_default().to_string();
            info!("Redirect from {} lands on blacklisted host {}", start, host);
            return finish(chain, RedirectEnd::RiskyHop { host });
        }

        match prober.probe(&next).await {
            Ok(probe) => {
                response = probe;
                current = next;
            }
            Err(e) => return finish(chain, RedirectEnd::Failed(e)),
        }
    }
}

// Resolves a Location header (absolute or relative) to the next http(s) URL
fn next_hop(current: &Url, location: Option<&str>) -> Option<Url> {
    let location = location?.trim();
    if location.is_empty() {
        return None;
    }
    current
        .join(location)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is let-else?
//    - `let Some(next) = ... else { return ...; };`
//    - Binds the value if the pattern matches, otherwise runs the else block
//    - The else block must leave the function (return, break, panic)
//
// 2. Why not let reqwest follow redirects?
//    - Automatic following hides the intermediate hops
//    - We need every hop to build the chain, spot loops, and check each
//      host against the blacklist BEFORE requesting it
// -----------------------------------------------------------------------------
