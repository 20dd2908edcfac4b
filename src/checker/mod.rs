// src/checker/mod.rs
// =============================================================================
// This module contains all link checking logic.
//
// Submodules:
// - normalize: turns raw input lines into URLs
// - blacklist: risky-domain matching
// - transport: HEAD checks over the network (plus the relay fallback)
// - fake: a scripted transport for tests
// - redirect: follows redirect chains hop by hop
// - scan: the orchestrator tying it all together
// - aggregate: counts, health score and severity sorting
// - result: the ScanResult record and its Status
//
// This file (mod.rs) is the module root - it re-exports the public API so
// callers can write `checker::Scanner` instead of `checker::scan::Scanner`.
// =============================================================================

mod aggregate;
mod blacklist;
pub mod fake;
mod normalize;
mod redirect;
mod result;
mod scan;
mod transport;

pub use aggregate::{health_score, sort_by_severity, sorted_by_severity, Summary};
pub use blacklist::{Blacklist, BUILTIN_DOMAINS};
pub use fake::{FakeTransport, Reply};
pub use normalize::{has_scheme, input_lines, normalize, InvalidUrl, ScanTarget};
pub use redirect::{resolve, RedirectEnd, Resolution};
pub use result::{ScanResult, Status};
pub use scan::{Progress, Scanner};
pub use transport::{HttpTransport, Probe, Prober, RelayTransport, Transport};
