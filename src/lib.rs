// src/lib.rs
// =============================================================================
// linkcheckr: checks batches of URLs for reachability.
//
// For every input line the scanner produces one ScanResult: an ok/broken/
// redirect/... status, the redirect chain it walked, and whether the host is
// on the risky-domain blacklist.
//
// Quick start:
//
//     use std::sync::Arc;
//     use linkcheckr::{Blacklist, ScanOptions, Scanner};
//
//     let scanner = Scanner::from_options(ScanOptions::default(), Arc::new(Blacklist::builtin()))?;
//     let results = scanner.scan(&["example.com", "https://rust-lang.org"]).await;
// =============================================================================

pub mod checker;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod store;

pub use checker::{Blacklist, Progress, ScanResult, Scanner, Status, Summary, Transport};
pub use config::ScanOptions;
pub use error::{ConfigError, TransportError};
