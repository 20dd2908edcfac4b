// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Subcommands:
// - scan: check a batch of URLs (arguments and/or a file)
// - rescan: check a single URL again
// - check-domain: blacklist lookup, no network
// - last: print a previously saved result set
//
// The scanner knobs live in ScanArgs, which scan and rescan share through
// #[command(flatten)].
// =============================================================================

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use linkcheckr::config::{DEFAULT_CONCURRENCY_LIMIT, DEFAULT_MAX_REDIRECT_HOPS, DEFAULT_TIMEOUT};
use linkcheckr::{Blacklist, ScanOptions};

#[derive(Parser, Debug)]
#[command(
    name = "linkcheckr",
    version,
    about = "Check a batch of URLs for broken links, redirect chains and risky domains",
    long_about = "linkcheckr sends a lightweight HEAD request to every URL, follows redirects hop by hop, \
                  and flags hosts found on a risky-domain blacklist without ever contacting them."
)]
pub struct Cli {
    /// Log level for diagnostics on stderr (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: LevelFilter,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a batch of URLs
    ///
    /// Example: linkcheckr scan example.com https://rust-lang.org --file links.csv
    Scan {
        /// URLs to check; a missing scheme means https://
        urls: Vec<String>,

        /// Read more URLs from a text file (one per line) or a CSV file (first column)
        #[arg(long, short)]
        file: Option<PathBuf>,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,

        /// Save the result set to this file so `last` can show it again
        #[arg(long)]
        save: Option<PathBuf>,

        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Scan a single URL again
    Rescan {
        url: String,

        #[arg(long)]
        json: bool,

        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Check a hostname against the blacklist without any network access
    CheckDomain {
        hostname: String,

        /// Blacklist file (one domain per line) instead of the built-in list
        #[arg(long)]
        blacklist: Option<PathBuf>,
    },

    /// Print a result set saved with `scan --save`
    Last {
        file: PathBuf,

        #[arg(long)]
        json: bool,
    },
}

/// Options shared by every command that touches the network
#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Timeout per request attempt, in milliseconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_millis() as u64)]
    pub timeout_ms: u64,

    /// Maximum number of redirects to follow
    #[arg(long, default_value_t = DEFAULT_MAX_REDIRECT_HOPS)]
    pub max_hops: usize,

    /// Relay to retry through when a direct request fails, e.g. https://relay.example/
    #[arg(long)]
    pub relay: Option<Url>,

    /// Maximum number of URLs checked at the same time
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY_LIMIT)]
    pub concurrency: usize,

    /// Blacklist file (one domain per line) instead of the built-in list
    #[arg(long)]
    pub blacklist: Option<PathBuf>,
}

impl ScanArgs {
    pub fn to_options(&self) -> Result<ScanOptions> {
        let mut options = ScanOptions {
            timeout: Duration::from_millis(self.timeout_ms),
            max_redirect_hops: self.max_hops,
            concurrency_limit: self.concurrency,
            ..Default::default()
        };
        if let Some(relay) = &self.relay {
            options = options.with_relay(relay.clone());
        }
        options.validate().context("Invalid scan options")?;
        Ok(options)
    }

    pub fn load_blacklist(&self) -> Result<Arc<Blacklist>> {
        load_blacklist(self.blacklist.as_deref())
    }
}

pub fn load_blacklist(path: Option<&std::path::Path>) -> Result<Arc<Blacklist>> {
    let blacklist = match path {
        Some(path) => Blacklist::load(path)?,
        None => Blacklist::builtin(),
    };
    log::debug!("Blacklist holds {} domain(s)", blacklist.len());
    Ok(Arc::new(blacklist))
}
