// src/main.rs
// =============================================================================
// This is the entry point of the linkcheckr CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = all ok, 1 = issues found, 2 = error)
// =============================================================================

mod cli;
mod report;

use anyhow::{bail, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use cli::{Cli, Commands, ScanArgs};
use linkcheckr::{input, logging, store, ScanResult, Scanner};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logger(cli.log_level);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = every result is ok
//   Ok(1) = at least one result needs attention
//   Err   = we could not run at all
async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Scan {
            urls,
            file,
            json,
            save,
            scan,
        } => handle_scan(urls, file.as_deref(), json, save, &scan).await,
        Commands::Rescan { url, json, scan } => handle_rescan(&url, json, &scan).await,
        Commands::CheckDomain { hostname, blacklist } => handle_check_domain(&hostname, blacklist.as_deref()),
        Commands::Last { file, json } => handle_last(&file, json),
    }
}

async fn handle_scan(
    mut urls: Vec<String>,
    file: Option<&Path>,
    json: bool,
    save: Option<PathBuf>,
    args: &ScanArgs,
) -> Result<i32> {
    if let Some(path) = file {
        let from_file = input::read_url_file(path)?;
        if !json {
            println!("📄 Read {} URL(s) from {}", from_file.len(), path.display());
        }
        urls.extend(from_file);
    }
    urls.retain(|url| !url.trim().is_empty());

    if urls.is_empty() {
        bail!("No URLs given. Pass them as arguments or with --file");
    }

    let scanner = Scanner::from_options(args.to_options()?, args.load_blacklist()?)?;

    if !json {
        println!("🌐 Checking {} link(s)...\n", urls.len());
    }
    let results = scanner
        .scan_with_progress(&urls, |p| report::print_progress(p.completed, p.total, p.result))
        .await;

    if let Some(path) = save {
        store::save_results(&path, &results)?;
        if !json {
            println!("💾 Saved results to {}", path.display());
        }
    }

    report::print_results(&results, json)?;
    Ok(exit_code(&results))
}

async fn handle_rescan(url: &str, json: bool, args: &ScanArgs) -> Result<i32> {
    let scanner = Scanner::from_options(args.to_options()?, args.load_blacklist()?)?;
    let result = scanner.rescan(url).await;

    let results = [result];
    report::print_results(&results, json)?;
    Ok(exit_code(&results))
}

fn handle_check_domain(hostname: &str, blacklist: Option<&Path>) -> Result<i32> {
    let blacklist = cli::load_blacklist(blacklist)?;

    // Accept a full URL too, people paste those
    let host = linkcheckr::checker::normalize(hostname)
        .ok()
        .and_then(|target| target.url().host_str().map(str::to_string))
        .unwrap_or_else(|| hostname.trim().to_string());

    if blacklist.is_risky(&host) {
        println!("☠️  {} is risky (blacklisted)", host);
        Ok(1)
    } else {
        println!("✅ {} is not on the blacklist", host);
        Ok(0)
    }
}

fn handle_last(file: &Path, json: bool) -> Result<i32> {
    let saved = store::load_results(file)?;
    if !json {
        println!("🕘 Results saved at {}\n", saved.saved_at.to_rfc3339());
    }
    report::print_results(&saved.results, json)?;
    Ok(exit_code(&saved.results))
}

fn exit_code(results: &[ScanResult]) -> i32 {
    if results.iter().all(ScanResult::is_ok) {
        0
    } else {
        1
    }
}
