// src/report.rs
// =============================================================================
// Prints scan results for humans (a table) or machines (JSON).
//
// The table is sorted by severity so the things worth fixing come first.
// JSON output keeps the same order and adds the summary next to the
// results.
// =============================================================================

use anyhow::Result;
use serde::Serialize;

use linkcheckr::checker::sorted_by_severity;
use linkcheckr::{ScanResult, Status, Summary};

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: &'a Summary,
    results: &'a [ScanResult],
}

// Prints the results either as a table or JSON
pub fn print_results(results: &[ScanResult], json: bool) -> Result<()> {
    let sorted = sorted_by_severity(results.to_vec());
    let summary = Summary::from_results(&sorted);

    if json {
        let report = JsonReport {
            summary: &summary,
            results: &sorted,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(&sorted);
        print_summary(&summary);
    }
    Ok(())
}

// Prints results as a human-readable table in the terminal
fn print_table(results: &[ScanResult]) {
    println!("{:<60} {:<16} {:<30}", "URL", "STATUS", "MESSAGE");
    println!("{}", "=".repeat(106));

    for result in results {
        let message = result.error.as_deref().unwrap_or("");

        // Truncate URL if too long for display
        let url_display = if result.url.chars().count() > 57 {
            format!("{}...", result.url.chars().take(57).collect::<String>())
        } else {
            result.url.clone()
        };

        println!("{:<60} {:<16} {:<30}", url_display, format_status(result), message);

        // Show where a redirect ended up, then the hops in between
        if result.was_redirected() {
            println!("    ↪ ends at {}", result.final_url());
            println!("      via {}", result.redirect_chain.join(" → "));
        }
    }

    println!();
}

fn print_summary(summary: &Summary) {
    println!("📊 Summary:");
    println!("   ✅ OK: {}", summary.ok);
    println!("   🔀 Redirects: {}", summary.redirect);
    println!("   ❌ Broken: {}", summary.broken);
    println!("   ☠️  Risky: {}", summary.risky);
    println!("   ⏱️  Timeouts: {}", summary.timeout);
    println!("   🌐 Unreachable: {}", summary.unreachable);
    if summary.unknown > 0 {
        println!("   ⚠️  Unknown: {}", summary.unknown);
    }
    if summary.invalid > 0 {
        println!("   🚫 Invalid: {}", summary.invalid);
    }
    println!("   📋 Total: {} ({} need attention)", summary.total, summary.issues());
    println!("   💚 Health score: {}%", summary.health_score);
}

fn format_status(result: &ScanResult) -> String {
    let label = match result.status {
        Status::Ok => "✅ OK",
        Status::Redirect => "🔀 REDIRECT",
        Status::Broken => "❌ BROKEN",
        Status::Risky => "☠️  RISKY",
        Status::Timeout => "⏱️  TIMEOUT",
        Status::Unreachable => "🌐 UNREACHABLE",
        Status::Unknown => "⚠️  UNKNOWN",
        Status::Invalid => "🚫 INVALID",
    };
    match result.http_code {
        Some(code) if result.status != Status::Ok => format!("{} {}", label, code),
        _ => label.to_string(),
    }
}

/// Progress line on stderr, so JSON on stdout stays clean
pub fn print_progress(completed: usize, total: usize, result: &ScanResult) {
    eprintln!("  [{}/{}] {} {}", completed, total, result.status, result.url);
}
