// tests/cli.rs
// =============================================================================
// Runs the compiled binary and checks output and exit codes.
// =============================================================================

use assert_cmd::Command;
use mockito::Server;
use predicates::str::contains;
use std::io::Write;

type TestResult = Result<(), Box<dyn std::error::Error>>;

const NAME: &str = "linkcheckr";

#[test]
fn test_check_domain_risky() -> TestResult {
    Command::cargo_bin(NAME)?
        .args(["check-domain", "sub.scam.test"])
        .assert()
        .code(1)
        .stdout(contains("is risky"));
    Ok(())
}

#[test]
fn test_check_domain_no_substring_match() -> TestResult {
    Command::cargo_bin(NAME)?
        .args(["check-domain", "notscam.test"])
        .assert()
        .success()
        .stdout(contains("is not on the blacklist"));
    Ok(())
}

#[test]
fn test_check_domain_custom_blacklist() -> TestResult {
    let mut list = tempfile::NamedTempFile::new()?;
    writeln!(list, "# local list\nevil.com")?;

    Command::cargo_bin(NAME)?
        .args(["check-domain", "https://www.evil.com/login", "--blacklist"])
        .arg(list.path())
        .assert()
        .code(1)
        .stdout(contains("www.evil.com is risky"));
    Ok(())
}

#[test]
fn test_scan_without_urls_is_an_error() -> TestResult {
    Command::cargo_bin(NAME)?
        .arg("scan")
        .assert()
        .code(2)
        .stderr(contains("No URLs given"));
    Ok(())
}

#[test]
fn test_scan_invalid_and_risky_without_network() -> TestResult {
    Command::cargo_bin(NAME)?
        .args(["scan", "not a url", "www.scam.test", "--json"])
        .assert()
        .code(1)
        .stdout(contains("\"invalid\""))
        .stdout(contains("\"risky\""))
        .stdout(contains("\"health_score\": 0"));
    Ok(())
}

#[test]
fn test_scan_save_then_last() -> TestResult {
    let mut server = Server::new();
    let _m = server.mock("HEAD", "/200").with_status(200).create();
    let endpoint = server.url() + "/200";
    let dir = tempfile::tempdir()?;
    let saved = dir.path().join("last.json");

    Command::cargo_bin(NAME)?
        .args(["scan", endpoint.as_str(), "--save"])
        .arg(&saved)
        .assert()
        .success()
        .stdout(contains("Health score: 100%"));

    Command::cargo_bin(NAME)?
        .arg("last")
        .arg(&saved)
        .arg("--json")
        .assert()
        .success()
        .stdout(contains(endpoint.as_str()));
    Ok(())
}

#[test]
fn test_scan_reads_csv_file() -> TestResult {
    let mut server = Server::new();
    let _m = server.mock("HEAD", "/404").with_status(404).create();
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile()?;
    writeln!(file, "URL,Status\n{}/404,ok", server.url())?;

    Command::cargo_bin(NAME)?
        .args(["scan", "--file"])
        .arg(file.path())
        .assert()
        .code(1)
        .stdout(contains("BROKEN"));
    Ok(())
}
