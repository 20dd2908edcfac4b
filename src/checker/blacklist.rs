// src/checker/blacklist.rs
// =============================================================================
// Risky-domain matching.
//
// A hostname is risky when it IS a blacklisted domain or is a subdomain of
// one. We never use substring matching: `notevil.com` is not `evil.com`.
//
// The list is loaded once (built-in entries or a file) and then shared as
// Arc<Blacklist>. Nothing mutates it while scans are running.
// =============================================================================

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use url::Url;

use crate::error::ConfigError;

/// Entries shipped with the binary, used when no --blacklist file is given
pub const BUILTIN_DOMAINS: &[&str] = &[
    "malware.testing.google.test",
    "testsafebrowsing.appspot.com",
    "malware.wicar.org",
    "phishing.example",
    "scam.test",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blacklist {
    domains: HashSet<String>,
}

impl Blacklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        Self::from_entries(BUILTIN_DOMAINS.iter().copied())
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::new();
        for entry in entries {
            list.insert(entry.as_ref());
        }
        list
    }

    /// Parses a list with one domain per line; `#` starts a comment
    pub fn parse(text: &str) -> Self {
        Self::from_entries(
            text.lines()
                .map(|line| line.split('#').next().unwrap_or("")),
        )
    }

    /// Reads a blacklist file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Blacklist {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    /// Adds a domain; returns false for blanks and duplicates
    pub fn insert(&mut self, domain: &str) -> bool {
        match normalize_entry(domain) {
            Some(entry) => self.domains.insert(entry),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Exact or proper-subdomain match against the list
    pub fn is_risky(&self, hostname: &str) -> bool {
        let host = hostname.trim().trim_end_matches('.').to_ascii_lowercase();
        if host.is_empty() {
            return false;
        }
        if self.domains.contains(&host) {
            return true;
        }

        // Walk the parent domains: a.b.evil.com -> b.evil.com -> evil.com -> com
        host.match_indices('.')
            .any(|(dot, _)| self.domains.contains(&host[dot + 1..]))
    }

    /// Checks the host of a parsed URL
    pub fn matches_url(&self, url: &Url) -> bool {
        url.host_str().map_or(false, |host| self.is_risky(host))
    }
}

fn normalize_entry(raw: &str) -> Option<String> {
    let entry = raw
        .trim()
        .trim_start_matches("*.")
        .trim_matches('.')
        .to_ascii_lowercase();
    if entry.is_empty() {
        None
    } else {
        Some(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evil() -> Blacklist {
        Blacklist::from_entries(["evil.com"])
    }

    #[test]
    fn test_exact_match() {
        assert!(evil().is_risky("evil.com"));
    }

    #[test]
    fn test_subdomain_match() {
        assert!(evil().is_risky("sub.evil.com"));
        assert!(evil().is_risky("a.b.evil.com"));
    }

    #[test]
    fn test_no_substring_false_positive() {
        let list = evil();
        assert!(!list.is_risky("notevil.com"));
        assert!(!list.is_risky("evil.com.example.org"));
        assert!(!list.is_risky("com"));

        let list = Blacklist::from_entries(["scam.com"]);
        assert!(!list.is_risky("notscam.com"));
    }

    #[test]
    fn test_case_and_trailing_dot() {
        assert!(evil().is_risky("SUB.Evil.COM."));
        assert!(!evil().is_risky(""));
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let list = Blacklist::parse("# risky hosts\nevil.com\n\n*.Bad.org  # wildcard\n.worse.net\n");
        assert_eq!(list.len(), 3);
        assert!(list.is_risky("x.bad.org"));
        assert!(list.is_risky("worse.net"));
    }

    #[test]
    fn test_insert_reports_duplicates() {
        let mut list = Blacklist::new();
        assert!(list.insert("evil.com"));
        assert!(!list.insert("EVIL.com"));
        assert!(!list.insert("   "));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_matches_url_host() {
        let url = Url::parse("https://login.evil.com/account").unwrap();
        assert!(evil().matches_url(&url));
        let url = Url::parse("https://notevil.com/").unwrap();
        assert!(!evil().matches_url(&url));
    }

    #[test]
    fn test_builtin_list_loaded() {
        let list = Blacklist::builtin();
        assert_eq!(list.len(), BUILTIN_DOMAINS.len());
        assert!(list.is_risky("www.scam.test"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Blacklist::load(Path::new("/definitely/not/here.txt"));
        assert!(matches!(result, Err(ConfigError::Blacklist { .. })));
    }
}
