// src/checker/normalize.rs
// =============================================================================
// Turns raw input lines into absolute http(s) URLs.
//
// Rules:
// - Surrounding whitespace is trimmed
// - A line without http:// or https:// gets https:// in front
// - Whatever the url crate cannot parse (or parses without a host) is
//   rejected with an InvalidUrl value instead of a panic
//
// Duplicates are NOT removed here: every input line gets its own result.
// =============================================================================

use thiserror::Error;
use url::Url;

/// An input line that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTarget {
    input: String,
    url: Url,
}

impl ScanTarget {
    /// The text exactly as the user gave it
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

/// An input line that could not be turned into a URL
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid URL '{input}': {reason}")]
pub struct InvalidUrl {
    pub input: String,
    pub reason: String,
}

impl InvalidUrl {
    fn new(input: &str, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Returns true if the text already starts with http:// or https://
///
/// The check ignores case, so `HTTP://Example.com` is left alone.
pub fn has_scheme(text: &str) -> bool {
    let lower = text.get(..8).unwrap_or(text).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Normalizes one raw line into a ScanTarget
pub fn normalize(raw: &str) -> Result<ScanTarget, InvalidUrl> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InvalidUrl::new(raw, "empty input"));
    }

    let candidate = if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&candidate).map_err(|e| InvalidUrl::new(trimmed, e.to_string()))?;

    if url.host_str().map_or(true, str::is_empty) {
        return Err(InvalidUrl::new(trimmed, "missing host"));
    }

    Ok(ScanTarget {
        input: trimmed.to_string(),
        url,
    })
}

/// Splits pasted text into scan inputs, dropping blank lines
pub fn input_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
