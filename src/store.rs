// src/store.rs
// =============================================================================
// Save and load the last result set as JSON.
//
// The file holds one object:
//   { "saved_at": "...", "results": [ ScanResult, ... ] }
//
// Saving replaces the previous file; there is no history.
// =============================================================================

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::checker::ScanResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedScan {
    pub saved_at: DateTime<Utc>,
    pub results: Vec<ScanResult>,
}

pub fn save_results(path: &Path, results: &[ScanResult]) -> Result<()> {
    // Stamp the set with when it was saved, not when it was scanned
    let saved = SavedScan {
        saved_at: Utc::now(),
        results: results.to_vec(),
    };
    // Pretty JSON so the file can be read (and diffed) by hand
    let json = serde_json::to_string_pretty(&saved)?;

    // fs::write truncates any previous file
    fs::write(path, json).with_context(|| format!("Could not save results to {}", path.display()))?;
    Ok(())
}

pub fn load_results(path: &Path) -> Result<SavedScan> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Could not read saved results {}", path.display()))?;
    // A parse failure usually means the wrong file was passed
    let saved = serde_json::from_str(&json)
        .with_context(|| format!("{} is not a saved result set", path.display()))?;
    Ok(saved)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does #[derive(Serialize, Deserialize)] buy us?
//    - serde generates the JSON mapping from the struct definition
//    - DateTime<Utc> serializes as an RFC 3339 string thanks to chrono's
//      "serde" feature
//
// 2. What is with_context?
//    - It wraps the underlying error with a message of our own
//    - The closure only runs when there actually is an error
//    - `{:#}` in main prints both: "Could not read ...: No such file"
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::Status;

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last.json");
        let results = vec![
            ScanResult::new("https://a.com/", Status::Ok).with_code(200),
            ScanResult::new("https://b.com/", Status::Broken)
                .with_code(404)
                .with_error("HTTP 404 Not Found"),
        ];

        save_results(&path, &results).unwrap();
        let saved = load_results(&path).unwrap();

        assert_eq!(saved.results, results);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "not json").unwrap();
        let err = load_results(&path).unwrap_err();
        assert!(err.to_string().contains("is not a saved result set"));
    }
}
