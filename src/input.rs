// src/input.rs
// =============================================================================
// Reads the URL list for the CLI.
//
// Supported inputs:
// - plain text: one URL per line
// - CSV: only the first field of each line is used, and a leading
//   "URL" header row is skipped (so our own exports can be fed back in)
//
// Blank lines are dropped. Everything else is passed through untouched;
// validation is the scanner's job.
// =============================================================================

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};
use std::fs;
use std::path::Path;

use crate::checker::input_lines;

/// Reads URLs from a text or CSV file
pub fn read_url_file(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Could not read URL list {}", path.display()))?;

    // Decide by extension; a .txt full of commas stays one URL per line
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        csv_urls(&text).with_context(|| format!("Could not parse CSV file {}", path.display()))
    } else {
        Ok(input_lines(&text))
    }
}

/// First field of every CSV record, header row skipped
pub fn csv_urls(text: &str) -> Result<Vec<String>> {
    // No headers: the first row is checked by hand below, because plain
    // URL lists saved as .csv have no header at all.
    // Flexible: rows may have any number of columns, we only read one.
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut urls = Vec::new();
    for record in reader.records() {
        let record = record?;
        // Rows like ",,," carry no URL
        match record.get(0) {
            Some(field) if !field.is_empty() => urls.push(field.to_string()),
            _ => {}
        }
    }

    // Our own exports start with "URL,Status,..."
    if urls.first().map_or(false, |first| first.eq_ignore_ascii_case("url")) {
        urls.remove(0);
    }
    Ok(urls)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why the csv crate instead of split(',')?
//    - URLs can contain commas, so exports quote them: "https://a.com/?x=1,2"
//    - Quoted fields may hold escaped quotes ("")
//    - csv::Reader handles both, split(',') handles neither
//
// 2. What is `text.as_bytes()` doing here?
//    - ReaderBuilder::from_reader wants anything that implements io::Read
//    - &[u8] implements io::Read, so the file contents can be read in place
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_csv_first_field() {
        let text = "URL,Status,Risky\nexample.com,ok,No\n\n\"https://a.com/?x=1,2\",broken,No\n";
        assert_eq!(csv_urls(text).unwrap(), vec!["example.com", "https://a.com/?x=1,2"]);
    }

    #[test]
    fn test_csv_escaped_quotes() {
        let text = "\"a\"\"b\",c\n  plain , rest\n";
        assert_eq!(csv_urls(text).unwrap(), vec!["a\"b", "plain"]);
    }

    #[test]
    fn test_csv_ragged_rows_and_empty_first_field() {
        // Rows with different column counts, and one with no URL at all
        let text = "a.com\n,just,a,note\nb.com,x\n";
        assert_eq!(csv_urls(text).unwrap(), vec!["a.com", "b.com"]);
    }

    #[test]
    fn test_read_text_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "a.com\n\nb.com,not,csv").unwrap();
        let urls = read_url_file(file.path()).unwrap();
        // .txt-like files keep the whole line
        assert_eq!(urls, vec!["a.com", "b.com,not,csv"]);
    }

    #[test]
    fn test_read_csv_file() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "url,note\na.com,first\nb.com,second").unwrap();
        let urls = read_url_file(file.path()).unwrap();
        assert_eq!(urls, vec!["a.com", "b.com"]);
    }

    #[test]
    fn test_missing_file() {
        assert!(read_url_file(Path::new("/no/such/urls.txt")).is_err());
    }
}
