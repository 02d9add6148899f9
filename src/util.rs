//! Small shared helpers: atomic writes, date stamps, filename dates.

use std::io::Write;
use std::path::Path;

use chrono::Utc;
use regex::Regex;

/// Write a string to `path` atomically: write to a temp file in the same
/// directory, then rename over the destination. A concurrent reader sees
/// either the old content or the new content, never a partial file.
pub fn atomic_write_str(path: &Path, content: &str) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Today's date as an ISO string (UTC), e.g. "2026-02-04".
pub fn today_iso() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

/// Current instant as an RFC 3339 timestamp.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

/// First `YYYY-MM-DD` substring of a filename, if any.
pub fn filename_date(name: &str) -> Option<String> {
    let re = Regex::new(r"(\d{4}-\d{2}-\d{2})").unwrap();
    re.captures(name).map(|caps| caps[1].to_string())
}

/// File mtime as milliseconds since the Unix epoch.
///
/// Only compared for exact equality against a previously recorded value,
/// never interpreted as a calendar timestamp.
pub fn mtime_millis(path: &Path) -> std::io::Result<i64> {
    let modified = std::fs::metadata(path)?.modified()?;
    let millis = modified
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0);
    Ok(millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_write_creates_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        atomic_write_str(&path, "first").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first");

        atomic_write_str(&path, "second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_filename_date() {
        assert_eq!(
            filename_date("2026-02-04-acme-sync.md"),
            Some("2026-02-04".to_string())
        );
        assert_eq!(
            filename_date("notes-2025-12-31.md"),
            Some("2025-12-31".to_string())
        );
        assert_eq!(filename_date("weekly-sync.md"), None);
    }

    #[test]
    fn test_mtime_millis_positive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.md");
        std::fs::write(&path, "x").unwrap();
        assert!(mtime_millis(&path).unwrap() > 0);
    }

    #[test]
    fn test_today_iso_shape() {
        let today = today_iso();
        assert_eq!(today.len(), 10);
        assert_eq!(&today[4..5], "-");
    }
}
