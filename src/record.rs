//! Builds one MeetingRecord from one source document.
//!
//! Every field resolves through its own ordered fallback chain; a document
//! missing all of frontmatter, headings, and sections still yields a record.
//! The only failure mode is an unreadable file, and the refresh pass treats
//! that as a per-document skip.

use std::path::Path;

use regex::Regex;

use crate::classify::{detect_follow_up_date, detect_sentiment};
use crate::error::IndexError;
use crate::frontmatter::{parse_frontmatter, FmValue};
use crate::section::extract_section;
use crate::types::MeetingRecord;
use crate::util;

/// Parse a meeting document into a record.
///
/// `vault_root` anchors the record's `source_file` key; paths outside the
/// root fall back to the full path.
pub fn parse_meeting_file(path: &Path, vault_root: &Path) -> Result<MeetingRecord, IndexError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| IndexError::MalformedDocument {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_string();

    let fm = parse_frontmatter(&content);

    // Date: frontmatter `date`, then `created`, then the filename
    let date = fm
        .get("date")
        .and_then(FmValue::as_scalar)
        .map(str::to_string)
        .or_else(|| {
            fm.get("created")
                .and_then(FmValue::as_scalar)
                .map(str::to_string)
        })
        .or_else(|| util::filename_date(&file_name));

    // Title: first H1 heading, then derived from the filename
    let title = extract_title(&content).unwrap_or_else(|| title_from_filename(&file_name));

    // Attendees: `participants` preferred over `attendees`; a comma-joined
    // scalar is split, a bracketed list is taken as-is
    let attendees = fm
        .get("participants")
        .or_else(|| fm.get("attendees"))
        .map(fm_value_to_names)
        .unwrap_or_default();

    let company = fm
        .get("company")
        .and_then(FmValue::as_scalar)
        .map(str::to_string);

    let mut decisions = extract_section(&content, "Decisions");
    if decisions.is_empty() {
        decisions = extract_section(&content, "Key Decisions");
    }
    let action_items = extract_section(&content, "Action Items");
    let mut key_points = extract_section(&content, "Key Points");
    if key_points.is_empty() {
        key_points = extract_section(&content, "Summary");
    }

    let sentiment = detect_sentiment(&content);
    let follow_up_date = detect_follow_up_date(&content, date.as_deref());

    let source_file = path
        .strip_prefix(vault_root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned();

    Ok(MeetingRecord {
        date,
        title,
        source_file,
        attendees,
        company,
        decisions,
        action_items,
        key_points,
        sentiment,
        follow_up_date,
        cached_at: util::now_rfc3339(),
    })
}

/// First H1 heading line, trimmed.
fn extract_title(content: &str) -> Option<String> {
    let re = Regex::new(r"(?m)^# (.+)$").unwrap();
    re.captures(content)
        .map(|caps| caps[1].trim().to_string())
}

/// Derive a title from the filename: drop the extension, a leading date
/// prefix, and a leading "Meeting" label.
fn title_from_filename(file_name: &str) -> String {
    let stem = file_name.strip_suffix(".md").unwrap_or(file_name);
    let date_prefix_re = Regex::new(r"^\d{4}-\d{2}-\d{2}\s*-?\s*").unwrap();
    let meeting_prefix_re = Regex::new(r"(?i)^Meeting\s*-?\s*").unwrap();

    let stripped = date_prefix_re.replace(stem, "");
    let stripped = meeting_prefix_re.replace(&stripped, "");
    stripped.trim().to_string()
}

fn fm_value_to_names(value: &FmValue) -> Vec<String> {
    match value {
        FmValue::List(items) => items.clone(),
        FmValue::Scalar(s) => s.split(',').map(|part| part.trim().to_string()).collect(),
    }
}
