//! Frontmatter parsing.
//!
//! Extracts a flat key/value map from a document's leading `---` block.
//! No schema validation; callers tolerate missing and extra keys.

use std::collections::HashMap;

use regex::Regex;

/// A frontmatter value: a plain scalar, or a bracketed comma list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FmValue {
    Scalar(String),
    List(Vec<String>),
}

impl FmValue {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            FmValue::Scalar(s) => Some(s),
            FmValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FmValue::List(items) => Some(items),
            FmValue::Scalar(_) => None,
        }
    }
}

/// Parse the leading frontmatter block of a document.
///
/// Returns an empty map when the document has no well-formed block.
/// Interior lines that don't look like `key: value` are skipped.
pub fn parse_frontmatter(content: &str) -> HashMap<String, FmValue> {
    let mut fm = HashMap::new();

    let block_re = Regex::new(r"(?s)\A---\n(.*?)\n---").unwrap();
    let block = match block_re.captures(content) {
        Some(caps) => caps.get(1).map(|m| m.as_str()).unwrap_or(""),
        None => return fm,
    };

    let line_re = Regex::new(r"^(\w+):\s*(.+)").unwrap();
    for line in block.lines() {
        let Some(caps) = line_re.captures(line) else {
            continue;
        };
        let key = caps[1].to_string();
        let raw = caps[2].trim();

        // Bracketed comma lists: [item1, item2]
        if raw.starts_with('[') && raw.ends_with(']') {
            let items: Vec<String> = raw[1..raw.len() - 1]
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            fm.insert(key, FmValue::List(items));
            continue;
        }

        // Strip one pair of surrounding double quotes
        let value = if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
            raw[1..raw.len() - 1].to_string()
        } else {
            raw.to_string()
        };
        fm.insert(key, FmValue::Scalar(value));
    }

    fm
}
