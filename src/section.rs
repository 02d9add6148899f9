//! Section extraction from meeting documents.
//!
//! Given a level-2 heading name, collects the bullet items under it and
//! strips markup decorations down to plain text. Heading fallback chains
//! ("Decisions" then "Key Decisions") belong to the caller.

use regex::Regex;

/// Extract cleaned bullet items under the first `## ` heading whose text
/// starts with `heading` (case-insensitive).
///
/// The span runs until the next `## ` heading or end of document. Returns
/// an empty list when the heading is absent or carries no bullets.
pub fn extract_section(content: &str, heading: &str) -> Vec<String> {
    let heading_lower = heading.to_lowercase();
    let lines: Vec<&str> = content.lines().collect();

    let mut start_idx = None;
    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim().to_lowercase();
        if let Some(rest) = trimmed.strip_prefix("## ") {
            if rest.trim().starts_with(&heading_lower) {
                start_idx = Some(i + 1);
                break;
            }
        }
    }
    let Some(start) = start_idx else {
        return Vec::new();
    };

    let checkbox_re = Regex::new(r"^\[[ x]\]\s*").unwrap();
    let task_id_re = Regex::new(r"\s*\^task-\d{8}-\d{3}\s*$").unwrap();
    let wikilink_display_re = Regex::new(r"\[\[[^\]|]*\|([^\]]*)\]\]").unwrap();
    let wikilink_re = Regex::new(r"\[\[([^\]]*)\]\]").unwrap();
    let bold_re = Regex::new(r"\*\*([^*]+)\*\*").unwrap();

    let mut items = Vec::new();
    for line in &lines[start..] {
        if line.trim().starts_with("## ") {
            break;
        }
        let trimmed = line.trim();
        let Some(raw) = trimmed.strip_prefix("- ") else {
            continue;
        };

        let item = raw.trim();
        let item = checkbox_re.replace(item, "");
        let item = task_id_re.replace(&item, "");
        let item = wikilink_display_re.replace_all(&item, "$1");
        let item = wikilink_re.replace_all(&item, "$1");
        let item = bold_re.replace_all(&item, "$1");

        if !item.is_empty() {
            items.push(item.into_owned());
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_bold_and_task_id_and_stops_at_next_heading() {
        let doc = "## Decisions\n- **Adopted** plan A ^task-20260101-001\n## Next Steps\n- Other\n";
        assert_eq!(extract_section(doc, "Decisions"), vec!["Adopted plan A"]);
    }

    #[test]
    fn test_heading_prefix_match_is_case_insensitive() {
        let doc = "## key decisions (final)\n- Ship it\n";
        assert_eq!(extract_section(doc, "Key Decisions"), vec!["Ship it"]);
    }

    #[test]
    fn test_checkbox_markers_stripped() {
        let doc = "## Action Items\n- [ ] Send recap\n- [x] Book room\n";
        assert_eq!(
            extract_section(doc, "Action Items"),
            vec!["Send recap", "Book room"]
        );
    }

    #[test]
    fn test_wikilinks_reduced() {
        let doc = "## Key Points\n- Talked to [[People/Sarah|Sarah]]\n- See [[Roadmap]]\n";
        assert_eq!(
            extract_section(doc, "Key Points"),
            vec!["Talked to Sarah", "See Roadmap"]
        );
    }

    #[test]
    fn test_missing_heading_yields_empty() {
        assert!(extract_section("## Summary\n- hi\n", "Decisions").is_empty());
    }

    #[test]
    fn test_section_with_no_bullets_yields_empty() {
        let doc = "## Decisions\nProse only, no list here.\n\n## Summary\n- x\n";
        assert!(extract_section(doc, "Decisions").is_empty());
    }

    #[test]
    fn test_non_bullet_lines_within_span_ignored() {
        let doc = "## Decisions\nSome intro\n- Keep cadence weekly\n  indented note\n";
        assert_eq!(extract_section(doc, "Decisions"), vec!["Keep cadence weekly"]);
    }

    #[test]
    fn test_first_matching_heading_wins() {
        let doc = "## Decisions\n- First\n## More\n## Decisions\n- Second\n";
        assert_eq!(extract_section(doc, "Decisions"), vec!["First"]);
    }

    #[test]
    fn test_item_emptied_by_stripping_is_dropped() {
        let doc = "## Decisions\n- ^task-20260101-002\n- Real one\n";
        assert_eq!(extract_section(doc, "Decisions"), vec!["Real one"]);
    }
}
