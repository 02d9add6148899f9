//! Heuristic signal detection over raw document text.
//!
//! Rule-based with fixed vocabularies and thresholds, no scores. The
//! decision ordering in `detect_sentiment` is part of the contract:
//! the "two or more and strictly ahead" rules fire before the
//! any-signal fallbacks, so (1,1) is mixed while (2,1) is positive.

use chrono::{Datelike, Duration, NaiveDate, Utc};
use regex::Regex;

use crate::types::Sentiment;

const POSITIVE_SIGNALS: &[&str] = &[
    "approved",
    "agreed",
    "on track",
    "aligned",
    "excited",
    "committed",
    "confirmed",
    "strong",
    "momentum",
    "enthusiastic",
    "successful",
    "expansion",
];

const NEGATIVE_SIGNALS: &[&str] = &[
    "blocked",
    "delayed",
    "concerned",
    "at risk",
    "cancelled",
    "frustrated",
    "declined",
    "threatened",
    "breakdown",
    "forbade",
    "forbidden",
    "crisis",
    "failed",
];

/// Classify document sentiment by vocabulary presence.
///
/// Each vocabulary term counts once if it appears anywhere in the lowercased
/// text. Substring containment, not word boundaries, so "strongly" counts
/// for "strong".
pub fn detect_sentiment(content: &str) -> Sentiment {
    let lower = content.to_lowercase();

    let positive = POSITIVE_SIGNALS
        .iter()
        .filter(|signal| lower.contains(*signal))
        .count();
    let negative = NEGATIVE_SIGNALS
        .iter()
        .filter(|signal| lower.contains(*signal))
        .count();

    if positive > negative && positive >= 2 {
        Sentiment::Positive
    } else if negative > positive && negative >= 2 {
        Sentiment::Negative
    } else if positive > 0 && negative > 0 {
        Sentiment::Mixed
    } else if positive > 0 {
        Sentiment::Positive
    } else if negative > 0 {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

const MONTHS: &[(&str, &str)] = &[
    ("january", "01"),
    ("february", "02"),
    ("march", "03"),
    ("april", "04"),
    ("may", "05"),
    ("june", "06"),
    ("july", "07"),
    ("august", "08"),
    ("september", "09"),
    ("october", "10"),
    ("november", "11"),
    ("december", "12"),
];

fn month_number(name: &str) -> Option<&'static str> {
    MONTHS
        .iter()
        .find(|(month, _)| *month == name)
        .map(|(_, num)| *num)
}

/// Detect a follow-up date mentioned in the document text.
///
/// Rules are tried in priority order and the first match wins:
/// 1. "by <month-name> [year]", resolved to the first of that month
/// 2. "by YYYY-MM-DD"
/// 3. "next week" relative to the meeting date
/// 4. "end of week" relative to the meeting date
///
/// The relative rules only fire when `meeting_date` is a parseable ISO
/// date. "End of week" uses Sunday-as-zero day numbering; a Saturday
/// meeting date therefore advances zero days.
pub fn detect_follow_up_date(content: &str, meeting_date: Option<&str>) -> Option<String> {
    let lower = content.to_lowercase();

    let by_month_re = Regex::new(
        r"by\s+(january|february|march|april|may|june|july|august|september|october|november|december)(?:\s+(\d{4}))?",
    )
    .unwrap();
    if let Some(caps) = by_month_re.captures(&lower) {
        let month = month_number(&caps[1]).unwrap_or("01");
        let year = match caps.get(2) {
            Some(y) => y.as_str().to_string(),
            None => match meeting_date {
                Some(date) => date.chars().take(4).collect(),
                None => Utc::now().format("%Y").to_string(),
            },
        };
        return Some(format!("{}-{}-01", year, month));
    }

    let by_date_re = Regex::new(r"by\s+(\d{4}-\d{2}-\d{2})").unwrap();
    if let Some(caps) = by_date_re.captures(&lower) {
        return Some(caps[1].to_string());
    }

    let parsed_date =
        meeting_date.and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

    if lower.contains("next week") {
        if let Some(date) = parsed_date {
            return Some((date + Duration::days(7)).format("%Y-%m-%d").to_string());
        }
    }

    if lower.contains("end of week") {
        if let Some(date) = parsed_date {
            let day_of_week = date.weekday().num_days_from_sunday() as i64;
            let days_until_friday = if day_of_week <= 5 { 5 - day_of_week } else { 0 };
            return Some(
                (date + Duration::days(days_until_friday))
                    .format("%Y-%m-%d")
                    .to_string(),
            );
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    // Sentiment boundaries

    #[test]
    fn test_single_positive_is_positive() {
        assert_eq!(detect_sentiment("The plan was approved."), Sentiment::Positive);
    }

    #[test]
    fn test_one_each_is_mixed() {
        assert_eq!(
            detect_sentiment("Budget approved but rollout is delayed."),
            Sentiment::Mixed
        );
    }

    #[test]
    fn test_two_positive_is_positive() {
        assert_eq!(
            detect_sentiment("Approved and aligned on scope."),
            Sentiment::Positive
        );
    }

    #[test]
    fn test_two_positive_one_negative_is_positive() {
        assert_eq!(
            detect_sentiment("Approved and aligned, though the vendor is delayed."),
            Sentiment::Positive
        );
    }

    #[test]
    fn test_two_negative_is_negative() {
        assert_eq!(
            detect_sentiment("Rollout delayed, launch cancelled."),
            Sentiment::Negative
        );
    }

    #[test]
    fn test_no_signals_is_neutral() {
        assert_eq!(detect_sentiment("We met and talked."), Sentiment::Neutral);
    }

    #[test]
    fn test_substring_containment_counts() {
        // "strongly" contains "strong"
        assert_eq!(
            detect_sentiment("The team feels strongly and remains committed."),
            Sentiment::Positive
        );
    }

    // Follow-up dates

    #[test]
    fn test_by_month_with_explicit_year() {
        assert_eq!(
            detect_follow_up_date("Deliver by March 2027.", Some("2026-02-04")),
            Some("2027-03-01".to_string())
        );
    }

    #[test]
    fn test_by_month_uses_meeting_year() {
        assert_eq!(
            detect_follow_up_date("Deliver by September.", Some("2026-02-04")),
            Some("2026-09-01".to_string())
        );
    }

    #[test]
    fn test_by_month_without_meeting_date_uses_current_year() {
        let year = Utc::now().format("%Y").to_string();
        assert_eq!(
            detect_follow_up_date("Deliver by June.", None),
            Some(format!("{}-06-01", year))
        );
    }

    #[test]
    fn test_by_literal_date() {
        assert_eq!(
            detect_follow_up_date("Follow up by 2026-03-15 at the latest.", None),
            Some("2026-03-15".to_string())
        );
    }

    #[test]
    fn test_next_week_requires_meeting_date() {
        assert_eq!(
            detect_follow_up_date("Let's sync next week.", Some("2026-02-04")),
            Some("2026-02-11".to_string())
        );
        assert_eq!(detect_follow_up_date("Let's sync next week.", None), None);
    }

    #[test]
    fn test_end_of_week_midweek_advances_to_friday() {
        // 2026-02-04 is a Wednesday
        assert_eq!(
            detect_follow_up_date("Report by end of week.", Some("2026-02-04")),
            Some("2026-02-06".to_string())
        );
    }

    #[test]
    fn test_end_of_week_sunday_advances_to_friday() {
        // 2026-02-08 is a Sunday, day zero
        assert_eq!(
            detect_follow_up_date("Report by end of week.", Some("2026-02-08")),
            Some("2026-02-13".to_string())
        );
    }

    #[test]
    fn test_end_of_week_saturday_does_not_advance() {
        // Saturday is day six, past the Friday threshold
        assert_eq!(
            detect_follow_up_date("Report by end of week.", Some("2026-02-07")),
            Some("2026-02-07".to_string())
        );
    }

    #[test]
    fn test_month_rule_wins_over_relative_rules() {
        assert_eq!(
            detect_follow_up_date("By April, though ideally next week.", Some("2026-02-04")),
            Some("2026-04-01".to_string())
        );
    }

    #[test]
    fn test_unparseable_meeting_date_disables_relative_rules() {
        assert_eq!(
            detect_follow_up_date("Let's sync next week.", Some("not-a-date")),
            None
        );
    }

    #[test]
    fn test_no_match_returns_none() {
        assert_eq!(detect_follow_up_date("Nothing scheduled.", Some("2026-02-04")), None);
    }
}
